use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use suggestion::PromptWord;

pub type WordId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    AuxiliaryVerb,
    Article,
    Conjunction,
    Preposition,
    Interjection,
    Other,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 11] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Pronoun,
        PartOfSpeech::AuxiliaryVerb,
        PartOfSpeech::Article,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Preposition,
        PartOfSpeech::Interjection,
        PartOfSpeech::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "Noun",
            PartOfSpeech::Verb => "Verb",
            PartOfSpeech::Adjective => "Adjective",
            PartOfSpeech::Adverb => "Adverb",
            PartOfSpeech::Pronoun => "Pronoun",
            PartOfSpeech::AuxiliaryVerb => "Auxiliary Verb",
            PartOfSpeech::Article => "Article",
            PartOfSpeech::Conjunction => "Conjunction",
            PartOfSpeech::Preposition => "Preposition",
            PartOfSpeech::Interjection => "Interjection",
            PartOfSpeech::Other => "Other",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown part of speech {0:?}")]
pub struct UnknownPartOfSpeech(pub String);

impl FromStr for PartOfSpeech {
    type Err = UnknownPartOfSpeech;

    /// Accepts the label ("Auxiliary Verb") or the variant name ("AuxiliaryVerb"), any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        PartOfSpeech::ALL
            .into_iter()
            .find(|pos| format!("{pos:?}").to_lowercase() == wanted)
            .ok_or_else(|| UnknownPartOfSpeech(s.trim().to_owned()))
    }
}

/// The selected parts of speech of a word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartOfSpeechSet(BTreeSet<PartOfSpeech>);

impl PartOfSpeechSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: PartOfSpeech) -> bool {
        self.0.insert(pos)
    }

    pub fn remove(&mut self, pos: PartOfSpeech) -> bool {
        self.0.remove(&pos)
    }

    /// Flips membership, returns whether `pos` is selected afterwards.
    pub fn toggle(&mut self, pos: PartOfSpeech) -> bool {
        if self.0.remove(&pos) {
            false
        } else {
            self.0.insert(pos)
        }
    }

    pub fn contains(&self, pos: PartOfSpeech) -> bool {
        self.0.contains(&pos)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = PartOfSpeech> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<PartOfSpeech> for PartOfSpeechSet {
    fn from_iter<I: IntoIterator<Item = PartOfSpeech>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for PartOfSpeechSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, pos) in self.iter().enumerate() {
            if index != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{pos}")?;
        }
        Ok(())
    }
}

/// A word as the store holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub id: WordId,
    pub vocabulary: String,
    pub meaning: String,
    pub translate: String,
    pub example: Option<String>,
    pub category: String,
    #[serde(default)]
    pub part_of_speech: PartOfSpeechSet,
}

/// Editable fields of a word, sent to the store on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub vocabulary: String,
    pub meaning: String,
    pub translate: String,
    pub example: Option<String>,
    pub category: String,
    #[serde(default)]
    pub part_of_speech: PartOfSpeechSet,
}

impl WordRecord {
    pub fn from_new(id: WordId, word: NewWord) -> Self {
        Self {
            id,
            vocabulary: word.vocabulary,
            meaning: word.meaning,
            translate: word.translate,
            example: word.example,
            category: word.category,
            part_of_speech: word.part_of_speech,
        }
    }
}

impl PromptWord for WordRecord {
    fn vocabulary(&self) -> &str {
        &self.vocabulary
    }

    fn meaning(&self) -> &str {
        &self.meaning
    }

    fn translate(&self) -> &str {
        &self.translate
    }

    fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// Per-day activity counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DateStat {
    pub date: NaiveDate,
    pub add: i64,
    pub update: i64,
    pub quiz: Option<i64>,
}
