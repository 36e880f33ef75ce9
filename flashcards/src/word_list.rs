use std::fmt;
use std::str::FromStr;

use crate::storage::WordStore;
use crate::word::{WordId, WordRecord};

/// Screens of the app, addressed the same way in links and at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Add,
    List,
    Update(WordId),
    Stats,
    Suggestions,
    Quiz,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Add => f.write_str("/add"),
            Route::List => f.write_str("/list"),
            Route::Update(id) => write!(f, "/update/{id}"),
            Route::Stats => f.write_str("/record"),
            Route::Suggestions => f.write_str("/suggest"),
            Route::Quiz => f.write_str("/quiz"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no page at {0:?}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownRoute(s.to_owned());
        let mut parts = s.trim().trim_start_matches('/').split('/');
        let route = match parts.next() {
            Some("add") => Route::Add,
            Some("list") | Some("") => Route::List,
            Some("record") | Some("stats") => Route::Stats,
            Some("suggest") => Route::Suggestions,
            Some("quiz") => Route::Quiz,
            Some("update") => {
                let id = parts.next().ok_or_else(unknown)?;
                Route::Update(id.parse().map_err(|_| unknown())?)
            }
            _ => return Err(unknown()),
        };
        if parts.next().is_some() {
            return Err(unknown());
        }
        Ok(route)
    }
}

/// The list page: a local copy of every word, trimmed as deletes succeed.
pub struct WordList<'a> {
    store: &'a dyn WordStore,
    words: Vec<WordRecord>,
    error: Option<String>,
}

impl<'a> WordList<'a> {
    pub fn new(store: &'a dyn WordStore) -> Self {
        Self {
            store,
            words: Vec::new(),
            error: None,
        }
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self) {
        match self.store.list().await {
            Ok(words) => {
                self.words = words;
                self.error = None;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load words");
                self.words.clear();
                self.error = Some(format!("Error: {error}"));
            }
        }
    }

    /// Removes the word locally only once the store confirms the delete.
    pub async fn delete(&mut self, id: WordId) -> bool {
        match self.store.delete(id).await {
            Ok(()) => {
                self.words.retain(|word| word.id != id);
                self.error = None;
                true
            }
            Err(error) => {
                tracing::warn!(id, %error, "failed to delete word");
                self.error = Some(format!("Error: {error}"));
                false
            }
        }
    }

    pub fn update_route(&self, id: WordId) -> Route {
        Route::Update(id)
    }
}

impl fmt::Display for WordList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            writeln!(f, "{error}\n")?;
        }
        writeln!(f, "Word list ({})", self.words.len())?;
        if self.words.is_empty() {
            return writeln!(f, "No words yet. Add one at {}.", Route::Add);
        }
        for word in &self.words {
            writeln!(f, "----------------------------------------")?;
            writeln!(f, "{} (id: {})", word.vocabulary, word.id)?;
            writeln!(f, "  category: {}", word.category)?;
            if !word.part_of_speech.is_empty() {
                writeln!(f, "  part of speech: {}", word.part_of_speech)?;
            }
            writeln!(f, "  meaning: {}", word.meaning)?;
            writeln!(f, "  translate: {}", word.translate)?;
            if let Some(example) = &word.example {
                writeln!(f, "  example: {example}")?;
            }
            writeln!(f, "  edit: {}", self.update_route(word.id))?;
        }
        Ok(())
    }
}
