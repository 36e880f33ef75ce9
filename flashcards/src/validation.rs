use std::fmt;

use crate::form::FormFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Vocabulary,
    Meaning,
    Translate,
    ExampleSentence,
    Category,
    PartOfSpeech,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Vocabulary => "vocabulary",
            Field::Meaning => "meaning",
            Field::Translate => "translate",
            Field::ExampleSentence => "exampleSentence",
            Field::Category => "category",
            Field::PartOfSpeech => "partOfSpeech",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive character-count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    pub min: usize,
    pub max: usize,
}

impl Length {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    fn check(self, value: &str) -> Option<String> {
        let len = value.chars().count();
        if len < self.min {
            Some(format!(
                "String must contain at least {} character(s)",
                self.min
            ))
        } else if len > self.max {
            Some(format!("String must contain at most {} character(s)", self.max))
        } else {
            None
        }
    }
}

/// Field rules for the vocabulary form. `category` is never bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub vocabulary: Length,
    pub meaning: Length,
    pub translate: Length,
    pub example_sentence: Length,
    pub require_part_of_speech: bool,
}

impl Schema {
    pub const STANDARD: Schema = Schema {
        vocabulary: Length::new(2, 100),
        meaning: Length::new(2, 1000),
        translate: Length::new(2, 100),
        example_sentence: Length::new(2, 1000),
        require_part_of_speech: true,
    };

    /// The older add-only form, without part of speech.
    pub const COMPACT: Schema = Schema {
        vocabulary: Length::new(2, 20),
        meaning: Length::new(2, 100),
        translate: Length::new(2, 100),
        example_sentence: Length::new(2, 1000),
        require_part_of_speech: false,
    };

    pub fn validate(&self, fields: &FormFields) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        let lengths = [
            (Field::Vocabulary, self.vocabulary, &fields.vocabulary),
            (Field::Meaning, self.meaning, &fields.meaning),
            (Field::Translate, self.translate, &fields.translate),
            (
                Field::ExampleSentence,
                self.example_sentence,
                &fields.example_sentence,
            ),
        ];
        for (field, length, value) in lengths {
            if let Some(message) = length.check(value) {
                errors.push(FieldError { field, message });
            }
        }
        if self.require_part_of_speech && fields.part_of_speech.is_empty() {
            errors.push(FieldError {
                field: Field::PartOfSpeech,
                message: "You have to select at least one item.".to_owned(),
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::STANDARD
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every failing field of one validation pass, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().map(|error| error.field)
    }

    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| &error.message[..])
    }
}
