use std::fmt;

use crate::notification::Notification;
use crate::storage::WordStore;
use crate::validation::{Schema, ValidationErrors};
use crate::word::{NewWord, PartOfSpeechSet, WordId, WordRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

impl FormMode {
    pub fn verb(self) -> &'static str {
        match self {
            FormMode::Create => "add",
            FormMode::Update => "update",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            FormMode::Create => "added",
            FormMode::Update => "updated",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Form state as the user edits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub vocabulary: String,
    pub meaning: String,
    pub translate: String,
    pub example_sentence: String,
    pub category: String,
    pub part_of_speech: PartOfSpeechSet,
}

impl FormFields {
    fn to_new_word(&self) -> NewWord {
        NewWord {
            vocabulary: self.vocabulary.clone(),
            meaning: self.meaning.clone(),
            translate: self.translate.clone(),
            example: Some(self.example_sentence.clone()),
            category: self.category.clone(),
            part_of_speech: self.part_of_speech.clone(),
        }
    }
}

impl From<WordRecord> for FormFields {
    fn from(word: WordRecord) -> Self {
        Self {
            vocabulary: word.vocabulary,
            meaning: word.meaning,
            translate: word.translate,
            example_sentence: word.example.unwrap_or_default(),
            category: word.category,
            part_of_speech: word.part_of_speech,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected(ValidationErrors),
    /// Update mode without a target id; nothing was sent.
    MissingTarget,
    Saved(Notification),
    Failed(Notification),
}

/// Add and update share one form; `mode` and `target` decide which store call a
/// submit makes.
pub struct FormController<'a> {
    store: &'a dyn WordStore,
    mode: FormMode,
    target: Option<WordId>,
    schema: Schema,
    fields: FormFields,
}

impl<'a> FormController<'a> {
    pub fn new(store: &'a dyn WordStore, mode: FormMode, target: Option<WordId>) -> Self {
        Self {
            store,
            mode,
            target,
            schema: Schema::default(),
            fields: FormFields::default(),
        }
    }

    pub fn create(store: &'a dyn WordStore) -> Self {
        Self::new(store, FormMode::Create, None)
    }

    pub fn update(store: &'a dyn WordStore, id: WordId) -> Self {
        Self::new(store, FormMode::Update, Some(id))
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    /// Pre-fills the form from the stored word in update mode. A failed fetch is
    /// only logged, the fields stay as they are.
    pub async fn load(&mut self) {
        let (FormMode::Update, Some(id)) = (self.mode, self.target) else {
            return;
        };
        match self.store.get(id).await {
            Ok(word) => self.fields = FormFields::from(word),
            Err(error) => tracing::warn!(id, %error, "failed to load word for editing"),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.schema.validate(&self.fields)
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if let Err(errors) = self.validate() {
            return SubmitOutcome::Rejected(errors);
        }
        let word = self.fields.to_new_word();
        let result = match (self.mode, self.target) {
            (FormMode::Create, _) => self.store.create(&word).await.map(|_| ()),
            (FormMode::Update, Some(id)) => self.store.update(id, &word).await,
            (FormMode::Update, None) => return SubmitOutcome::MissingTarget,
        };
        match result {
            Ok(()) => {
                self.fields = FormFields::default();
                SubmitOutcome::Saved(Notification::success(
                    format!("Word {}", self.mode.past_tense()),
                    format!("\"{}\" was {}.", word.vocabulary, self.mode.past_tense()),
                ))
            }
            Err(error) => {
                tracing::warn!(mode = %self.mode, %error, "failed to save word");
                SubmitOutcome::Failed(Notification::error(format!(
                    "Failed to {} the word: {error}",
                    self.mode
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Variant;
    use crate::storage::{MockWordStore, StoreError};
    use crate::validation::Field;
    use crate::word::PartOfSpeech;

    fn ubiquitous() -> FormFields {
        FormFields {
            vocabulary: "ubiquitous".into(),
            meaning: "existing everywhere".into(),
            translate: "普遍的な".into(),
            example_sentence: "Smartphones are ubiquitous.".into(),
            category: "adjective".into(),
            part_of_speech: [PartOfSpeech::Adjective].into_iter().collect(),
        }
    }

    fn stored(id: WordId) -> WordRecord {
        WordRecord {
            id,
            vocabulary: "keen".into(),
            meaning: "eager".into(),
            translate: "熱心な".into(),
            example: None,
            category: "adjective".into(),
            part_of_speech: [PartOfSpeech::Adjective].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn create_sends_fields_once_and_resets() {
        let mut store = MockWordStore::new();
        store
            .expect_create()
            .withf(|word: &NewWord| {
                word.vocabulary == "ubiquitous"
                    && word.meaning == "existing everywhere"
                    && word.translate == "普遍的な"
                    && word.example.as_deref() == Some("Smartphones are ubiquitous.")
                    && word.category == "adjective"
            })
            .times(1)
            .returning(|_| Ok(1));
        store.expect_update().never();

        let mut form = FormController::create(&store);
        *form.fields_mut() = ubiquitous();
        let SubmitOutcome::Saved(notification) = form.submit().await else {
            panic!("expected a saved outcome");
        };
        assert_eq!(notification.variant, Variant::Success);
        assert!(notification.description.contains("ubiquitous"));
        assert!(notification.title.contains("added"));
        assert_eq!(form.fields(), &FormFields::default());
    }

    #[tokio::test]
    async fn failed_create_keeps_values() {
        let mut store = MockWordStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|_| Err(StoreError::NotFound(0)));

        let mut form = FormController::create(&store);
        *form.fields_mut() = ubiquitous();
        let outcome = form.submit().await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(Notification {
                variant: Variant::Destructive,
                ..
            })
        ));
        assert_eq!(form.fields(), &ubiquitous());
    }

    #[tokio::test]
    async fn invalid_fields_never_reach_the_store() {
        let mut store = MockWordStore::new();
        store.expect_create().never();
        store.expect_update().never();

        let mut form = FormController::create(&store);
        *form.fields_mut() = ubiquitous();
        form.fields_mut().vocabulary = "u".into();
        form.fields_mut().example_sentence = "e".repeat(1001);

        let SubmitOutcome::Rejected(errors) = form.submit().await else {
            panic!("expected rejection");
        };
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![Field::Vocabulary, Field::ExampleSentence]
        );
        assert_eq!(form.fields().vocabulary, "u");
    }

    #[tokio::test]
    async fn update_sends_id_with_fields() {
        let mut store = MockWordStore::new();
        store.expect_create().never();
        store
            .expect_update()
            .withf(|id: &WordId, word: &NewWord| *id == 4 && word.vocabulary == "ubiquitous")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut form = FormController::update(&store, 4);
        *form.fields_mut() = ubiquitous();
        let SubmitOutcome::Saved(notification) = form.submit().await else {
            panic!("expected a saved outcome");
        };
        assert!(notification.title.contains("updated"));
        assert_eq!(form.fields(), &FormFields::default());
    }

    #[tokio::test]
    async fn update_without_target_sends_nothing() {
        let mut store = MockWordStore::new();
        store.expect_update().never();
        store.expect_create().never();

        let mut form = FormController::new(&store, FormMode::Update, None);
        *form.fields_mut() = ubiquitous();
        assert_eq!(form.submit().await, SubmitOutcome::MissingTarget);
        assert_eq!(form.fields(), &ubiquitous());
    }

    #[tokio::test]
    async fn load_populates_from_stored_word() {
        let mut store = MockWordStore::new();
        store
            .expect_get()
            .withf(|id: &WordId| *id == 3)
            .times(1)
            .returning(|id| Ok(stored(id)));

        let mut form = FormController::update(&store, 3);
        form.load().await;
        assert_eq!(
            form.fields(),
            &FormFields {
                vocabulary: "keen".into(),
                meaning: "eager".into(),
                translate: "熱心な".into(),
                example_sentence: String::new(),
                category: "adjective".into(),
                part_of_speech: [PartOfSpeech::Adjective].into_iter().collect(),
            }
        );
    }

    #[tokio::test]
    async fn failed_load_keeps_defaults() {
        let mut store = MockWordStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|id| Err(StoreError::NotFound(id)));

        let mut form = FormController::update(&store, 3);
        form.load().await;
        assert_eq!(form.fields(), &FormFields::default());
    }

    #[tokio::test]
    async fn create_mode_does_not_load() {
        let mut store = MockWordStore::new();
        store.expect_get().never();
        let mut form = FormController::create(&store);
        form.load().await;
        assert_eq!(form.mode(), FormMode::Create);
    }
}
