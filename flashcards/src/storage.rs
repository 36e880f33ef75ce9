use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use sqlx::{
    migrate::MigrateDatabase, query, query_as, query_scalar, FromRow, Pool, Sqlite,
    SqliteConnection, SqlitePool,
};

use crate::word::{DateStat, NewWord, WordId, WordRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("no word with id {0}")]
    NotFound(WordId),
    #[error("malformed part of speech column: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Everything the UI needs from the word store. One method per operation, each a
/// single round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordStore: Send + Sync {
    async fn create(&self, word: &NewWord) -> Result<WordId, StoreError>;
    async fn list(&self) -> Result<Vec<WordRecord>, StoreError>;
    async fn get(&self, id: WordId) -> Result<WordRecord, StoreError>;
    /// Replaces every editable field of `id`.
    async fn update(&self, id: WordId, word: &NewWord) -> Result<(), StoreError>;
    async fn delete(&self, id: WordId) -> Result<(), StoreError>;
    /// Activity per day, ordered by date.
    async fn stats_by_date(&self) -> Result<Vec<DateStat>, StoreError>;
    async fn record_quiz(&self, id: WordId) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy)]
enum EventKind {
    Add,
    Update,
    Quiz,
}

impl EventKind {
    fn as_str(self) -> &'static str {
        match self {
            EventKind::Add => "add",
            EventKind::Update => "update",
            EventKind::Quiz => "quiz",
        }
    }
}

#[derive(Debug, FromRow)]
struct WordRow {
    id: i64,
    vocabulary: String,
    meaning: String,
    translate: String,
    example: Option<String>,
    category: String,
    part_of_speech: String,
}

impl TryFrom<WordRow> for WordRecord {
    type Error = serde_json::Error;

    fn try_from(row: WordRow) -> Result<Self, Self::Error> {
        Ok(WordRecord {
            id: row.id,
            vocabulary: row.vocabulary,
            meaning: row.meaning,
            translate: row.translate,
            example: row.example,
            category: row.category,
            part_of_speech: serde_json::from_str(&row.part_of_speech)?,
        })
    }
}

const SELECT_WORDS: &str =
    "SELECT id, vocabulary, meaning, translate, example, category, part_of_speech FROM words";

pub struct SqliteWordStore {
    pool: Pool<Sqlite>,
}

impl SqliteWordStore {
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePool::connect(url).await?;
        sqlx::migrate!().run(&pool).await?;
        tracing::debug!(url, "word store ready");
        Ok(Self { pool })
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}

async fn record_event(
    conn: &mut SqliteConnection,
    word_id: WordId,
    kind: EventKind,
    on: NaiveDate,
) -> sqlx::Result<()> {
    query("INSERT INTO word_events(word_id, kind, occurred_on) VALUES(?, ?, ?)")
        .bind(word_id)
        .bind(kind.as_str())
        .bind(on)
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl WordStore for SqliteWordStore {
    async fn create(&self, word: &NewWord) -> Result<WordId, StoreError> {
        let part_of_speech = serde_json::to_string(&word.part_of_speech)?;
        let mut tx = self.pool.begin().await?;
        let id = query(
            "INSERT INTO words(vocabulary, meaning, translate, example, category, part_of_speech) VALUES(?, ?, ?, ?, ?, ?)",
        )
        .bind(word.vocabulary.as_str())
        .bind(word.meaning.as_str())
        .bind(word.translate.as_str())
        .bind(word.example.as_deref())
        .bind(word.category.as_str())
        .bind(part_of_speech)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        record_event(&mut tx, id, EventKind::Add, Self::today()).await?;
        tx.commit().await?;
        tracing::info!(id, vocabulary = %word.vocabulary, "word added");
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<WordRecord>, StoreError> {
        let rows: Vec<WordRow> = query_as(&format!("{SELECT_WORDS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| WordRecord::try_from(row).map_err(StoreError::from))
            .collect()
    }

    async fn get(&self, id: WordId) -> Result<WordRecord, StoreError> {
        let row: Option<WordRow> = query_as(&format!("{SELECT_WORDS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let row = row.ok_or(StoreError::NotFound(id))?;
        Ok(WordRecord::try_from(row)?)
    }

    async fn update(&self, id: WordId, word: &NewWord) -> Result<(), StoreError> {
        let part_of_speech = serde_json::to_string(&word.part_of_speech)?;
        let mut tx = self.pool.begin().await?;
        let result = query(
            "UPDATE words SET vocabulary = ?, meaning = ?, translate = ?, example = ?, category = ?, part_of_speech = ? WHERE id = ?",
        )
        .bind(word.vocabulary.as_str())
        .bind(word.meaning.as_str())
        .bind(word.translate.as_str())
        .bind(word.example.as_deref())
        .bind(word.category.as_str())
        .bind(part_of_speech)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        record_event(&mut tx, id, EventKind::Update, Self::today()).await?;
        tx.commit().await?;
        tracing::info!(id, vocabulary = %word.vocabulary, "word updated");
        Ok(())
    }

    async fn delete(&self, id: WordId) -> Result<(), StoreError> {
        let result = query("DELETE FROM words WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::info!(id, "word deleted");
        Ok(())
    }

    async fn stats_by_date(&self) -> Result<Vec<DateStat>, StoreError> {
        let stats = query_as(
            r#"
            SELECT occurred_on AS "date",
                   SUM(kind = 'add') AS "add",
                   SUM(kind = 'update') AS "update",
                   NULLIF(SUM(kind = 'quiz'), 0) AS "quiz"
            FROM word_events
            GROUP BY occurred_on
            ORDER BY occurred_on
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    async fn record_quiz(&self, id: WordId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let exists: Option<i64> = query_scalar("SELECT id FROM words WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(StoreError::NotFound(id));
        }
        record_event(&mut tx, id, EventKind::Quiz, Self::today()).await?;
        tx.commit().await?;
        Ok(())
    }
}
