use chrono::NaiveDate;
use sqlx::{
    migrate::MigrateDatabase, query, query_as, query_scalar, sqlite::SqlitePoolOptions, Pool,
    Sqlite, SqlitePool,
};

use crate::word::{Difficulty, WordRecord};

/// Word rows plus the scheduler bookkeeping table. Cloning shares the same pool.
#[derive(Debug, Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    /// Opens (creating if needed) the database at `url` and applies pending migrations.
    pub async fn initialize(url: &str) -> sqlx::Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            tracing::info!(url, "creating word database");
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePool::connect(url).await?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database. Limited to a single connection that is never recycled,
    /// otherwise every new connection would see an empty database.
    pub async fn in_memory() -> sqlx::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> sqlx::Result<Self> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

const SELECT_WORDS: &str = "SELECT * FROM words";

impl Storage {
    pub async fn get_word(&self, word: &str) -> sqlx::Result<Option<WordRecord>> {
        query_as(&format!("{SELECT_WORDS} WHERE word = ?"))
            .bind(word)
            .fetch_optional(&self.pool)
            .await
    }

    /// Inserts the record, replacing any row with the same word.
    pub async fn upsert_word(&self, record: &WordRecord) -> sqlx::Result<()> {
        query(
            "INSERT OR REPLACE INTO words(
                word, definition, pronunciation, part_of_speech, is_favorite, date_added,
                category, difficulty, is_word_of_the_day, word_of_the_day_date, search_count,
                last_searched, example, synonyms, etymology
            ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.word)
        .bind(&record.definition)
        .bind(&record.pronunciation)
        .bind(&record.part_of_speech)
        .bind(record.is_favorite)
        .bind(record.date_added)
        .bind(&record.category)
        .bind(record.difficulty)
        .bind(record.is_word_of_the_day)
        .bind(record.word_of_the_day_date)
        .bind(record.search_count)
        .bind(record.last_searched)
        .bind(&record.example)
        .bind(&record.synonyms)
        .bind(&record.etymology)
        .execute(&self.pool)
        .await
        .map(|_| ())
    }

    /// Returns true if the word exists.
    pub async fn set_favorite(&self, word: &str, favorite: bool) -> sqlx::Result<bool> {
        let result = query("UPDATE words SET is_favorite = ? WHERE word = ?")
            .bind(favorite)
            .bind(word)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns true if the word exists.
    pub async fn set_category(&self, word: &str, category: Option<&str>) -> sqlx::Result<bool> {
        let result = query("UPDATE words SET category = ? WHERE word = ?")
            .bind(category)
            .bind(word)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bumps the search counter and stamps `now` in a single statement.
    pub async fn increment_search_count(&self, word: &str, now: i64) -> sqlx::Result<bool> {
        let result = query(
            "UPDATE words SET search_count = search_count + 1, last_searched = ? WHERE word = ?",
        )
        .bind(now)
        .bind(word)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear_word_of_the_day(&self) -> sqlx::Result<()> {
        query("UPDATE words SET is_word_of_the_day = 0")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Flags one word. Call [`Storage::clear_word_of_the_day`] first to keep a single flagged row.
    pub async fn set_word_of_the_day(&self, word: &str, date: NaiveDate) -> sqlx::Result<bool> {
        let result = query(
            "UPDATE words SET is_word_of_the_day = 1, word_of_the_day_date = ? WHERE word = ?",
        )
        .bind(date)
        .bind(word)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn word_of_the_day(&self, date: NaiveDate) -> sqlx::Result<Option<WordRecord>> {
        query_as(&format!(
            "{SELECT_WORDS} WHERE is_word_of_the_day = 1 AND word_of_the_day_date = ? LIMIT 1"
        ))
        .bind(date)
        .fetch_optional(&self.pool)
        .await
    }

    /// Attempt to remove a word, returns true if the word was removed
    pub async fn remove_word(&self, word: &str) -> sqlx::Result<bool> {
        let result = query("DELETE FROM words WHERE word = ?")
            .bind(word)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl Storage {
    /// Newest first.
    pub async fn all_words(&self) -> sqlx::Result<Vec<WordRecord>> {
        query_as(&format!("{SELECT_WORDS} ORDER BY date_added DESC, word"))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn favorite_words(&self) -> sqlx::Result<Vec<WordRecord>> {
        query_as(&format!(
            "{SELECT_WORDS} WHERE is_favorite = 1 ORDER BY date_added DESC, word"
        ))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn words_by_category(&self, category: &str) -> sqlx::Result<Vec<WordRecord>> {
        query_as(&format!(
            "{SELECT_WORDS} WHERE category = ? ORDER BY date_added DESC, word"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn categories(&self) -> sqlx::Result<Vec<String>> {
        query_scalar("SELECT DISTINCT category FROM words WHERE category IS NOT NULL ORDER BY category")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn words_by_part_of_speech(
        &self,
        part_of_speech: &str,
    ) -> sqlx::Result<Vec<WordRecord>> {
        query_as(&format!(
            "{SELECT_WORDS} WHERE part_of_speech = ? ORDER BY word"
        ))
        .bind(part_of_speech)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn words_by_difficulty(&self, difficulty: Difficulty) -> sqlx::Result<Vec<WordRecord>> {
        query_as(&format!("{SELECT_WORDS} WHERE difficulty = ? ORDER BY word"))
            .bind(difficulty)
            .fetch_all(&self.pool)
            .await
    }

    /// Words starting with `text`, or whose definition contains it.
    pub async fn search_words(&self, text: &str) -> sqlx::Result<Vec<WordRecord>> {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        query_as(&format!(
            "{SELECT_WORDS}
            WHERE word LIKE ? || '%' ESCAPE '\\' OR definition LIKE '%' || ? || '%' ESCAPE '\\'
            ORDER BY word"
        ))
        .bind(&escaped)
        .bind(&escaped)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn most_searched(&self, limit: u32) -> sqlx::Result<Vec<WordRecord>> {
        query_as(&format!(
            "{SELECT_WORDS} ORDER BY search_count DESC, word LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Words searched strictly after `since` (epoch millis), most recent first.
    pub async fn searched_since(&self, since: i64) -> sqlx::Result<Vec<WordRecord>> {
        query_as(&format!(
            "{SELECT_WORDS} WHERE last_searched > ? ORDER BY last_searched DESC"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn total_count(&self) -> sqlx::Result<i64> {
        query_scalar("SELECT COUNT(*) FROM words")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn favorite_count(&self) -> sqlx::Result<i64> {
        query_scalar("SELECT COUNT(*) FROM words WHERE is_favorite = 1")
            .fetch_one(&self.pool)
            .await
    }
}

impl Storage {
    pub async fn last_job_success(&self, job: &str) -> sqlx::Result<Option<NaiveDate>> {
        query_scalar("SELECT last_success FROM job_runs WHERE job = ?")
            .bind(job)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn record_job_success(&self, job: &str, date: NaiveDate) -> sqlx::Result<()> {
        query(
            "INSERT INTO job_runs(job, last_success) VALUES(?, ?)
            ON CONFLICT(job) DO UPDATE SET last_success = excluded.last_success",
        )
        .bind(job)
        .bind(date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
