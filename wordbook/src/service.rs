use std::fmt::Write;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use dictionary::{Dictionary, DictionaryError, Word};

use crate::{
    analytics::Analytics,
    error::LookupError,
    storage::Storage,
    word::{normalize, Difficulty, WordRecord},
};

/// Where definitions for unknown words come from.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    async fn fetch(&self, word: &str) -> Result<Word, DictionaryError>;
}

#[async_trait]
impl DefinitionSource for Dictionary {
    async fn fetch(&self, word: &str) -> Result<Word, DictionaryError> {
        self.get_definition(word).await
    }
}

/// Narrows a text search, every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub part_of_speech: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

impl SearchFilter {
    fn matches(&self, record: &WordRecord) -> bool {
        let part_of_speech = self
            .part_of_speech
            .as_deref()
            .map_or(true, |wanted| record.part_of_speech.as_deref() == Some(wanted));
        let difficulty = self
            .difficulty
            .map_or(true, |wanted| record.difficulty == Some(wanted));
        let category = self
            .category
            .as_deref()
            .map_or(true, |wanted| record.category.as_deref() == Some(wanted));
        part_of_speech && difficulty && category
    }
}

/// Window used by [`WordService::recent_analytics`].
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Local cache first, dictionary on a miss. Concurrent lookups of the same unknown word may
/// both fetch; the later upsert wins.
pub struct WordService<D = Dictionary> {
    storage: Storage,
    source: D,
}

impl<D: DefinitionSource> WordService<D> {
    pub fn new(storage: Storage, source: D) -> Self {
        Self { storage, source }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub async fn lookup(&self, word: &str) -> Result<WordRecord, LookupError> {
        let key = normalize(word).ok_or(LookupError::InvalidInput)?;
        if let Some(record) = self.storage.get_word(&key).await? {
            tracing::debug!(word = %key, "cache hit");
            return Ok(record);
        }

        tracing::debug!(word = %key, "cache miss, asking the dictionary");
        let remote = self
            .source
            .fetch(&key)
            .await
            .map_err(|error| LookupError::from_dictionary(&key, error))?;
        let record = WordRecord::from_definition(key, &remote, Utc::now().timestamp_millis());
        self.storage.upsert_word(&record).await?;
        tracing::info!(word = %record.word, difficulty = ?record.difficulty, "saved new word");
        Ok(record)
    }

    /// Flips the favorite flag and returns the new value. Unknown words, and any storage
    /// failure, report `false` without changing anything.
    pub async fn toggle_favorite(&self, word: &str) -> bool {
        let Some(key) = normalize(word) else {
            return false;
        };
        self.flip_favorite(&key).await.unwrap_or_else(|error| {
            tracing::warn!(word = %key, %error, "failed to toggle favorite");
            false
        })
    }

    async fn flip_favorite(&self, key: &str) -> sqlx::Result<bool> {
        let Some(record) = self.storage.get_word(key).await? else {
            return Ok(false);
        };
        let favorite = !record.is_favorite;
        self.storage.set_favorite(key, favorite).await?;
        Ok(favorite)
    }

    /// Counts a search of `word`. Failures are logged, never returned.
    pub async fn record_search(&self, word: &str) {
        let Some(key) = normalize(word) else {
            return;
        };
        let now = Utc::now().timestamp_millis();
        match self.storage.increment_search_count(&key, now).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(word = %key, "search recorded for unknown word"),
            Err(error) => tracing::warn!(word = %key, %error, "failed to record search"),
        }
    }

    /// A blank category clears it. Returns false for unknown words.
    pub async fn set_category(&self, word: &str, category: Option<&str>) -> sqlx::Result<bool> {
        let Some(key) = normalize(word) else {
            return Ok(false);
        };
        let category = category.map(str::trim).filter(|category| !category.is_empty());
        self.storage.set_category(&key, category).await
    }

    pub async fn word_of_the_day(&self, date: NaiveDate) -> sqlx::Result<Option<WordRecord>> {
        self.storage.word_of_the_day(date).await
    }

    pub async fn compute_analytics(&self, since: i64) -> sqlx::Result<Analytics> {
        let total_words = self.storage.total_count().await?;
        let favorite_count = self.storage.favorite_count().await?;
        let recent_searches = self.storage.searched_since(since).await?;
        let all_words = self.storage.all_words().await?;
        Ok(Analytics::new(
            total_words,
            favorite_count,
            recent_searches,
            &all_words,
        ))
    }

    pub async fn recent_analytics(&self) -> sqlx::Result<Analytics> {
        let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        self.compute_analytics(since.timestamp_millis()).await
    }

    pub async fn most_searched(&self, limit: u32) -> sqlx::Result<Vec<WordRecord>> {
        self.storage.most_searched(limit).await
    }

    pub async fn search_filtered(
        &self,
        query: &str,
        filter: &SearchFilter,
    ) -> sqlx::Result<Vec<WordRecord>> {
        let mut results = self.storage.search_words(query.trim()).await?;
        results.retain(|record| filter.matches(record));
        Ok(results)
    }

    /// Stored words that look like `word`, most similar first.
    pub async fn suggest(&self, word: &str, limit: usize) -> sqlx::Result<Vec<String>> {
        let Some(key) = normalize(word) else {
            return Ok(Vec::new());
        };
        let mut candidates = self
            .storage
            .all_words()
            .await?
            .into_iter()
            .map(|record| {
                let similarity = strsim::jaro_winkler(&record.word, &key);
                (record.word, similarity)
            })
            .filter(|(candidate, similarity)| *candidate != key && *similarity >= 0.8)
            .collect::<Vec<(String, f64)>>();
        // most similar at the start
        candidates.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        Ok(candidates
            .into_iter()
            .take(limit)
            .map(|(candidate, _)| candidate)
            .collect())
    }

    /// Favorites as a markdown document.
    pub async fn export_favorites(&self) -> sqlx::Result<String> {
        let favorites = self.storage.favorite_words().await?;
        let mut markdown = String::from("# My Favorite Words\n\n");
        for record in favorites {
            // writing into a String cannot fail
            let _ = write_favorite(&mut markdown, &record);
        }
        Ok(markdown)
    }
}

fn write_favorite(out: &mut String, record: &WordRecord) -> std::fmt::Result {
    writeln!(out, "## {}", record.display_word())?;
    writeln!(
        out,
        "**Part of Speech:** {}",
        record.part_of_speech.as_deref().unwrap_or("N/A")
    )?;
    writeln!(
        out,
        "**Pronunciation:** {}",
        record.pronunciation.as_deref().unwrap_or("N/A")
    )?;
    writeln!(out, "**Definition:** {}", record.definition)?;
    if let Some(example) = &record.example {
        writeln!(out, "**Example:** {example}")?;
    }
    if let Some(category) = &record.category {
        writeln!(out, "**Category:** {category}")?;
    }
    writeln!(out, "**Searched:** {} times\n", record.search_count)
}
