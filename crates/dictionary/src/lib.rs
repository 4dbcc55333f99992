use dictionary_api::get_definition;

mod dictionary;
mod dictionary_api;

pub use dictionary::{PartOfSpeech, Phonetic, Word, WordDefinition, WordMeaning};

pub const DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to reach the dictionary: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("unexpected response from the dictionary: {0}")]
    Deserialize(#[source] reqwest::Error),
    #[error("{0}")]
    NotFound(NotFoundError),
    #[error("invalid dictionary url {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    pub message: String,
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Client for the free dictionary API. One call to [`Dictionary::get_definition`] is
/// exactly one HTTP request; retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct Dictionary {
    client: reqwest::Client,
    base_url: String,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DICTIONARY_API_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, DictionaryError> {
        // reject unusable urls up front instead of on the first lookup
        dictionary_api::entry_url(base_url, "probe")?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_definition(&self, word: &str) -> Result<Word, DictionaryError> {
        get_definition(&self.client, &self.base_url, word).await
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
