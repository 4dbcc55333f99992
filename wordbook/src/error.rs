use dictionary::DictionaryError;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Please enter a word to search")]
    InvalidInput,
    #[error("Couldn't find a definition for {0:?}")]
    NotFound(String),
    #[error("Couldn't reach the dictionary: {0}")]
    Transport(#[source] DictionaryError),
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl LookupError {
    pub(crate) fn from_dictionary(word: &str, error: DictionaryError) -> Self {
        match error {
            DictionaryError::NotFound(_) => LookupError::NotFound(word.to_string()),
            other => LookupError::Transport(other),
        }
    }
}

/// Every failure of the word of the day job is worth retrying later.
#[derive(Debug, thiserror::Error)]
pub enum RetryableJobFailure {
    #[error("word of the day lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("word of the day storage failed: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("word of the day notification failed: {0}")]
    Notify(#[source] anyhow::Error),
}
