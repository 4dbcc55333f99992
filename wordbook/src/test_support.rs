use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use dictionary::{DictionaryError, NotFoundError, PartOfSpeech, Phonetic, Word, WordDefinition, WordMeaning};

use crate::{
    service::{DefinitionSource, WordService},
    storage::Storage,
    word::WordRecord,
};

pub fn remote_word(word: &str, definition: &str) -> Word {
    Word {
        word: word.to_string(),
        phonetics: vec![Phonetic {
            text: Some(format!("/{word}/")),
            audio: None,
        }],
        origin: None,
        meanings: vec![WordMeaning {
            part_of_speech: PartOfSpeech::Noun,
            definitions: vec![WordDefinition {
                definition: definition.to_string(),
                example: Some(format!("an example using {word}")),
                synonyms: vec!["chance".to_string()],
            }],
            synonyms: vec!["fluke".to_string(), "chance".to_string()],
        }],
    }
}

pub fn record(word: &str, definition: &str) -> WordRecord {
    WordRecord {
        word: word.to_string(),
        definition: definition.to_string(),
        pronunciation: None,
        part_of_speech: None,
        is_favorite: false,
        date_added: 0,
        category: None,
        difficulty: None,
        is_word_of_the_day: false,
        word_of_the_day_date: None,
        search_count: 0,
        last_searched: 0,
        example: None,
        synonyms: None,
        etymology: None,
    }
}

/// In-process dictionary that counts how often it is asked.
#[derive(Debug, Clone, Default)]
pub struct FakeSource {
    entries: Arc<HashMap<String, String>>,
    offline: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn knowing(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: Arc::new(
                entries
                    .iter()
                    .map(|(word, definition)| (word.to_string(), definition.to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DefinitionSource for FakeSource {
    async fn fetch(&self, word: &str) -> Result<Word, DictionaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(DictionaryError::InvalidBaseUrl("offline".to_string()));
        }
        match self.entries.get(word) {
            Some(definition) => Ok(remote_word(word, definition)),
            None => Err(DictionaryError::NotFound(NotFoundError {
                message: format!("No definitions found for {word:?}."),
            })),
        }
    }
}

pub async fn service_with(source: FakeSource) -> (WordService<FakeSource>, FakeSource) {
    let storage = Storage::in_memory().await.unwrap();
    (WordService::new(storage, source.clone()), source)
}
