use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::NaiveDate;
use dictionary::{DictionaryError, NotFoundError, PartOfSpeech, Phonetic, Word, WordDefinition, WordMeaning};
use wordbook::{
    DefinitionSource, Difficulty, JobOutcome, Notification, Notifier, SearchSession, Storage,
    WordOfTheDayJob, WordService,
};

#[derive(Default)]
struct StaticDictionary {
    words: HashMap<&'static str, (&'static str, &'static str)>,
    calls: AtomicUsize,
}

impl StaticDictionary {
    fn with(words: &[(&'static str, &'static str, &'static str)]) -> Self {
        Self {
            words: words
                .iter()
                .map(|(word, part_of_speech, definition)| (*word, (*part_of_speech, *definition)))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DefinitionSource for StaticDictionary {
    async fn fetch(&self, word: &str) -> Result<Word, DictionaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some((part_of_speech, definition)) = self.words.get(word) else {
            return Err(DictionaryError::NotFound(NotFoundError {
                message: "No Definitions Found".to_string(),
            }));
        };
        Ok(Word {
            word: word.to_string(),
            phonetics: vec![Phonetic {
                text: None,
                audio: Some("https://example.com/audio.mp3".to_string()),
            }],
            origin: Some("mid 18th century".to_string()),
            meanings: vec![WordMeaning {
                part_of_speech: PartOfSpeech::from(*part_of_speech),
                definitions: vec![WordDefinition {
                    definition: definition.to_string(),
                    example: None,
                    synonyms: vec![],
                }],
                synonyms: vec![],
            }],
        })
    }
}

#[derive(Default)]
struct Inbox(Mutex<Vec<Notification>>);

impl Notifier for Inbox {
    fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

async fn service(dictionary: StaticDictionary) -> Arc<WordService<StaticDictionary>> {
    let storage = Storage::in_memory().await.unwrap();
    Arc::new(WordService::new(storage, dictionary))
}

#[tokio::test]
async fn search_save_favorite_and_analyze() {
    let service = service(StaticDictionary::with(&[
        ("serendipity", "noun", "the occurrence of events by chance in a happy way"),
        ("cat", "noun", "a small domesticated carnivorous mammal"),
    ]))
    .await;
    let session = SearchSession::new(service.clone());

    session.search("Serendipity").await;
    let found = session.current().result.unwrap();
    assert_eq!(found.word, "serendipity");
    assert_eq!(found.difficulty, Some(Difficulty::Hard));
    assert_eq!(found.part_of_speech.as_deref(), Some("noun"));
    assert_eq!(found.pronunciation, None);
    assert_eq!(found.etymology.as_deref(), Some("mid 18th century"));

    session.search("cat").await;
    assert_eq!(session.current().result.unwrap().difficulty, Some(Difficulty::Easy));
    session.search("serendipity").await;
    assert_eq!(service.storage().total_count().await.unwrap(), 2);

    assert!(service.toggle_favorite("serendipity").await);
    service.set_category("cat", Some("animals")).await.unwrap();

    let analytics = service.compute_analytics(0).await.unwrap();
    assert_eq!(analytics.total_words, 2);
    assert_eq!(analytics.favorite_count, 1);
    assert_eq!(analytics.recent_searches.len(), 2);
    // three searches over two words
    assert_eq!(analytics.average_searches, 1.5);
    assert_eq!(analytics.category_breakdown.get("animals"), Some(&1));
    assert_eq!(analytics.category_breakdown.get("Uncategorized"), Some(&1));

    let top = service.most_searched(1).await.unwrap();
    assert_eq!(top[0].word, "serendipity");
    assert_eq!(top[0].search_count, 2);
}

#[tokio::test]
async fn empty_store_analytics() {
    let service = service(StaticDictionary::default()).await;
    let analytics = service.compute_analytics(0).await.unwrap();
    assert_eq!(analytics.total_words, 0);
    assert_eq!(analytics.average_searches, 0.0);
    assert!(analytics.category_breakdown.is_empty());
    assert!(analytics.recent_searches.is_empty());
}

#[tokio::test]
async fn unknown_word_leaves_store_untouched() {
    let service = service(StaticDictionary::default()).await;
    let session = SearchSession::new(service.clone());
    session.search("flibbertigibbet").await;
    let state = session.current();
    assert!(state.error.is_some());
    assert_eq!(state.result, None);
    assert_eq!(service.storage().total_count().await.unwrap(), 0);
}

#[tokio::test]
async fn daily_job_picks_once_per_day() {
    let dictionary = StaticDictionary::with(&[("ephemeral", "adjective", "lasting for a very short time")]);
    let service = service(dictionary).await;
    let inbox = Arc::new(Inbox::default());
    let job = WordOfTheDayJob::new(service.clone(), inbox.clone());
    let today = NaiveDate::from_ymd_opt(2025, 1, 21).unwrap();

    let outcome = job.run_once_per_day(today).await.unwrap();
    let JobOutcome::Notified(notification) = outcome else {
        panic!("expected a notification");
    };
    assert_eq!(notification.title, "Word of the Day: Ephemeral");
    assert_eq!(notification.summary, "lasting for a very short time");
    assert_eq!(job.run_once_per_day(today).await.unwrap(), JobOutcome::AlreadyRan);
    assert_eq!(inbox.0.lock().unwrap().len(), 1);

    let chosen = service.word_of_the_day(today).await.unwrap().unwrap();
    assert_eq!(chosen.word, "ephemeral");
    assert!(chosen.is_word_of_the_day);
}
