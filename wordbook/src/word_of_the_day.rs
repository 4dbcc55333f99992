use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tokio::sync::Mutex;

use crate::{
    error::RetryableJobFailure,
    service::{DefinitionSource, WordService},
    word::WordRecord,
};

pub const JOB_NAME: &str = "word_of_the_day";

/// Candidates, one per day of the year, wrapping around every twenty days.
pub const DAILY_WORDS: [&str; 20] = [
    "serendipity",
    "ephemeral",
    "mellifluous",
    "wanderlust",
    "petrichor",
    "solitude",
    "luminous",
    "resilience",
    "tranquil",
    "eloquent",
    "magnificent",
    "harmonious",
    "ethereal",
    "profound",
    "sublime",
    "vivacious",
    "enigmatic",
    "pristine",
    "serene",
    "majestic",
];

const SUMMARY_LENGTH: usize = 100;

pub fn candidate_for(date: NaiveDate) -> &'static str {
    DAILY_WORDS[date.ordinal() as usize % DAILY_WORDS.len()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub summary: String,
    pub details: String,
    /// Word to open the lookup flow with.
    pub deep_link: String,
}

impl Notification {
    pub fn for_word(record: &WordRecord) -> Self {
        let mut summary: String = record.definition.chars().take(SUMMARY_LENGTH).collect();
        if record.definition.chars().count() > SUMMARY_LENGTH {
            summary.push_str("...");
        }
        Self {
            title: format!("Word of the Day: {}", record.display_word()),
            summary,
            details: format!(
                "{}\n\nPronunciation: {}\nPart of Speech: {}",
                record.definition,
                record.pronunciation.as_deref().unwrap_or("N/A"),
                record.part_of_speech.as_deref().unwrap_or("N/A"),
            ),
            deep_link: record.word.clone(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Notified(Notification),
    /// Today's run already succeeded, nothing was sent.
    AlreadyRan,
    /// Another run is in progress.
    Busy,
}

pub struct WordOfTheDayJob<D> {
    service: Arc<WordService<D>>,
    notifier: Arc<dyn Notifier>,
    running: Mutex<()>,
}

impl<D: DefinitionSource> WordOfTheDayJob<D> {
    pub fn new(service: Arc<WordService<D>>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            running: Mutex::new(()),
        }
    }

    /// Runs [`WordOfTheDayJob::run`] unless another run is active or today already succeeded,
    /// and remembers a success so a restart on the same day does not notify twice.
    pub async fn run_once_per_day(&self, today: NaiveDate) -> Result<JobOutcome, RetryableJobFailure> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::debug!("word of the day job already running");
            return Ok(JobOutcome::Busy);
        };
        let storage = self.service.storage();
        if storage.last_job_success(JOB_NAME).await? == Some(today) {
            tracing::debug!(%today, "word of the day already sent");
            return Ok(JobOutcome::AlreadyRan);
        }
        let notification = self.run(today).await?;
        storage.record_job_success(JOB_NAME, today).await?;
        Ok(JobOutcome::Notified(notification))
    }

    pub async fn run(&self, today: NaiveDate) -> Result<Notification, RetryableJobFailure> {
        let storage = self.service.storage();
        if let Some(existing) = storage.word_of_the_day(today).await? {
            tracing::info!(word = %existing.word, %today, "word of the day already chosen");
            return self.send(&existing);
        }

        storage.clear_word_of_the_day().await?;
        let candidate = candidate_for(today);
        let record = self.service.lookup(candidate).await?;
        storage.set_word_of_the_day(&record.word, today).await?;
        let flagged = storage.get_word(&record.word).await?;
        let record = flagged.unwrap_or(WordRecord {
            is_word_of_the_day: true,
            word_of_the_day_date: Some(today),
            ..record
        });
        tracing::info!(word = %record.word, %today, "chose word of the day");
        self.send(&record)
    }

    fn send(&self, record: &WordRecord) -> Result<Notification, RetryableJobFailure> {
        let notification = Notification::for_word(record);
        self.notifier
            .notify(&notification)
            .map_err(RetryableJobFailure::Notify)?;
        Ok(notification)
    }
}
