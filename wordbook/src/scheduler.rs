use std::{sync::Arc, time::Duration};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tokio::task::JoinHandle;

use crate::{
    service::DefinitionSource,
    word_of_the_day::{JobOutcome, WordOfTheDayJob},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(30),
            max_backoff: Duration::from_secs(60 * 60),
            max_attempts: 6,
        }
    }
}

/// Time from `now` until the next `hour`:00, always strictly in the future.
pub fn delay_until_hour(now: NaiveDateTime, hour: u32) -> chrono::Duration {
    let at = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let mut next = now.date().and_time(at);
    if next <= now {
        next += chrono::Duration::days(1);
    }
    next - now
}

/// Fires the word of the day job once a day at a fixed local hour. The delay is recomputed from
/// the wall clock before every sleep, so suspends and restarts only shift the next run.
pub struct DailyScheduler<D> {
    job: Arc<WordOfTheDayJob<D>>,
    hour: u32,
    retry: RetryPolicy,
}

impl<D: DefinitionSource + 'static> DailyScheduler<D> {
    pub fn new(job: Arc<WordOfTheDayJob<D>>, hour: u32) -> Self {
        Self {
            job,
            hour,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let delay = delay_until_hour(Local::now().naive_local(), self.hour);
                tracing::debug!(minutes = delay.num_minutes(), "next word of the day run scheduled");
                tokio::time::sleep(delay.to_std().unwrap_or_default()).await;
                self.run_with_retry(Local::now().date_naive()).await;
            }
        })
    }

    /// Retries failed runs with exponential backoff. `None` once every attempt has failed.
    pub async fn run_with_retry(&self, today: NaiveDate) -> Option<JobOutcome> {
        let mut backoff = self.retry.initial_backoff;
        for attempt in 1..=self.retry.max_attempts {
            match self.job.run_once_per_day(today).await {
                Ok(outcome) => return Some(outcome),
                Err(error) => {
                    tracing::warn!(attempt, %error, "word of the day run failed");
                }
            }
            if attempt < self.retry.max_attempts {
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(self.retry.max_backoff);
            }
        }
        tracing::warn!(%today, "giving up on today's word of the day");
        None
    }
}
