//! Vocabulary lookups cached in SQLite, with favorites, categories, search analytics and a
//! daily word of the day.

pub mod analytics;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod service;
pub mod session;
pub mod storage;
pub mod utilities;
pub mod word;
pub mod word_of_the_day;

#[cfg(test)]
mod test_support;

pub use analytics::Analytics;
pub use error::{LookupError, RetryableJobFailure};
pub use service::{DefinitionSource, SearchFilter, WordService};
pub use session::{SearchSession, SearchState};
pub use storage::Storage;
pub use word::{Difficulty, WordRecord};
pub use word_of_the_day::{JobOutcome, Notification, Notifier, WordOfTheDayJob};
