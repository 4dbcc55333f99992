use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate, TimeZone};

use crate::word::WordRecord;

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub total_words: i64,
    pub favorite_count: i64,
    /// Searches of recently searched words divided by every stored word.
    pub average_searches: f64,
    pub recent_searches: Vec<WordRecord>,
    pub category_breakdown: BTreeMap<String, usize>,
}

impl Analytics {
    pub fn new(
        total_words: i64,
        favorite_count: i64,
        recent_searches: Vec<WordRecord>,
        all_words: &[WordRecord],
    ) -> Self {
        let average_searches = if total_words > 0 {
            let recent_total: i64 = recent_searches.iter().map(|record| record.search_count).sum();
            recent_total as f64 / total_words as f64
        } else {
            0.0
        };
        let mut category_breakdown = BTreeMap::new();
        for record in all_words {
            let category = record.category.as_deref().unwrap_or(UNCATEGORIZED);
            *category_breakdown.entry(category.to_string()).or_insert(0) += 1;
        }
        Self {
            total_words,
            favorite_count,
            average_searches,
            recent_searches,
            category_breakdown,
        }
    }

    /// Consecutive days with at least one search, ending today or yesterday, in local time.
    pub fn learning_streak(&self, today: NaiveDate) -> u32 {
        let days = self.recent_searches.iter().filter_map(|record| {
            Local
                .timestamp_millis_opt(record.last_searched)
                .single()
                .map(|searched| searched.date_naive())
        });
        learning_streak(days, today)
    }
}

pub fn learning_streak(days: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = days.into_iter().collect();
    let mut days = days.into_iter().rev().skip_while(|day| *day > today).peekable();
    let mut expected = match days.peek() {
        Some(&day) if day == today || Some(day) == today.pred_opt() => day,
        _ => return 0,
    };
    let mut streak = 0;
    for day in days {
        if day != expected {
            break;
        }
        streak += 1;
        match day.pred_opt() {
            Some(previous) => expected = previous,
            None => break,
        }
    }
    streak
}
