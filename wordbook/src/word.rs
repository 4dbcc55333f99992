use std::fmt;

use chrono::NaiveDate;
use sqlx::FromRow;

/// Rough difficulty guess from the word and definition lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The easy rule is checked before the hard one, so a four letter word with a 200 character
    /// definition is still hard but a short word with a short definition never is.
    pub fn classify(word: &str, definition: &str) -> Self {
        let word_length = word.chars().count();
        let definition_length = definition.chars().count();
        if word_length <= 4 && definition_length <= 50 {
            Difficulty::Easy
        } else if word_length > 8 || definition_length > 150 {
            Difficulty::Hard
        } else {
            Difficulty::Medium
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.trim().to_lowercase()[..] {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty {other:?}, expected easy, medium or hard")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WordRecord {
    pub word: String,
    pub definition: String,
    pub pronunciation: Option<String>,
    pub part_of_speech: Option<String>,
    pub is_favorite: bool,
    /// Milliseconds since the unix epoch.
    pub date_added: i64,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub is_word_of_the_day: bool,
    pub word_of_the_day_date: Option<NaiveDate>,
    pub search_count: i64,
    /// Milliseconds since the unix epoch, 0 when never searched.
    pub last_searched: i64,
    pub example: Option<String>,
    /// Comma separated.
    pub synonyms: Option<String>,
    pub etymology: Option<String>,
}

impl WordRecord {
    /// Folds a dictionary payload into a fresh record stored under `key`.
    pub fn from_definition(key: String, word: &dictionary::Word, now: i64) -> Self {
        let first_definition = word.first_definition();
        let definition = first_definition
            .map(|definition| definition.definition.clone())
            .unwrap_or_default();
        let synonyms = word.primary_synonyms();
        Self {
            difficulty: Some(Difficulty::classify(&key, &definition)),
            pronunciation: word.pronunciation().map(str::to_string),
            part_of_speech: word
                .first_meaning()
                .map(|meaning| meaning.part_of_speech.to_string()),
            example: first_definition.and_then(|definition| definition.example.clone()),
            synonyms: (!synonyms.is_empty()).then(|| synonyms.join(", ")),
            etymology: word.origin.clone().filter(|origin| !origin.is_empty()),
            word: key,
            definition,
            is_favorite: false,
            date_added: now,
            category: None,
            is_word_of_the_day: false,
            word_of_the_day_date: None,
            search_count: 0,
            last_searched: 0,
        }
    }

    /// The word with its first letter uppercased, for titles.
    pub fn display_word(&self) -> String {
        capitalize(&self.word)
    }
}

/// Trims and lowercases a query, `None` when nothing is left.
pub fn normalize(word: &str) -> Option<String> {
    let word = word.trim();
    if word.is_empty() {
        None
    } else {
        Some(word.to_lowercase())
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::remote_word;
    use dictionary::Word;

    #[test]
    fn difficulty_follows_lengths() {
        assert_eq!(Difficulty::classify("cat", "a small domesticated feline"), Difficulty::Easy);
        assert_eq!(Difficulty::classify("abcdefghij", "short"), Difficulty::Hard);
        assert_eq!(Difficulty::classify("abcdefghij", &"x".repeat(10)), Difficulty::Hard);
        assert_eq!(Difficulty::classify("sphinx", &"d".repeat(40)), Difficulty::Medium);
        assert_eq!(Difficulty::classify("cat", &"d".repeat(51)), Difficulty::Medium);
        assert_eq!(Difficulty::classify("cat", &"d".repeat(151)), Difficulty::Hard);
        assert_eq!(
            Difficulty::classify(
                "serendipity",
                "the occurrence of events by chance in a happy way"
            ),
            Difficulty::Hard
        );
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Serendipity \n"), Some("serendipity".to_string()));
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn record_takes_first_entries() {
        let record = WordRecord::from_definition(
            "fortuity".to_string(),
            &remote_word("Fortuity", "a chance occurrence"),
            1_700_000_000_000,
        );
        assert_eq!(record.word, "fortuity");
        assert_eq!(record.definition, "a chance occurrence");
        assert_eq!(record.pronunciation.as_deref(), Some("/Fortuity/"));
        assert_eq!(record.part_of_speech.as_deref(), Some("noun"));
        assert_eq!(record.example.as_deref(), Some("an example using Fortuity"));
        assert_eq!(record.synonyms.as_deref(), Some("fluke, chance"));
        assert_eq!(record.difficulty, Some(Difficulty::Medium));
        assert_eq!(record.date_added, 1_700_000_000_000);
        assert_eq!(record.search_count, 0);
        assert_eq!(record.last_searched, 0);
        assert!(!record.is_favorite);
        assert!(!record.is_word_of_the_day);
    }

    #[test]
    fn record_from_empty_payload() {
        let word = Word {
            word: "void".to_string(),
            phonetics: vec![],
            origin: None,
            meanings: vec![],
        };
        let record = WordRecord::from_definition("void".to_string(), &word, 0);
        assert_eq!(record.definition, "");
        assert_eq!(record.pronunciation, None);
        assert_eq!(record.part_of_speech, None);
        assert_eq!(record.example, None);
        assert_eq!(record.synonyms, None);
        assert_eq!(record.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("ephemeral"), "Ephemeral");
        assert_eq!(capitalize(""), "");
    }
}
