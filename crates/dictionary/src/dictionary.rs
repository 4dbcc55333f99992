use std::fmt;

#[derive(Debug, Clone)]
pub struct Word {
    pub word: String,
    pub phonetics: Vec<Phonetic>,
    pub origin: Option<String>,
    pub meanings: Vec<WordMeaning>,
}

impl Word {
    pub fn first_meaning(&self) -> Option<&WordMeaning> {
        self.meanings.first()
    }

    pub fn first_definition(&self) -> Option<&WordDefinition> {
        self.first_meaning()
            .and_then(|meaning| meaning.definitions.first())
    }

    /// Text of the first phonetic entry, which may itself be missing.
    pub fn pronunciation(&self) -> Option<&str> {
        self.phonetics
            .first()
            .and_then(|phonetic| phonetic.text.as_deref())
    }

    /// Synonyms attached to the first meaning and to its first definition, without duplicates.
    pub fn primary_synonyms(&self) -> Vec<&str> {
        let mut synonyms: Vec<&str> = Vec::new();
        let Some(meaning) = self.first_meaning() else {
            return synonyms;
        };
        let definition_synonyms = meaning
            .definitions
            .first()
            .map(|definition| definition.synonyms.as_slice())
            .unwrap_or_default();
        for synonym in meaning.synonyms.iter().chain(definition_synonyms) {
            if !synonyms.contains(&&synonym[..]) {
                synonyms.push(synonym);
            }
        }
        synonyms
    }
}

#[derive(Debug, Clone)]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WordMeaning {
    pub part_of_speech: PartOfSpeech,
    pub definitions: Vec<WordDefinition>,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    Pronoun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
    Interjection,
    /// Anything else the dictionary reports, e.g. "exclamation".
    Other(String),
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Other(other) => other,
        }
    }
}

impl From<&str> for PartOfSpeech {
    fn from(value: &str) -> Self {
        match &value.trim().to_lowercase()[..] {
            "noun" => PartOfSpeech::Noun,
            "pronoun" => PartOfSpeech::Pronoun,
            "verb" => PartOfSpeech::Verb,
            "adjective" => PartOfSpeech::Adjective,
            "adverb" => PartOfSpeech::Adverb,
            "preposition" => PartOfSpeech::Preposition,
            "conjunction" => PartOfSpeech::Conjunction,
            "interjection" => PartOfSpeech::Interjection,
            other => PartOfSpeech::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct WordDefinition {
    pub definition: String,
    pub example: Option<String>,
    pub synonyms: Vec<String>,
}
