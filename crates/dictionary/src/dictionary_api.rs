// https://dictionaryapi.dev/ - free, no key, returns an array of entries per word
// 404 responses carry a {"title", "message", "resolution"} body

use serde::Deserialize;

use crate::{
    dictionary::{PartOfSpeech, Phonetic, Word, WordDefinition, WordMeaning},
    DictionaryError, NotFoundError,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ApiWord {
    word: String,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    origin: Option<String>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    text: Option<String>,
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    definition: String,
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiNotFound {
    message: String,
}

impl From<ApiWord> for Word {
    fn from(value: ApiWord) -> Self {
        Word {
            word: value.word,
            phonetics: value
                .phonetics
                .into_iter()
                .map(|phonetic| Phonetic {
                    // the api sends "" rather than omitting the field
                    text: phonetic.text.filter(|text| !text.is_empty()),
                    audio: phonetic.audio.filter(|audio| !audio.is_empty()),
                })
                .collect(),
            origin: value.origin,
            meanings: value
                .meanings
                .into_iter()
                .map(|meaning| WordMeaning {
                    part_of_speech: PartOfSpeech::from(&meaning.part_of_speech[..]),
                    definitions: meaning
                        .definitions
                        .into_iter()
                        .map(|definition| WordDefinition {
                            definition: definition.definition,
                            example: definition.example,
                            synonyms: definition.synonyms,
                        })
                        .collect(),
                    synonyms: meaning.synonyms,
                })
                .collect(),
        }
    }
}

pub(crate) fn entry_url(base_url: &str, word: &str) -> Result<reqwest::Url, DictionaryError> {
    let invalid = || DictionaryError::InvalidBaseUrl(base_url.to_string());
    let mut url = reqwest::Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(word);
    Ok(url)
}

pub(crate) async fn get_definition(
    client: &reqwest::Client,
    base_url: &str,
    word: &str,
) -> Result<Word, DictionaryError> {
    let url = entry_url(base_url, word)?;
    tracing::debug!(%url, "requesting definition");
    let res = client.get(url).send().await.map_err(DictionaryError::Fetch)?;
    let status = res.status();
    if !status.is_success() {
        let message = match res.json::<ApiNotFound>().await {
            Ok(body) => body.message,
            Err(_) => format!("The dictionary responded with {status} for {word:?}."),
        };
        return Err(DictionaryError::NotFound(NotFoundError { message }));
    }
    let entries = res
        .json::<Vec<ApiWord>>()
        .await
        .map_err(DictionaryError::Deserialize)?;
    first_entry(entries, word)
}

fn first_entry(entries: Vec<ApiWord>, word: &str) -> Result<Word, DictionaryError> {
    entries.into_iter().next().map(Word::from).ok_or_else(|| {
        DictionaryError::NotFound(NotFoundError {
            message: format!("No definitions found for {word:?}."),
        })
    })
}
