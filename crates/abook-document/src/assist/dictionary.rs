// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word definitions from the Free Dictionary API, with an offline fallback.
//
// Lookups never fail: network trouble, unknown words and malformed responses
// all come back as a `WordLookup` with `found == false` and an `error`
// message the UI can show as is.

use std::collections::HashMap;
use std::time::Duration;

use abook_core::error::{AbookError, Result};
use reqwest::{StatusCode, Url};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

pub const MAX_DEFINITIONS: usize = 3;
pub const MAX_SYNONYMS: usize = 5;
pub const MAX_ANTONYMS: usize = 5;

const NOT_FOUND: &str = "Word not found in dictionary";
const UNREACHABLE: &str = "Could not connect to dictionary service";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub part_of_speech: String,
    pub definition: String,
    pub example: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LookupSource {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordLookup {
    pub word: String,
    pub found: bool,
    pub phonetic: Option<String>,
    pub definitions: Vec<Definition>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub error: Option<String>,
    pub source: LookupSource,
}

impl WordLookup {
    pub fn not_found(word: &str, error: impl Into<String>) -> Self {
        Self {
            word: word.to_owned(),
            found: false,
            phonetic: None,
            definitions: Vec::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            error: Some(error.into()),
            source: LookupSource::Online,
        }
    }
}

// -- API response shape ------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    #[serde(default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, items: &[String], limit: usize) {
    for item in items {
        if list.len() >= limit {
            return;
        }
        if !item.is_empty() && !list.contains(item) {
            list.push(item.clone());
        }
    }
}

/// Turn an API response body into a lookup. Only the first entry is used.
pub fn parse_response(word: &str, body: &str) -> Result<WordLookup> {
    let entries: Vec<ApiEntry> = serde_json::from_str(body)?;
    let Some(entry) = entries.into_iter().next() else {
        return Ok(WordLookup::not_found(word, NOT_FOUND));
    };

    let mut definitions = Vec::new();
    let mut synonyms = Vec::new();
    let mut antonyms = Vec::new();
    for meaning in &entry.meanings {
        for def in &meaning.definitions {
            if definitions.len() < MAX_DEFINITIONS {
                definitions.push(Definition {
                    part_of_speech: meaning.part_of_speech.clone(),
                    definition: def.definition.clone(),
                    example: def.example.clone().filter(|e| !e.is_empty()),
                });
            }
            push_unique(&mut synonyms, &def.synonyms, MAX_SYNONYMS);
            push_unique(&mut antonyms, &def.antonyms, MAX_ANTONYMS);
        }
        push_unique(&mut synonyms, &meaning.synonyms, MAX_SYNONYMS);
        push_unique(&mut antonyms, &meaning.antonyms, MAX_ANTONYMS);
    }

    let phonetic = entry
        .phonetic
        .filter(|p| !p.is_empty())
        .or_else(|| {
            entry
                .phonetics
                .into_iter()
                .find_map(|p| p.text.filter(|t| !t.is_empty()))
        });

    Ok(WordLookup {
        word: if entry.word.is_empty() { word.to_owned() } else { entry.word },
        found: true,
        phonetic,
        definitions,
        synonyms,
        antonyms,
        error: None,
        source: LookupSource::Online,
    })
}

// -- Offline fallback --------------------------------------------------------

const OFFLINE_DEFINITIONS: &[(&str, &str)] = &[
    ("book", "A written or printed work consisting of pages"),
    ("create", "To bring something into existence"),
    ("draw", "To produce a picture or diagram"),
    ("hello", "A greeting or expression of goodwill"),
    ("learn", "To gain knowledge or skill by studying"),
    ("note", "A brief record of something written down"),
    ("read", "To look at and understand written words"),
    ("think", "To have a particular opinion or idea"),
    ("world", "The earth and all its inhabitants"),
    ("write", "To mark letters, words, or symbols on a surface"),
];

/// Built-in definitions used when the service cannot be reached.
pub fn offline_lookup(word: &str) -> Option<WordLookup> {
    let word = word.trim().to_lowercase();
    let (_, definition) = OFFLINE_DEFINITIONS.iter().find(|(w, _)| *w == word)?;
    Some(WordLookup {
        definitions: vec![Definition {
            part_of_speech: String::new(),
            definition: (*definition).to_owned(),
            example: None,
        }],
        found: true,
        error: None,
        source: LookupSource::Offline,
        ..WordLookup::not_found(&word, "")
    })
}

// -- Client ------------------------------------------------------------------

/// Blocking dictionary client with a per-session cache of successful lookups.
pub struct DictionaryClient {
    client: Client,
    base_url: Url,
    cache: HashMap<String, WordLookup>,
}

impl DictionaryClient {
    /// `base_url` gets the word appended as one path segment, e.g.
    /// `https://api.dictionaryapi.dev/api/v2/entries/en/`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AbookError::InvalidArgument(format!("dictionary URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AbookError::InvalidArgument(format!(
                "dictionary URL {base_url} cannot take a word path"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("abook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AbookError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            cache: HashMap::new(),
        })
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    #[instrument(skip(self))]
    pub fn lookup(&mut self, word: &str) -> WordLookup {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return WordLookup::not_found(&word, NOT_FOUND);
        }
        if let Some(hit) = self.cache.get(&word) {
            debug!("dictionary cache hit");
            return hit.clone();
        }

        let result = match self.fetch(&word) {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(error = %e, "dictionary lookup failed");
                let message = match e {
                    AbookError::Network(_) => UNREACHABLE.to_owned(),
                    other => other.to_string(),
                };
                offline_lookup(&word).unwrap_or_else(|| WordLookup::not_found(&word, message))
            }
        };

        if result.found {
            info!(source = ?result.source, definitions = result.definitions.len(), "word defined");
            self.cache.insert(word, result.clone());
        }
        result
    }

    /// Entry URL for `word`, percent-encoded as a single path segment.
    fn entry_url(&self, word: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(word);
        }
        url
    }

    fn fetch(&self, word: &str) -> Result<WordLookup> {
        let url = self.entry_url(word);
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| AbookError::Network(format!("GET {url}: {e}")))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .text()
                    .map_err(|e| AbookError::Network(format!("reading {url}: {e}")))?;
                parse_response(word, &body)
            }
            StatusCode::NOT_FOUND => {
                Ok(offline_lookup(word).unwrap_or_else(|| WordLookup::not_found(word, NOT_FOUND)))
            }
            status => Err(AbookError::Network(format!("GET {url}: HTTP {status}"))),
        }
    }
}
