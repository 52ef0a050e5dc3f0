//! Source string table loading
//!
//! An ARB file is a flat JSON object:
//!
//! ```json
//! {
//!     "@@locale": "en",
//!     "greet": "Hello {name}",
//!     "@greet": { "placeholders": { "name": {} } },
//!     "bye": "Goodbye"
//! }
//! ```
//!
//! `@@locale` names the table's own locale, other `@`-prefixed keys carry metadata for
//! the message of the same name, and everything else is a translatable message. Keys are
//! classified once here so nothing downstream has to re-inspect prefixes.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Reserved key carrying the table's locale identifier
pub const LOCALE_KEY: &str = "@@locale";

/// Prefix marking metadata keys
pub const METADATA_PREFIX: char = '@';

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read source table '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse source table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Source table root must be a JSON object")]
    NotAnObject,
    #[error("Value of '@@locale' must be a string")]
    InvalidLocaleTag,
    #[error("Message '{0}' is not a string")]
    InvalidMessage(String),
}

/// One classified entry of a source table
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Message text to be translated
    Translatable(String),
    /// Metadata value copied through untouched
    Metadata(Value),
    /// The table's own locale identifier
    LocaleTag(String),
}

/// Ordered, immutable source string table
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    entries: Vec<(String, Entry)>,
}

impl SourceTable {
    /// Load and classify an ARB file from disk
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let content = fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            entries = table.len(),
            translatable = table.translatable_count(),
            "Loaded source table"
        );
        Ok(table)
    }

    /// Parse and classify an ARB document, preserving its key order
    pub fn from_json_str(content: &str) -> Result<Self, TableError> {
        let json: Value = serde_json::from_str(content)?;
        let Value::Object(obj) = json else {
            return Err(TableError::NotAnObject);
        };
        Self::from_map(obj)
    }

    fn from_map(obj: Map<String, Value>) -> Result<Self, TableError> {
        let mut entries = Vec::with_capacity(obj.len());

        for (key, value) in obj {
            let entry = if key == LOCALE_KEY {
                match value {
                    Value::String(tag) => Entry::LocaleTag(tag),
                    _ => return Err(TableError::InvalidLocaleTag),
                }
            } else if key.starts_with(METADATA_PREFIX) {
                Entry::Metadata(value)
            } else {
                match value {
                    Value::String(text) => Entry::Translatable(text),
                    _ => return Err(TableError::InvalidMessage(key)),
                }
            };
            entries.push((key, entry));
        }

        Ok(Self { entries })
    }

    /// Make sure the table carries a locale tag, inserting `default_locale` up front
    /// when the file had none.
    pub fn with_locale_tag(mut self, default_locale: &str) -> Self {
        if self.locale_tag().is_none() {
            warn!(
                locale = default_locale,
                "Source table has no '{}' entry, assuming the configured source locale",
                LOCALE_KEY
            );
            self.entries.insert(
                0,
                (
                    LOCALE_KEY.to_string(),
                    Entry::LocaleTag(default_locale.to_string()),
                ),
            );
        }
        self
    }

    /// The table's own locale tag, if it has one
    pub fn locale_tag(&self) -> Option<&str> {
        self.entries.iter().find_map(|(_, entry)| match entry {
            Entry::LocaleTag(tag) => Some(tag.as_str()),
            _ => None,
        })
    }

    /// All entries in file order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// All keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn translatable_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Translatable(_)))
            .count()
    }
}
