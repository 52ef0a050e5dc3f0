use serde_json::{Map, Value};

/// The translated string table for one target locale.
///
/// Keys keep the order they were inserted in, which the worker makes match the source
/// table, so serializing the same inputs always yields the same bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedDocument {
    locale: String,
    entries: Map<String, Value>,
}

impl TranslatedDocument {
    pub(crate) fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            entries: Map::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    /// Locale identifier this document was produced for
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// String value of `key`, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// ARB text: two-space indented JSON, non-ASCII left as-is, trailing newline
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(&self.entries)?;
        out.push('\n');
        Ok(out)
    }
}
