//! Per-locale translation worker
//!
//! A `LocaleWorker` turns the shared source table into one `TranslatedDocument` and hands
//! it to the output sink. Translation failures never escape a worker: the affected entry
//! keeps its source text and the failure is recorded in the returned report.

use crate::catalog::LocaleSpec;
use crate::document::TranslatedDocument;
use crate::mt::MachineTranslator;
use crate::placeholder::{contains_placeholder, placeholders};
use crate::sink::{OutputSink, SinkError};
use crate::table::{Entry, LOCALE_KEY, SourceTable};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// One entry whose translation failed and fell back to the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub key: String,
    pub reason: String,
}

/// Per-locale entry counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocaleStats {
    /// Entries replaced with backend output
    pub translated: usize,
    /// Entries kept verbatim because they carry a placeholder
    pub preserved: usize,
    /// Entries kept verbatim because the backend failed
    pub fallbacks: usize,
    /// Metadata entries copied through
    pub metadata: usize,
}

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error(transparent)]
    Write(#[from] SinkError),
    #[error("worker aborted: {0}")]
    Aborted(String),
}

/// What happened to one target locale
#[derive(Debug)]
pub struct LocaleReport {
    pub locale: LocaleSpec,
    pub stats: LocaleStats,
    pub failures: Vec<EntryFailure>,
    /// Where the document landed, or why it did not
    pub output: Result<PathBuf, LocaleError>,
}

impl LocaleReport {
    pub(crate) fn aborted(locale: LocaleSpec, reason: String) -> Self {
        Self {
            locale,
            stats: LocaleStats::default(),
            failures: Vec::new(),
            output: Err(LocaleError::Aborted(reason)),
        }
    }

    pub fn is_written(&self) -> bool {
        self.output.is_ok()
    }
}

/// Everything a worker needs; cheap to clone into a spawned task
#[derive(Clone)]
pub struct LocaleWorker {
    table: Arc<SourceTable>,
    translator: Arc<dyn MachineTranslator>,
    sink: Arc<dyn OutputSink>,
    source_locale: Arc<str>,
}

impl LocaleWorker {
    pub fn new(
        table: Arc<SourceTable>,
        translator: Arc<dyn MachineTranslator>,
        sink: Arc<dyn OutputSink>,
        source_locale: &str,
    ) -> Self {
        Self {
            table,
            translator,
            sink,
            source_locale: Arc::from(source_locale),
        }
    }

    /// Build the document for `locale` and persist it.
    pub async fn run(&self, locale: LocaleSpec) -> LocaleReport {
        info!(locale = locale.id, "Translating to {} ({})", locale.name, locale.id);

        let (document, stats, failures) = self.build_document(&locale).await;
        let output = self.sink.write(document).await.map_err(LocaleError::from);

        if let Err(e) = &output {
            warn!(locale = locale.id, error = %e, "Failed to write translated document");
        }

        LocaleReport {
            locale,
            stats,
            failures,
            output,
        }
    }

    /// Translate every entry of the source table for `locale`.
    ///
    /// The document starts with the locale tag set to `locale.id`; every other key follows
    /// in source-table order.
    pub async fn build_document(
        &self,
        locale: &LocaleSpec,
    ) -> (TranslatedDocument, LocaleStats, Vec<EntryFailure>) {
        let mut document = TranslatedDocument::new(locale.id);
        let mut stats = LocaleStats::default();
        let mut failures = Vec::new();

        document.insert(LOCALE_KEY, Value::String(locale.id.to_string()));

        for (key, entry) in self.table.entries() {
            match entry {
                Entry::LocaleTag(_) => {}
                Entry::Metadata(value) => {
                    document.insert(key, value.clone());
                    stats.metadata += 1;
                }
                Entry::Translatable(text) if contains_placeholder(text) => {
                    debug!(
                        locale = locale.id,
                        key,
                        placeholders = ?placeholders(text),
                        "Keeping message with placeholders verbatim"
                    );
                    document.insert(key, Value::String(text.clone()));
                    stats.preserved += 1;
                }
                Entry::Translatable(text) => {
                    let value = match self
                        .translator
                        .translate(text, &self.source_locale, locale.backend_code())
                        .await
                    {
                        Ok(translated) => {
                            stats.translated += 1;
                            translated
                        }
                        Err(e) => {
                            warn!(
                                locale = locale.id,
                                key,
                                error = %e,
                                "Translation failed, keeping source text"
                            );
                            failures.push(EntryFailure {
                                key: key.to_string(),
                                reason: e.to_string(),
                            });
                            stats.fallbacks += 1;
                            text.clone()
                        }
                    };
                    document.insert(key, Value::String(value));
                }
            }
        }

        (document, stats, failures)
    }
}
