//! Output sinks for translated documents
//!
//! `FileSink` is the real destination: one ARB file per locale, written through a
//! temporary file in the same directory and renamed into place, so a reader never sees
//! a half-written document. Writes for different locales run independently; only the
//! shared "written" log is serialized.

use crate::document::TranslatedDocument;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to prepare output directory '{path}': {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize document for '{locale}': {source}")]
    Serialize {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Write task for '{path}' did not complete: {reason}")]
    Interrupted { path: PathBuf, reason: String },
}

/// Destination for finished documents
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Persist `document` in full, returning where it was stored
    async fn write(&self, document: TranslatedDocument) -> Result<PathBuf, SinkError>;
}

/// How output files are named: `<prefix><locale>.<extension>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNaming {
    pub prefix: String,
    pub extension: String,
}

impl FileNaming {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    pub fn file_name(&self, locale: &str) -> String {
        format!("{}{}.{}", self.prefix, locale, self.extension)
    }
}

impl Default for FileNaming {
    fn default() -> Self {
        Self::new("app_", "arb")
    }
}

/// Writes one ARB file per locale into a directory
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    naming: FileNaming,
    written: Mutex<Vec<PathBuf>>,
}

impl FileSink {
    /// Create the output directory if needed and check that it accepts new files.
    pub fn create(dir: impl Into<PathBuf>, naming: FileNaming) -> Result<Self, SinkError> {
        let dir = dir.into();
        let directory_error = |source| SinkError::Directory {
            path: dir.clone(),
            source,
        };

        fs::create_dir_all(&dir).map_err(directory_error)?;
        // Probe file is removed when dropped
        NamedTempFile::new_in(&dir).map_err(directory_error)?;

        debug!(dir = %dir.display(), "Output directory ready");
        Ok(Self {
            dir,
            naming,
            written: Mutex::new(Vec::new()),
        })
    }

    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.dir.join(self.naming.file_name(locale))
    }

    /// Files written so far, in completion order
    pub async fn written(&self) -> Vec<PathBuf> {
        self.written.lock().await.clone()
    }
}

fn persist_atomically(dir: &Path, target: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl OutputSink for FileSink {
    async fn write(&self, document: TranslatedDocument) -> Result<PathBuf, SinkError> {
        let contents = document
            .to_pretty_json()
            .map_err(|source| SinkError::Serialize {
                locale: document.locale().to_string(),
                source,
            })?;
        let path = self.path_for(document.locale());

        let dir = self.dir.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || persist_atomically(&dir, &target, contents.as_bytes()))
            .await
            .map_err(|e| SinkError::Interrupted {
                path: path.clone(),
                reason: e.to_string(),
            })?
            .map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;

        let mut written = self.written.lock().await;
        written.push(path.clone());
        info!(locale = document.locale(), path = %path.display(), "Created {}", path.display());

        Ok(path)
    }
}

/// Keeps documents in memory; used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    naming: FileNaming,
    documents: Mutex<BTreeMap<String, TranslatedDocument>>,
    failing: HashSet<String>,
}

impl MemorySink {
    pub fn new(naming: FileNaming) -> Self {
        Self {
            naming,
            ..Self::default()
        }
    }

    /// Make writes for the given locales fail with an I/O error
    pub fn failing_for<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing.extend(locales.into_iter().map(Into::into));
        self
    }

    pub async fn document(&self, locale: &str) -> Option<TranslatedDocument> {
        self.documents.lock().await.get(locale).cloned()
    }

    /// Locales stored so far, sorted
    pub async fn locales(&self) -> Vec<String> {
        self.documents.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn write(&self, document: TranslatedDocument) -> Result<PathBuf, SinkError> {
        let path = PathBuf::from(self.naming.file_name(document.locale()));

        if self.failing.contains(document.locale()) {
            return Err(SinkError::Io {
                path,
                source: std::io::Error::other("simulated write failure"),
            });
        }

        let mut documents = self.documents.lock().await;
        info!(locale = document.locale(), path = %path.display(), "Stored {} (dry run)", path.display());
        documents.insert(document.locale().to_string(), document);
        Ok(path)
    }
}
