use crate::config::ConfigError;
use crate::mt::TranslationError;
use crate::sink::SinkError;
use crate::table::TableError;
use thiserror::Error;

/// Errors that stop a batch before any locale is dispatched
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Output(#[from] SinkError),
    #[error("Failed to initialize translator: {0}")]
    Translator(#[from] TranslationError),
}

pub type Result<T> = std::result::Result<T, Error>;
