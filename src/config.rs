//! Batch configuration
//!
//! Everything a run needs is collected into a `BatchConfig` up front, from command line
//! flags with the defaults below. The API key for the Google provider is read from the
//! environment (optionally via `.env`) when the provider is built, not here.

use crate::catalog::canonical_tag;
use crate::orchestrator::DEFAULT_CONCURRENCY;
use crate::sink::FileNaming;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_INPUT: &str = "lib/l10n/app_en.arb";
pub const DEFAULT_OUTPUT_DIR: &str = "langfiles";
pub const DEFAULT_SOURCE_LOCALE: &str = "en";
pub const DEFAULT_PREFIX: &str = "app_";
pub const DEFAULT_EXTENSION: &str = "arb";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("Invalid source locale '{0}'")]
    InvalidSourceLocale(String),
    #[error("File prefix '{0}' must not contain path separators")]
    InvalidPrefix(String),
    #[error("File extension must not be empty")]
    EmptyExtension,
    #[error("Locale list is empty")]
    EmptyLocaleList,
}

/// Which translation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Mock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub source_locale: String,
    pub concurrency: usize,
    pub naming: FileNaming,
    /// Restrict the run to these catalog identifiers
    pub locales: Option<Vec<String>>,
    pub provider: Provider,
    /// Keep documents in memory instead of writing files
    pub dry_run: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            source_locale: DEFAULT_SOURCE_LOCALE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            naming: FileNaming::new(DEFAULT_PREFIX, DEFAULT_EXTENSION),
            locales: None,
            provider: Provider::Google,
            dry_run: false,
        }
    }
}

impl BatchConfig {
    /// Command line definition for the `arb-translate` binary
    pub fn command() -> Command {
        Command::new("arb-translate")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Machine-translate an ARB string table into every catalog locale")
            .arg(
                Arg::new("input")
                    .long("input")
                    .short('i')
                    .help("Source ARB file")
                    .value_parser(value_parser!(PathBuf))
                    .default_value(DEFAULT_INPUT),
            )
            .arg(
                Arg::new("output-dir")
                    .long("output-dir")
                    .short('o')
                    .help("Directory for translated ARB files (created if missing)")
                    .value_parser(value_parser!(PathBuf))
                    .default_value(DEFAULT_OUTPUT_DIR),
            )
            .arg(
                Arg::new("source-locale")
                    .long("source")
                    .short('s')
                    .help("Source language code")
                    .default_value(DEFAULT_SOURCE_LOCALE),
            )
            .arg(
                Arg::new("concurrency")
                    .long("concurrency")
                    .short('j')
                    .help("Maximum number of locales translated at once")
                    .value_parser(value_parser!(usize))
                    .default_value("6"),
            )
            .arg(
                Arg::new("prefix")
                    .long("prefix")
                    .help("Output file name prefix")
                    .default_value(DEFAULT_PREFIX),
            )
            .arg(
                Arg::new("extension")
                    .long("extension")
                    .help("Output file extension")
                    .default_value(DEFAULT_EXTENSION),
            )
            .arg(
                Arg::new("locales")
                    .long("locales")
                    .short('l')
                    .help("Only translate these catalog locales (comma separated)")
                    .value_delimiter(',')
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("mock")
                    .long("mock")
                    .short('m')
                    .help("Use mock translator instead of Google Translate")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("dry-run")
                    .long("dry-run")
                    .short('n')
                    .help("Translate but do not write any files")
                    .action(ArgAction::SetTrue),
            )
    }

    /// Build and validate a config from parsed arguments
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let string = |id: &str, default: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            input: matches
                .get_one::<PathBuf>("input")
                .cloned()
                .unwrap_or(defaults.input),
            output_dir: matches
                .get_one::<PathBuf>("output-dir")
                .cloned()
                .unwrap_or(defaults.output_dir),
            source_locale: string("source-locale", DEFAULT_SOURCE_LOCALE),
            concurrency: matches
                .get_one::<usize>("concurrency")
                .copied()
                .unwrap_or(defaults.concurrency),
            naming: FileNaming::new(
                string("prefix", DEFAULT_PREFIX),
                string("extension", DEFAULT_EXTENSION),
            ),
            locales: matches.get_many::<String>("locales").map(|ids| {
                ids.map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect()
            }),
            provider: if matches.get_flag("mock") {
                Provider::Mock
            } else {
                Provider::Google
            },
            dry_run: matches.get_flag("dry-run"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if canonical_tag(&self.source_locale).is_none() {
            return Err(ConfigError::InvalidSourceLocale(self.source_locale.clone()));
        }
        if self.naming.prefix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidPrefix(self.naming.prefix.clone()));
        }
        if self.naming.extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        if self.locales.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::EmptyLocaleList);
        }
        Ok(())
    }
}
