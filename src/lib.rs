//! Batch machine translation for Flutter ARB string tables.
//!
//! A single source table (`app_en.arb`) is translated into every locale of a static
//! catalog, one output file per locale. Messages carrying `{placeholder}` tokens are
//! copied verbatim, failed translations fall back to the source text, and at most
//! `concurrency` locales are in flight at once.
//!
//! ```ignore
//! use arb_translate::config::BatchConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = arb_translate::run(&BatchConfig::default()).await?;
//!     println!("{} files written", report.written().count());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod mt;
pub mod orchestrator;
pub mod placeholder;
pub mod sink;
pub mod table;
pub mod worker;

#[cfg(test)]
mod integration_tests;

pub use catalog::{LocaleCatalog, LocaleSpec};
pub use document::TranslatedDocument;
pub use error::{Error, Result};
pub use orchestrator::{BatchReport, CompletionLedger, Orchestrator};
pub use table::{Entry, SourceTable};
pub use worker::{LocaleReport, LocaleWorker};

use config::{BatchConfig, Provider};
use mt::{GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator};
use sink::{FileSink, MemorySink, OutputSink};
use std::sync::Arc;
use tracing::{info, warn};

/// Exit status when some locale could not be written
pub const EXIT_LOCALE_FAILED: u8 = 1;
/// Exit status when the batch could not start
pub const EXIT_FATAL: u8 = 2;

/// Process exit status for a batch outcome: 0 when every locale was written, 1 when some
/// locale failed, 2 when the batch never started. Fallbacks do not count as failures.
pub fn exit_status(outcome: &Result<BatchReport>) -> u8 {
    match outcome {
        Ok(report) if report.is_success() => 0,
        Ok(_) => EXIT_LOCALE_FAILED,
        Err(_) => EXIT_FATAL,
    }
}

/// Build the translator selected by `provider`
pub fn translator_for(provider: Provider) -> Result<Arc<dyn MachineTranslator>> {
    Ok(match provider {
        Provider::Google => Arc::new(GoogleTranslateProvider::from_env()?),
        Provider::Mock => Arc::new(MockTranslator::new(MockMode::Suffix)),
    })
}

/// Run a whole batch as described by `config` against the built-in catalog.
///
/// Startup problems (unreadable table, unusable output directory, missing API key) are
/// returned as errors before any locale is dispatched. Per-locale problems are reported
/// in the returned `BatchReport` instead.
pub async fn run(config: &BatchConfig) -> Result<BatchReport> {
    let translator = translator_for(config.provider)?;
    run_with(config, &LocaleCatalog::builtin(), translator).await
}

/// Same as [`run`] with an explicit catalog and translator
pub async fn run_with(
    config: &BatchConfig,
    catalog: &LocaleCatalog,
    translator: Arc<dyn MachineTranslator>,
) -> Result<BatchReport> {
    config.validate()?;

    let table = SourceTable::load(&config.input)?.with_locale_tag(&config.source_locale);
    if let Some(tag) = table.locale_tag() {
        if !catalog::same_locale(tag, &config.source_locale) {
            warn!(
                table_locale = tag,
                source_locale = %config.source_locale,
                "Source table locale tag differs from the configured source locale"
            );
        }
    }

    let sink: Arc<dyn OutputSink> = if config.dry_run {
        Arc::new(MemorySink::new(config.naming.clone()))
    } else {
        Arc::new(FileSink::create(&config.output_dir, config.naming.clone())?)
    };

    let selection = catalog.select(config.locales.as_deref());
    for id in &selection.rejected {
        warn!(locale = %id, "Not in the locale catalog, skipping");
    }

    info!(
        input = %config.input.display(),
        messages = table.translatable_count(),
        "Loaded source table"
    );

    let orchestrator = Orchestrator::new(
        translator,
        sink,
        config.source_locale.clone(),
        config.concurrency,
    );
    Ok(orchestrator.run(Arc::new(table), &selection.targets).await)
}
