//! Batch orchestration
//!
//! The orchestrator walks the target locales in catalog order and starts one worker task
//! per locale. A semaphore with `concurrency` permits bounds how many run at once:
//! dispatch waits for a free permit, and each worker holds its permit until it has
//! reported completion. The `CompletionLedger` records which locales are in flight so the
//! bound is observable after the fact.

use crate::catalog::{LocaleSpec, same_locale};
use crate::mt::MachineTranslator;
use crate::sink::OutputSink;
use crate::table::SourceTable;
use crate::worker::{LocaleReport, LocaleWorker};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Default number of locales translated at once
pub const DEFAULT_CONCURRENCY: usize = 6;

#[derive(Debug, Default)]
struct LedgerState {
    in_flight: Vec<&'static str>,
    finished: Vec<&'static str>,
    peak: usize,
}

/// Point-in-time view of the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub in_flight: Vec<&'static str>,
    pub finished: Vec<&'static str>,
    pub peak: usize,
}

/// Shared record of in-flight and finished locales for one batch
#[derive(Debug, Default)]
pub struct CompletionLedger {
    state: Mutex<LedgerState>,
}

impl CompletionLedger {
    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self, locale: &'static str) {
        let mut state = self.state();
        state.in_flight.push(locale);
        state.peak = state.peak.max(state.in_flight.len());
        debug!(locale, in_flight = state.in_flight.len(), "Worker started");
    }

    pub fn finish(&self, locale: &'static str) {
        let mut state = self.state();
        if let Some(pos) = state.in_flight.iter().position(|id| *id == locale) {
            state.in_flight.remove(pos);
        }
        state.finished.push(locale);
        debug!(
            locale,
            in_flight = state.in_flight.len(),
            finished = state.finished.len(),
            "Worker finished"
        );
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state();
        LedgerSnapshot {
            in_flight: state.in_flight.clone(),
            finished: state.finished.clone(),
            peak: state.peak,
        }
    }
}

/// A dispatched locale's slot in the pool.
///
/// Dropping it marks the locale finished in the ledger and then releases the permit, so
/// a task that ends by panicking frees its slot the same way as one that returns.
struct InFlight {
    ledger: Arc<CompletionLedger>,
    locale: &'static str,
    _permit: OwnedSemaphorePermit,
}

impl InFlight {
    fn new(
        ledger: Arc<CompletionLedger>,
        locale: &'static str,
        permit: OwnedSemaphorePermit,
    ) -> Self {
        ledger.start(locale);
        Self {
            ledger,
            locale,
            _permit: permit,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.ledger.finish(self.locale);
    }
}

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One report per dispatched locale, in dispatch order
    pub locales: Vec<LocaleReport>,
    /// Highest number of workers observed running at once
    pub peak_concurrency: usize,
}

impl BatchReport {
    /// True when every dispatched locale's document was written
    pub fn is_success(&self) -> bool {
        self.locales.iter().all(LocaleReport::is_written)
    }

    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.locales.iter().filter_map(|r| r.output.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &LocaleReport> {
        self.locales.iter().filter(|r| !r.is_written())
    }

    /// Entries that fell back to source text, across all locales
    pub fn total_fallbacks(&self) -> usize {
        self.locales.iter().map(|r| r.stats.fallbacks).sum()
    }

    pub fn report_for(&self, locale: &str) -> Option<&LocaleReport> {
        self.locales.iter().find(|r| r.locale.id == locale)
    }
}

pub struct Orchestrator {
    translator: Arc<dyn MachineTranslator>,
    sink: Arc<dyn OutputSink>,
    source_locale: String,
    concurrency: usize,
}

impl Orchestrator {
    /// `concurrency` is clamped to at least one worker.
    pub fn new(
        translator: Arc<dyn MachineTranslator>,
        sink: Arc<dyn OutputSink>,
        source_locale: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            translator,
            sink,
            source_locale: source_locale.into(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Translate `table` into every locale of `targets` except the source locale, and wait
    /// for all of them.
    pub async fn run(&self, table: Arc<SourceTable>, targets: &[LocaleSpec]) -> BatchReport {
        let worker = LocaleWorker::new(
            table,
            self.translator.clone(),
            self.sink.clone(),
            &self.source_locale,
        );
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let ledger = Arc::new(CompletionLedger::default());
        let mut handles: Vec<(LocaleSpec, JoinHandle<LocaleReport>)> = Vec::new();

        info!(
            provider = self.translator.provider_name(),
            locales = targets.len(),
            concurrency = self.concurrency,
            "Starting batch"
        );

        for spec in targets {
            if same_locale(spec.id, &self.source_locale) {
                debug!(locale = spec.id, "Skipping source locale");
                continue;
            }

            let Ok(permit) = permits.clone().acquire_owned().await else {
                error!(locale = spec.id, "Worker pool closed, no further locales dispatched");
                break;
            };
            let slot = InFlight::new(ledger.clone(), spec.id, permit);

            let worker = worker.clone();
            let spec = *spec;
            let handle = tokio::spawn(async move {
                let _slot = slot;
                worker.run(spec).await
            });
            handles.push((spec, handle));
        }

        let mut locales = Vec::with_capacity(handles.len());
        for (spec, handle) in handles {
            match handle.await {
                Ok(report) => locales.push(report),
                Err(e) => {
                    error!(locale = spec.id, error = %e, "Worker did not complete");
                    locales.push(LocaleReport::aborted(spec, e.to_string()));
                }
            }
        }

        let snapshot = ledger.snapshot();
        BatchReport {
            locales,
            peak_concurrency: snapshot.peak,
        }
    }
}
