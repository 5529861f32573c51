//! # ECPDKSAP Scanner
//!
//! Batch scanning of published ephemeral points to discover payments.
//!
//! ## Features
//!
//! - **Batch Processing**: Dispatches candidates in configurable batches
//! - **View Tag Filtering**: Rejects most candidates before the expensive recovery
//! - **Error Policy**: Abort the batch on the first bad candidate, or skip and report it
//! - **Progress Reporting**: Callbacks after every batch
//! - **Time Budget**: Stops dispatching batches once the budget is spent
//! - **Concurrent Scanning**: With the `parallel` feature, batches run on rayon
//!
//! ## Example
//!
//! ```rust
//! use ecpdksap_core::ViewTagConfig;
//! use ecpdksap_crypto::CurveContext;
//! use ecpdksap_scanner::{Scanner, ScannerConfig};
//! use ecpdksap_stealth::{send, RecipientKeys, V1};
//!
//! let ctx = CurveContext::new();
//! let mut rng = rand::thread_rng();
//! let keys = RecipientKeys::<V1>::generate(&ctx, &mut rng);
//! let tag = ViewTagConfig::hash(1).unwrap();
//!
//! let payment = send(&ctx, keys.public_keys(), Some(&tag), &mut rng).unwrap();
//! let candidates = vec![payment.to_record().to_candidate()];
//!
//! let scanner = Scanner::new(ctx, keys, ScannerConfig::new().view_tag(tag)).unwrap();
//! let report = scanner.scan(&candidates).unwrap();
//!
//! assert_eq!(report.discoveries.len(), 1);
//! assert_eq!(report.discoveries[0].recovered.identifier, payment.identifier);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod stats;

use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;
use std::time::{Duration, Instant};

use ark_bn254::G1Affine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use ecpdksap_core::constants::{DEFAULT_SCAN_BATCH_SIZE, MAX_SCAN_BATCH_SIZE};
use ecpdksap_core::error::{EcpdksapError, Result};
use ecpdksap_core::types::{RecoveredRecord, ScanCandidate, ScanRequest, VariantId, ViewTagConfig};
use ecpdksap_crypto::CurveContext;
use ecpdksap_stealth::{
    decode_candidate, filter_point, FilterDecision, ProtocolVariant, RecipientKeys, Recovered,
    ScanOutcome, V0, V1, V2,
};

pub use stats::{ScanProgress, ScanStats, ScanSummary};

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// What to do when a candidate fails to decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop the scan and return the error
    AbortOnError,
    /// Record the failure in the report and keep going
    #[default]
    SkipAndContinue,
}

impl FromStr for ErrorPolicy {
    type Err = EcpdksapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "abort-on-error" => Ok(ErrorPolicy::AbortOnError),
            "skip" | "skip-and-continue" => Ok(ErrorPolicy::SkipAndContinue),
            other => Err(EcpdksapError::InvalidConfig(format!(
                "unknown error policy `{other}`, expected `abort` or `skip`"
            ))),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::AbortOnError => write!(f, "abort"),
            ErrorPolicy::SkipAndContinue => write!(f, "skip"),
        }
    }
}

/// Scanner configuration.
#[derive(Clone, Debug)]
pub struct ScannerConfig {
    /// View tag scheme used as a pre-filter (None = recover every candidate)
    pub view_tag: Option<ViewTagConfig>,
    /// Handling of candidates that fail to decode
    pub error_policy: ErrorPolicy,
    /// Candidates dispatched per batch
    pub batch_size: usize,
    /// Whether to stop on first recovery
    pub stop_on_first: bool,
    /// Stop dispatching new batches once this much time has passed
    pub time_budget: Option<Duration>,
    /// Evaluate each batch on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            view_tag: None,
            error_policy: ErrorPolicy::default(),
            batch_size: DEFAULT_SCAN_BATCH_SIZE,
            stop_on_first: false,
            time_budget: None,
            parallel: false,
        }
    }
}

impl ScannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the view tag scheme.
    pub fn view_tag(mut self, config: ViewTagConfig) -> Self {
        self.view_tag = Some(config);
        self
    }

    /// Sets or clears the view tag scheme.
    pub fn maybe_view_tag(mut self, config: Option<ViewTagConfig>) -> Self {
        self.view_tag = config;
        self
    }

    /// Sets the error policy.
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Enables stopping on first recovery.
    pub fn stop_on_first(mut self) -> Self {
        self.stop_on_first = true;
        self
    }

    /// Sets the time budget.
    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Enables or disables parallel batch evaluation.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SCAN_BATCH_SIZE).contains(&self.batch_size) {
            return Err(EcpdksapError::InvalidConfig(format!(
                "batch size {} outside 1..={MAX_SCAN_BATCH_SIZE}",
                self.batch_size
            )));
        }
        Ok(())
    }
}

/// Progress callback type.
pub type ProgressCallback<'a> = &'a (dyn Fn(ScanProgress) + Send + Sync);

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// A recovered candidate.
#[derive(Debug)]
pub struct Discovery<V: ProtocolVariant> {
    /// Position of the candidate in the scanned list
    pub index: usize,
    /// Whether the candidate passed a view tag comparison
    pub tag_checked: bool,
    /// Recovery output
    pub recovered: Recovered<V>,
}

/// Result of scanning one candidate list.
#[derive(Debug)]
pub struct ScanReport<V: ProtocolVariant> {
    /// Recoveries in candidate order
    pub discoveries: Vec<Discovery<V>>,
    /// Candidates that failed to decode, in candidate order (skip policy only)
    pub failures: Vec<(usize, EcpdksapError)>,
    /// Counters and timings
    pub stats: ScanStats,
    /// Whether the time budget cut the scan short
    pub truncated: bool,
}

impl<V: ProtocolVariant> ScanReport<V> {
    fn empty() -> Self {
        Self {
            discoveries: Vec::new(),
            failures: Vec::new(),
            stats: ScanStats::new(),
            truncated: false,
        }
    }

    /// Returns true if nothing was recovered.
    pub fn is_empty(&self) -> bool {
        self.discoveries.is_empty()
    }

    /// Recovered identifiers in candidate order.
    pub fn identifiers(&self) -> impl Iterator<Item = &V::Identifier> {
        self.discoveries.iter().map(|d| &d.recovered.identifier)
    }

    /// Wire form of every recovery.
    pub fn records(&self) -> Vec<RecoveredRecord> {
        self.discoveries
            .iter()
            .map(|d| d.recovered.to_record(d.index))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNER
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-candidate result before it is merged into the report.
struct Evaluated<V: ProtocolVariant> {
    index: usize,
    outcome: Result<ScanOutcome<V>>,
    filter_time: Duration,
    recovery_time: Duration,
}

/// Main scanner for discovering payments.
pub struct Scanner<V: ProtocolVariant> {
    ctx: CurveContext,
    keys: RecipientKeys<V>,
    config: ScannerConfig,
}

impl<V: ProtocolVariant> Scanner<V> {
    /// Creates a scanner with the given keys and configuration.
    pub fn new(ctx: CurveContext, keys: RecipientKeys<V>, config: ScannerConfig) -> Result<Self> {
        config.validate()?;
        if config.parallel && !cfg!(feature = "parallel") {
            warn!("Parallel scanning requested without the `parallel` feature, scanning sequentially");
        }
        Ok(Self { ctx, keys, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Returns the recipient keys.
    pub fn keys(&self) -> &RecipientKeys<V> {
        &self.keys
    }

    /// Scans a candidate list.
    pub fn scan(&self, candidates: &[ScanCandidate]) -> Result<ScanReport<V>> {
        self.scan_inner(candidates, None)
    }

    /// Scans with a progress callback invoked after every batch.
    pub fn scan_with_progress(
        &self,
        candidates: &[ScanCandidate],
        progress_callback: ProgressCallback<'_>,
    ) -> Result<ScanReport<V>> {
        self.scan_inner(candidates, Some(progress_callback))
    }

    /// Filters and recovers a single candidate.
    pub fn scan_one(&self, candidate: &ScanCandidate) -> Result<ScanOutcome<V>> {
        self.evaluate(0, candidate).outcome
    }

    #[instrument(skip_all, fields(variant = %V::ID, candidates = candidates.len()))]
    fn scan_inner(
        &self,
        candidates: &[ScanCandidate],
        progress_callback: Option<ProgressCallback<'_>>,
    ) -> Result<ScanReport<V>> {
        let start = Instant::now();
        let mut report = ScanReport::empty();
        let mut progress = ScanProgress::new(candidates.len() as u64);

        info!(
            view_tag = ?self.config.view_tag.map(|c| c.selector()),
            policy = %self.config.error_policy,
            "Starting scan"
        );

        for (batch_no, batch) in candidates.chunks(self.config.batch_size).enumerate() {
            if let Some(budget) = self.config.time_budget {
                if start.elapsed() >= budget {
                    warn!(
                        scanned = report.stats.total_scanned,
                        budget_ms = budget.as_millis() as u64,
                        "Time budget exhausted, stopping dispatch"
                    );
                    report.truncated = true;
                    break;
                }
            }

            let offset = batch_no * self.config.batch_size;
            let flow = self.run_batch(offset, batch, &mut report)?;
            debug!(batch = batch_no, size = batch.len(), "Scanned batch");

            if let Some(callback) = progress_callback {
                progress.update(
                    report.stats.total_scanned,
                    report.stats.discoveries,
                    start.elapsed().as_millis() as u64,
                );
                callback(progress.clone());
            }

            if flow.is_break() {
                info!("Stopping on first discovery");
                break;
            }
        }

        report.stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            discoveries = report.stats.discoveries,
            scanned = report.stats.total_scanned,
            filtered = report.stats.filtered_out,
            errors = report.stats.errors,
            duration_ms = report.stats.duration_ms,
            filter_ms = report.stats.filter_ms,
            recovery_ms = report.stats.recovery_ms,
            rate = %format!("{:.2}/s", report.stats.rate()),
            "Scan complete"
        );

        Ok(report)
    }

    fn run_batch(
        &self,
        offset: usize,
        batch: &[ScanCandidate],
        report: &mut ScanReport<V>,
    ) -> Result<ControlFlow<()>> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                use rayon::prelude::*;

                let evaluated: Vec<Evaluated<V>> = batch
                    .par_iter()
                    .enumerate()
                    .map(|(i, candidate)| self.evaluate(offset + i, candidate))
                    .collect();
                return self.absorb(evaluated, report);
            }
        }

        let evaluated = batch
            .iter()
            .enumerate()
            .map(|(i, candidate)| self.evaluate(offset + i, candidate));
        self.absorb(evaluated, report)
    }

    /// Merges evaluated candidates into the report in candidate order.
    fn absorb(
        &self,
        evaluated: impl IntoIterator<Item = Evaluated<V>>,
        report: &mut ScanReport<V>,
    ) -> Result<ControlFlow<()>> {
        for item in evaluated {
            let stats = &mut report.stats;
            stats.total_scanned += 1;
            stats.filter_ms += item.filter_time.as_secs_f64() * 1000.0;
            stats.recovery_ms += item.recovery_time.as_secs_f64() * 1000.0;

            match item.outcome {
                Err(err) => {
                    stats.errors += 1;
                    match self.config.error_policy {
                        ErrorPolicy::AbortOnError => {
                            warn!(index = item.index, error = %err, "Aborting scan on bad candidate");
                            return Err(EcpdksapError::for_candidate(item.index, err));
                        }
                        ErrorPolicy::SkipAndContinue => {
                            warn!(index = item.index, error = %err, "Skipping bad candidate");
                            report.failures.push((item.index, err));
                        }
                    }
                }
                Ok(ScanOutcome::TagMismatch) => stats.filtered_out += 1,
                Ok(ScanOutcome::Recovered {
                    tag_checked,
                    result,
                }) => {
                    if tag_checked {
                        stats.view_tag_matches += 1;
                    }
                    stats.discoveries += 1;
                    report.discoveries.push(Discovery {
                        index: item.index,
                        tag_checked,
                        recovered: result,
                    });

                    if self.config.stop_on_first {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Decode, filter and recover one candidate, timing the two phases.
    fn evaluate(&self, index: usize, candidate: &ScanCandidate) -> Evaluated<V> {
        let view_tag = self.config.view_tag.as_ref();
        let filter_start = Instant::now();

        let (ephemeral, published): (G1Affine, _) = match decode_candidate(candidate, view_tag) {
            Ok(decoded) => decoded,
            Err(err) => {
                return Evaluated {
                    index,
                    outcome: Err(err),
                    filter_time: filter_start.elapsed(),
                    recovery_time: Duration::ZERO,
                }
            }
        };
        let decision = filter_point(&self.keys, view_tag, &ephemeral, published.as_ref());
        let filter_time = filter_start.elapsed();

        match decision {
            FilterDecision::Reject => Evaluated {
                index,
                outcome: Ok(ScanOutcome::TagMismatch),
                filter_time,
                recovery_time: Duration::ZERO,
            },
            FilterDecision::Pass { shared } => {
                let recovery_start = Instant::now();
                let result = V::recover(&self.ctx, &self.keys, &ephemeral, shared.as_ref());
                Evaluated {
                    index,
                    outcome: Ok(ScanOutcome::Recovered {
                        tag_checked: shared.is_some(),
                        result,
                    }),
                    filter_time,
                    recovery_time: recovery_start.elapsed(),
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON REQUESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Variant-independent outcome of a [`ScanRequest`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanOutput {
    /// Variant that was scanned
    pub variant: VariantId,
    /// View tag selector that was applied
    pub view_tag: String,
    /// Recoveries in candidate order
    pub recovered: Vec<RecoveredRecord>,
    /// Candidates that failed to decode, as `(index, message)`
    pub failures: Vec<(usize, String)>,
    /// Summary counters
    pub summary: ScanSummary,
    /// Whether the time budget cut the scan short
    pub truncated: bool,
}

/// Runs a JSON scan request with the variant and tag scheme it names.
///
/// The request's `ViewTagVersion` replaces any tag scheme in `config`.
pub fn scan_request(ctx: &CurveContext, request: &ScanRequest, config: ScannerConfig) -> Result<ScanOutput> {
    let variant = request.variant()?;
    let config = config.maybe_view_tag(request.view_tag_config()?);
    let candidates = request.candidates();

    fn run<V: ProtocolVariant>(
        ctx: &CurveContext,
        request: &ScanRequest,
        config: ScannerConfig,
        candidates: &[ScanCandidate],
    ) -> Result<ScanOutput> {
        let keys = RecipientKeys::<V>::from_wire(ctx, &request.k, &request.v)?;
        let view_tag = config
            .view_tag
            .map_or_else(|| "none".to_string(), |c| c.selector().to_string());
        let scanner = Scanner::new(*ctx, keys, config)?;
        let report = scanner.scan(candidates)?;

        Ok(ScanOutput {
            variant: V::ID,
            view_tag,
            recovered: report.records(),
            failures: report
                .failures
                .iter()
                .map(|(i, e)| (*i, e.to_string()))
                .collect(),
            summary: ScanSummary::from(&report.stats),
            truncated: report.truncated,
        })
    }

    match variant {
        VariantId::V0 => run::<V0>(ctx, request, config, &candidates),
        VariantId::V1 => run::<V1>(ctx, request, config, &candidates),
        VariantId::V2 => run::<V2>(ctx, request, config, &candidates),
    }
}
