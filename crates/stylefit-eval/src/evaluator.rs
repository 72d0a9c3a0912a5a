//! Parallel batch evaluator.
//!
//! Fans (style × corpus) pairs out over a bounded worker pool, consulting
//! the cache first and degrading per-pair failures to infinite distance
//! without aborting sibling pairs. Results are re-sorted by submission
//! index so the outcome is independent of worker scheduling.

use std::sync::Arc;
use std::thread;

use rayon::prelude::*;

use stylefit_core::errors::{CODE_EVALUATION_TIMEOUT, CODE_METRIC_UNAVAILABLE};
use stylefit_core::{Corpus, Distance, ErrorInfo, SourceFile, Style, StyleFitError};
use stylefit_diff::DiffMetric;
use stylefit_fmt::{FormatOutcome, Formatter};

use crate::cache::{CacheKey, EvalCache, Evaluation};
use crate::cancel::CancelToken;
use crate::store::SqliteStore;

/// Stable failure code for a tool that rejected the invocation.
pub const CODE_FORMATTER_ERROR: &str = "formatter-error";

/// Stable failure code for a tool that rejected the style itself.
pub const CODE_INVALID_OPTION: &str = "invalid-option";

/// Outcome of one (style, file) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// The pair was scored (possibly at infinite distance).
    Evaluated(Arc<Evaluation>),
    /// Cancellation arrived before this pair was started.
    Cancelled,
}

/// Aggregated result for one style across the corpus.
#[derive(Debug, Clone)]
pub struct StyleEvaluation {
    /// Index of the style in the submitted batch.
    pub style_index: usize,
    /// Saturating sum of per-file distances; meaningless when `cancelled`.
    pub aggregate: Distance,
    /// Per-file outcomes in corpus order.
    pub per_file: Vec<PairOutcome>,
    /// True when at least one pair was skipped due to cancellation.
    pub cancelled: bool,
}

/// Dispatches uncached evaluations to a bounded worker pool.
pub struct Evaluator<'a> {
    formatter: &'a dyn Formatter,
    metric: DiffMetric,
    cache: &'a EvalCache,
    store: Option<&'a SqliteStore>,
    pool: rayon::ThreadPool,
}

impl<'a> Evaluator<'a> {
    /// Builds an evaluator with `concurrency` workers (0 means the number
    /// of hardware threads).
    pub fn new(
        formatter: &'a dyn Formatter,
        metric: DiffMetric,
        cache: &'a EvalCache,
        store: Option<&'a SqliteStore>,
        concurrency: usize,
    ) -> Result<Self, StyleFitError> {
        let threads = if concurrency == 0 {
            default_concurrency()
        } else {
            concurrency
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| StyleFitError::Cache(ErrorInfo::new("worker-pool", err.to_string())))?;
        Ok(Self {
            formatter,
            metric,
            cache,
            store,
            pool,
        })
    }

    /// The formatter this evaluator drives.
    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter
    }

    /// The frozen diff metric.
    pub fn metric(&self) -> DiffMetric {
        self.metric
    }

    /// Cache counters at this point of the run.
    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    /// Evaluates every style against every corpus file.
    ///
    /// The result vector is ordered by submitted style index regardless of
    /// worker scheduling.
    pub fn evaluate_styles(
        &self,
        styles: &[Style],
        corpus: &Corpus,
        cancel: &CancelToken,
    ) -> Result<Vec<StyleEvaluation>, StyleFitError> {
        let fingerprints = styles
            .iter()
            .map(Style::fingerprint)
            .collect::<Result<Vec<_>, _>>()?;

        let mut pairs = Vec::with_capacity(styles.len() * corpus.len());
        for (style_index, style) in styles.iter().enumerate() {
            for (file_index, file) in corpus.files.iter().enumerate() {
                pairs.push((style_index, file_index, style, file));
            }
        }

        let outcomes: Vec<(usize, usize, PairOutcome)> = self.pool.install(|| {
            pairs
                .par_iter()
                .map(|(style_index, file_index, style, file)| {
                    let outcome = if cancel.is_cancelled() {
                        PairOutcome::Cancelled
                    } else {
                        let key = CacheKey {
                            formatter: self.formatter.fingerprint().clone(),
                            style: fingerprints[*style_index].clone(),
                            source: file.fingerprint.clone(),
                        };
                        let (summary, _) = self
                            .cache
                            .get_or_compute(&key, || self.compute_pair(&key, style, file));
                        PairOutcome::Evaluated(summary)
                    };
                    (*style_index, *file_index, outcome)
                })
                .collect()
        });

        let mut ordered = outcomes;
        ordered.sort_by_key(|(style_index, file_index, _)| (*style_index, *file_index));

        let mut results: Vec<StyleEvaluation> = (0..styles.len())
            .map(|style_index| StyleEvaluation {
                style_index,
                aggregate: Distance::ZERO,
                per_file: Vec::with_capacity(corpus.len()),
                cancelled: false,
            })
            .collect();
        for (style_index, _, outcome) in ordered {
            let entry = &mut results[style_index];
            match &outcome {
                PairOutcome::Evaluated(summary) => {
                    entry.aggregate = entry.aggregate.saturating_add(summary.distance);
                }
                PairOutcome::Cancelled => {
                    entry.aggregate = Distance::INFINITE;
                    entry.cancelled = true;
                }
            }
            entry.per_file.push(outcome);
        }
        Ok(results)
    }

    /// Formats one file under one style and returns its reformatted bytes,
    /// resolving through the cache. `None` when the pair failed.
    pub fn reformat(
        &self,
        style: &Style,
        file: &SourceFile,
    ) -> Result<Option<Vec<u8>>, StyleFitError> {
        let key = CacheKey {
            formatter: self.formatter.fingerprint().clone(),
            style: style.fingerprint()?,
            source: file.fingerprint.clone(),
        };
        let (summary, cached_bytes) = self
            .cache
            .get_or_compute(&key, || self.compute_pair(&key, style, file));
        if summary.failure.is_some() {
            return Ok(None);
        }
        if let Some(bytes) = cached_bytes {
            return Ok(Some(bytes.as_ref().clone()));
        }
        // The bytes were evicted; reproduce them outside the cache.
        match self.formatter.format(style, &file.bytes, Some(&file.path))? {
            FormatOutcome::Formatted(bytes) => Ok(Some(bytes)),
            _ => Ok(None),
        }
    }

    fn compute_pair(
        &self,
        key: &CacheKey,
        style: &Style,
        file: &SourceFile,
    ) -> (Evaluation, Option<Vec<u8>>) {
        if let Some(store) = self.store {
            if let Ok(Some((summary, output))) = store.get(key) {
                return (summary, output);
            }
        }

        let (evaluation, output) = self.score_pair(style, file);
        if let Some(store) = self.store {
            let _ = store.put(key, &evaluation, output.as_deref());
        }
        (evaluation, output)
    }

    fn score_pair(&self, style: &Style, file: &SourceFile) -> (Evaluation, Option<Vec<u8>>) {
        let failed = |code: &str| Evaluation {
            distance: Distance::INFINITE,
            hunks: Vec::new(),
            output_digest: None,
            failure: Some(code.to_string()),
        };
        let formatted = match self.formatter.format(style, &file.bytes, Some(&file.path)) {
            Ok(FormatOutcome::Formatted(bytes)) => bytes,
            Ok(FormatOutcome::TimedOut) => return (failed(CODE_EVALUATION_TIMEOUT), None),
            Ok(FormatOutcome::InvalidOption { .. }) => return (failed(CODE_INVALID_OPTION), None),
            Ok(FormatOutcome::Error { .. }) => return (failed(CODE_FORMATTER_ERROR), None),
            Err(_) => return (failed(CODE_FORMATTER_ERROR), None),
        };
        match self.metric.diff_file(&file.path, &file.bytes, &formatted) {
            Ok(diff) => {
                let evaluation = Evaluation {
                    distance: diff.distance,
                    hunks: diff.hunks,
                    output_digest: Some(stylefit_core::sha256_hex(&formatted)),
                    failure: None,
                };
                (evaluation, Some(formatted))
            }
            Err(_) => (failed(CODE_METRIC_UNAVAILABLE), None),
        }
    }
}

/// Number of hardware threads, used when the caller does not pin a
/// concurrency level.
pub fn default_concurrency() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
