//! The invocation and result surface shared with the CLI collaborator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use stylefit_core::{Distance, Style};
use stylefit_diff::{BackendChoice, BackendKind};
use stylefit_eval::CacheStats;

use crate::variants::VariantRecord;

/// Search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Phases A and B: minimal style reproducing the corpus.
    #[default]
    Standard,
    /// Standard plus Phase C: pin unset options at their effective values.
    Resilient,
    /// Standard plus Phase D: explore differing single-option alternatives.
    Variants,
}

/// Structured request driving one search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Adapter name (see `stylefit_fmt::SUPPORTED_FORMATTERS`).
    pub formatter_name: String,
    /// Reference corpus paths, in order.
    pub sources: Vec<PathBuf>,
    /// Search mode.
    #[serde(default)]
    pub mode: Mode,
    /// Worker count; 0 selects the number of hardware threads.
    #[serde(default)]
    pub concurrency: usize,
    /// Diff backend preference.
    #[serde(default)]
    pub diff_backend: BackendChoice,
    /// Bound on hunks rendered per variant (variants mode only).
    #[serde(default = "default_variants_hunks")]
    pub variants_hunks: usize,
    /// Per-subprocess wall-clock timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional on-disk evaluation store.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_variants_hunks() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

impl SearchRequest {
    /// A request with defaults for everything but the formatter and corpus.
    pub fn new(formatter_name: impl Into<String>, sources: Vec<PathBuf>) -> Self {
        Self {
            formatter_name: formatter_name.into(),
            sources,
            mode: Mode::default(),
            concurrency: 0,
            diff_backend: BackendChoice::default(),
            variants_hunks: default_variants_hunks(),
            timeout_secs: default_timeout_secs(),
            store_path: None,
        }
    }
}

/// Non-fatal condition surfaced on the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWarning {
    /// Stable code (`search-did-not-converge`, `cancelled`, ...).
    pub code: String,
    /// Human readable explanation.
    pub message: String,
}

/// Counters describing the work a search performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Greedy rounds executed in Phase B.
    pub rounds: usize,
    /// Trial styles evaluated across all phases.
    pub trials_evaluated: usize,
    /// Cache counters at the end of the run.
    pub cache: CacheStats,
}

/// The selected style and everything the caller needs to render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The selected style as a canonical mapping.
    pub style: Style,
    /// The style rendered in the formatter's native syntax.
    pub style_text: String,
    /// Aggregate distance achieved across the corpus.
    pub distance: Distance,
    /// Non-default option count of the selected style.
    pub cardinality: usize,
    /// Mode the search ran in.
    pub mode: Mode,
    /// Diff backend frozen for the run.
    pub backend: BackendKind,
    /// Differing trials (variants mode only).
    pub variants: Vec<VariantRecord>,
    /// Non-fatal conditions encountered.
    pub warnings: Vec<SearchWarning>,
    /// True when the run was cut short by cancellation.
    pub cancelled: bool,
    /// Work counters.
    pub stats: SearchStats,
}
