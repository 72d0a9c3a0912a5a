//! The search engine: baseline selection, greedy option attachment,
//! resilient pinning, and variants exploration.

use std::collections::BTreeSet;
use std::time::Duration;

use stylefit_core::errors::{CODE_CANCELLED, CODE_NO_BASELINE, CODE_SEARCH_DID_NOT_CONVERGE};
use stylefit_core::{Corpus, ErrorInfo, Style, StyleFitError};
use stylefit_diff::DiffMetric;
use stylefit_eval::{CancelToken, EvalCache, Evaluator, SqliteStore, StyleEvaluation};
use stylefit_fmt::{create_adapter, ExecOptions, Formatter};

use crate::candidate::{select_min, Candidate};
use crate::request::{Mode, SearchOutcome, SearchRequest, SearchStats, SearchWarning};
use crate::trials::generate_trials;
use crate::variants::explore_variants;

/// Knobs for one search run.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Search mode.
    pub mode: Mode,
    /// Bound on hunks rendered per variant.
    pub variants_hunks: usize,
    /// Iteration bound factor: Phase B stops after
    /// `max_rounds_factor * options` rounds.
    pub max_rounds_factor: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Standard,
            variants_hunks: 5,
            max_rounds_factor: 10,
        }
    }
}

/// Builds all collaborators from a [`SearchRequest`] and runs the search.
pub fn run_request(
    request: &SearchRequest,
    cancel: &CancelToken,
) -> Result<SearchOutcome, StyleFitError> {
    let exec = ExecOptions {
        timeout: Duration::from_secs(request.timeout_secs.max(1)),
    };
    let adapter = create_adapter(&request.formatter_name, exec)?;
    let corpus = Corpus::load(&request.sources)?;
    let metric = DiffMetric::select(request.diff_backend)?;
    let cache = EvalCache::new();
    let store = request
        .store_path
        .as_deref()
        .map(SqliteStore::open)
        .transpose()?;
    let evaluator = Evaluator::new(&adapter, metric, &cache, store.as_ref(), request.concurrency)?;
    let config = SearchConfig {
        mode: request.mode,
        variants_hunks: request.variants_hunks,
        ..SearchConfig::default()
    };
    run_search(&evaluator, &corpus, &config, cancel)
}

/// Runs the four phases against an already-assembled evaluator.
pub fn run_search(
    evaluator: &Evaluator<'_>,
    corpus: &Corpus,
    config: &SearchConfig,
    cancel: &CancelToken,
) -> Result<SearchOutcome, StyleFitError> {
    let formatter = evaluator.formatter();
    let base_option = formatter.base_option_name();
    let mut warnings = Vec::new();
    let mut cancelled = false;
    let mut stats = SearchStats::default();
    let mut seen = BTreeSet::new();

    // Phase A: score every named base style, pick the minimal candidate.
    let mut bases = formatter.base_styles();
    bases.sort_by(|a, b| a.name.cmp(&b.name));
    let base_styles: Vec<Style> = bases.into_iter().map(|named| named.style).collect();
    let evaluations = evaluator.evaluate_styles(&base_styles, corpus, cancel)?;
    stats.trials_evaluated += base_styles.len();

    let mut candidates = Vec::new();
    for (style, evaluation) in base_styles.into_iter().zip(&evaluations) {
        if evaluation.cancelled {
            cancelled = true;
            continue;
        }
        let candidate = Candidate::new(style, evaluation.aggregate, base_option)?;
        seen.insert(candidate.fingerprint.clone());
        candidates.push(candidate);
    }
    let baseline = select_min(candidates);
    let mut current = match baseline {
        Some(candidate) if !candidate.distance.is_infinite() => candidate,
        _ if cancelled => {
            return Err(StyleFitError::Search(ErrorInfo::new(
                CODE_CANCELLED,
                "cancelled before any base style was scored",
            )))
        }
        _ => {
            return Err(StyleFitError::Search(
                ErrorInfo::new(CODE_NO_BASELINE, "every base style failed on every file")
                    .suggest("check that the formatter can process the source files"),
            ))
        }
    };

    // Phase B: greedy option attachment under strict improvement.
    let options = formatter.options();
    let round_bound = (options.len() * config.max_rounds_factor).max(1);
    while !cancelled {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        if stats.rounds >= round_bound {
            warnings.push(SearchWarning {
                code: CODE_SEARCH_DID_NOT_CONVERGE.to_string(),
                message: format!("iteration bound of {round_bound} rounds reached"),
            });
            break;
        }
        stats.rounds += 1;

        let mut trials = generate_trials(options, &current.style)?;
        let mut fresh = Vec::with_capacity(trials.len());
        for trial in trials.drain(..) {
            let fingerprint = trial.style.fingerprint()?;
            if seen.insert(fingerprint) {
                fresh.push(trial);
            }
        }
        if fresh.is_empty() {
            break;
        }

        let styles: Vec<Style> = fresh.iter().map(|trial| trial.style.clone()).collect();
        let evaluations = evaluator.evaluate_styles(&styles, corpus, cancel)?;
        stats.trials_evaluated += styles.len();
        if batch_cancelled(&evaluations) {
            cancelled = true;
            break;
        }

        let candidates = styles
            .into_iter()
            .zip(&evaluations)
            .map(|(style, evaluation)| Candidate::new(style, evaluation.aggregate, base_option))
            .collect::<Result<Vec<_>, _>>()?;
        match select_min(candidates) {
            Some(best) if best.improves_on(&current) => current = best,
            _ => break,
        }
    }

    // Phase C: pin still-default options whose explicit presence does not
    // change the distance. Enlarges cardinality deliberately.
    if config.mode == Mode::Resilient && !cancelled {
        let effective = formatter.effective_style(&current.style);
        let mut sorted: Vec<_> = options.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        for def in sorted {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            if current.style.get(&def.name).is_some() {
                continue;
            }
            let pin = effective
                .as_ref()
                .and_then(|style| style.get(&def.name).cloned())
                .unwrap_or_else(|| def.default.clone());
            if !def.admits(&pin) {
                continue;
            }
            let mut pinned = current.style.clone();
            pinned.set(def.name.clone(), pin);
            let evaluations = evaluator.evaluate_styles(&[pinned.clone()], corpus, cancel)?;
            stats.trials_evaluated += 1;
            if batch_cancelled(&evaluations) {
                cancelled = true;
                break;
            }
            if evaluations[0].aggregate == current.distance {
                current = Candidate::new(pinned, current.distance, base_option)?;
            }
        }
    }

    // Phase D: variants fan-out around the final style.
    let mut variants = Vec::new();
    if config.mode == Mode::Variants && !cancelled {
        let (records, variants_cancelled) = explore_variants(
            evaluator,
            corpus,
            &current.style,
            config.variants_hunks,
            cancel,
        )?;
        variants = records;
        cancelled = cancelled || variants_cancelled;
    }

    if cancelled {
        warnings.push(SearchWarning {
            code: CODE_CANCELLED.to_string(),
            message: "search cancelled; best candidate so far returned".to_string(),
        });
    }
    stats.cache = evaluator.cache_stats();

    Ok(SearchOutcome {
        style_text: formatter.style_text(&current.style),
        style: current.style,
        distance: current.distance,
        cardinality: current.cardinality,
        mode: config.mode,
        backend: evaluator.metric().kind(),
        variants,
        warnings,
        cancelled,
        stats,
    })
}

fn batch_cancelled(evaluations: &[StyleEvaluation]) -> bool {
    evaluations.iter().any(|evaluation| evaluation.cancelled)
}
