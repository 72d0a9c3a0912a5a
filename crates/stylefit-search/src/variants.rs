//! Phase D: explore every single-option alternative to the final style and
//! report those whose reformatted output actually differs.

use serde::{Deserialize, Serialize};

use stylefit_core::{Corpus, Distance, Style, StyleFitError};
use stylefit_diff::Hunk;
use stylefit_eval::{CancelToken, Evaluator, PairOutcome};
use stylefit_fmt::Formatter;

use crate::trials::{generate_trials, Trial};

/// A rendered excerpt of one differing region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantHunk {
    /// Corpus file the excerpt comes from.
    pub file: String,
    /// Position of the region in the two outputs.
    pub hunk: Hunk,
    /// Lines of the final style's output covered by the region.
    pub final_lines: Vec<String>,
    /// Lines of the trial's output covered by the region.
    pub trial_lines: Vec<String>,
}

/// One differing trial: an option change plus representative hunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Option that was substituted (dotted for composite children).
    pub option: String,
    /// Substituted value token.
    pub value: String,
    /// Aggregate distance of the trial against the corpus.
    pub distance: Distance,
    /// Representative differing regions, bounded by the request.
    pub hunks: Vec<VariantHunk>,
}

/// Runs the variants fan-out. Trials whose output is byte-identical to the
/// final style's output on every file are excluded.
pub fn explore_variants(
    evaluator: &Evaluator<'_>,
    corpus: &Corpus,
    final_style: &Style,
    max_hunks: usize,
    cancel: &CancelToken,
) -> Result<(Vec<VariantRecord>, bool), StyleFitError> {
    let trials = generate_trials(evaluator.formatter().options(), final_style)?;
    if trials.is_empty() || cancel.is_cancelled() {
        return Ok((Vec::new(), cancel.is_cancelled()));
    }

    let styles: Vec<Style> = trials.iter().map(|trial| trial.style.clone()).collect();
    let evaluations = evaluator.evaluate_styles(&styles, corpus, cancel)?;

    let final_outputs: Vec<Option<Vec<u8>>> = corpus
        .files
        .iter()
        .map(|file| evaluator.reformat(final_style, file))
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::new();
    for (trial, evaluation) in trials.iter().zip(&evaluations) {
        if cancel.is_cancelled() || evaluation.cancelled {
            return Ok((records, true));
        }
        if evaluation
            .per_file
            .iter()
            .any(|outcome| !matches!(outcome, PairOutcome::Evaluated(summary) if summary.failure.is_none()))
        {
            continue;
        }
        if let Some(mut record) = render_record(evaluator, corpus, trial, &final_outputs, max_hunks)? {
            record.distance = evaluation.aggregate;
            records.push(record);
        }
    }
    Ok((records, false))
}

fn render_record(
    evaluator: &Evaluator<'_>,
    corpus: &Corpus,
    trial: &Trial,
    final_outputs: &[Option<Vec<u8>>],
    max_hunks: usize,
) -> Result<Option<VariantRecord>, StyleFitError> {
    let mut hunks = Vec::new();
    let mut differs = false;
    for (file, final_output) in corpus.files.iter().zip(final_outputs) {
        let Some(final_output) = final_output else {
            continue;
        };
        let Some(trial_output) = evaluator.reformat(&trial.style, file)? else {
            continue;
        };
        if trial_output == *final_output {
            continue;
        }
        differs = true;
        let diff = evaluator.metric().diff_bytes(final_output, &trial_output)?;
        for hunk in diff.hunks {
            if hunks.len() >= max_hunks {
                break;
            }
            hunks.push(VariantHunk {
                file: file.path.display().to_string(),
                final_lines: excerpt(final_output, hunk.ref_start, hunk.ref_lines),
                trial_lines: excerpt(&trial_output, hunk.new_start, hunk.new_lines),
                hunk,
            });
        }
    }
    if !differs {
        return Ok(None);
    }
    Ok(Some(VariantRecord {
        option: trial.option.clone(),
        value: trial.value_token.clone(),
        distance: Distance::ZERO,
        hunks,
    }))
}

fn excerpt(output: &[u8], start: u64, count: u64) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }
    let text = String::from_utf8_lossy(output);
    text.lines()
        .skip(start.saturating_sub(1) as usize)
        .take(count as usize)
        .map(str::to_string)
        .collect()
}
