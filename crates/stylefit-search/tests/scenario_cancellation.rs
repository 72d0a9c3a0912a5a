//! Cancellation injected after Phase A: the baseline candidate is returned
//! and no Phase B work is started.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use stylefit_core::{
    Corpus, FormatterFingerprint, NamedStyle, OptionDef, OptionValue, SourceFile, Style,
    StyleFitError,
};
use stylefit_diff::{BackendChoice, DiffMetric};
use stylefit_eval::{CancelToken, EvalCache, Evaluator};
use stylefit_fmt::{FormatOutcome, Formatter, SpacerTool};
use stylefit_search::{run_search, SearchConfig};

/// Delegates to spacer while counting invocations, and fires the shared
/// cancellation token once the Phase A workload (base styles x corpus) has
/// been formatted.
struct CancelAfterBaseline {
    inner: SpacerTool,
    calls: AtomicUsize,
    cancel_after: usize,
    cancel: CancelToken,
}

impl Formatter for CancelAfterBaseline {
    fn name(&self) -> &str {
        "cancel-after-baseline"
    }

    fn fingerprint(&self) -> &FormatterFingerprint {
        self.inner.fingerprint()
    }

    fn options(&self) -> &[OptionDef] {
        self.inner.options()
    }

    fn base_styles(&self) -> Vec<NamedStyle> {
        self.inner.base_styles()
    }

    fn format(
        &self,
        style: &Style,
        source: &[u8],
        filename_hint: Option<&Path>,
    ) -> Result<FormatOutcome, StyleFitError> {
        let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.inner.format(style, source, filename_hint);
        if calls >= self.cancel_after {
            self.cancel.cancel();
        }
        outcome
    }

    fn style_text(&self, style: &Style) -> String {
        self.inner.style_text(style)
    }
}

#[test]
fn cancellation_after_phase_a_returns_the_baseline() {
    let cancel = CancelToken::new();
    let corpus = Corpus::from_files(vec![SourceFile::from_bytes(
        "main.c",
        b"a {\n  b;\n}\n".to_vec(),
    )]);
    let formatter = CancelAfterBaseline {
        inner: SpacerTool::new(),
        calls: AtomicUsize::new(0),
        // Two base styles, one corpus file.
        cancel_after: 2,
        cancel: cancel.clone(),
    };
    let cache = EvalCache::new();
    let metric = DiffMetric::select(BackendChoice::Internal).expect("metric");
    let evaluator = Evaluator::new(&formatter, metric, &cache, None, 1).expect("evaluator");

    let outcome = run_search(&evaluator, &corpus, &SearchConfig::default(), &cancel)
        .expect("search returns best so far");

    // The two-space corpus makes "compact" the Phase A winner.
    assert_eq!(
        outcome.style.get("indent_width"),
        Some(&OptionValue::Int(2))
    );
    assert_eq!(
        outcome.style.get("max_blank_lines"),
        Some(&OptionValue::Int(0))
    );
    assert!(outcome.cancelled);
    assert!(outcome
        .warnings
        .iter()
        .any(|warning| warning.code == "cancelled"));
    assert_eq!(
        formatter.calls.load(Ordering::SeqCst),
        2,
        "no Phase B subprocess may start after the cancellation point"
    );
}
