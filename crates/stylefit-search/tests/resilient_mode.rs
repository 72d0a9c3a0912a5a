//! Phase C: pinning still-default options at their effective values must
//! not change the distance, and must not disturb what standard mode finds.

use stylefit_core::{Corpus, Distance, OptionValue, SourceFile, Style};
use stylefit_diff::{BackendChoice, DiffMetric};
use stylefit_eval::{CancelToken, EvalCache, Evaluator};
use stylefit_fmt::SpacerTool;
use stylefit_search::{run_search, Mode, SearchConfig, SearchOutcome};

fn corpus() -> Corpus {
    Corpus::from_files(vec![SourceFile::from_bytes(
        "main.c",
        b"int main() {\n  int x = 1;\n\n  return x;\n}\n".to_vec(),
    )])
}

fn search(corpus: &Corpus, mode: Mode) -> SearchOutcome {
    let formatter = SpacerTool::new();
    let cache = EvalCache::new();
    let metric = DiffMetric::select(BackendChoice::Internal).expect("metric");
    let evaluator = Evaluator::new(&formatter, metric, &cache, None, 2).expect("evaluator");
    run_search(
        &evaluator,
        corpus,
        &SearchConfig {
            mode,
            ..SearchConfig::default()
        },
        &CancelToken::new(),
    )
    .expect("search")
}

#[test]
fn resilient_mode_pins_every_free_option_without_changing_distance() {
    let outcome = search(&corpus(), Mode::Resilient);
    assert_eq!(outcome.distance, Distance::ZERO);
    // The core finding plus pins for the two options that stayed free.
    assert_eq!(
        outcome.style.get("indent_width"),
        Some(&OptionValue::Int(2))
    );
    assert_eq!(
        outcome.style.get("max_blank_lines"),
        Some(&OptionValue::Int(1))
    );
    assert_eq!(
        outcome.style.get("use_tabs"),
        Some(&OptionValue::Bool(false))
    );
    assert_eq!(outcome.cardinality, 3);
}

#[test]
fn resilient_result_agrees_with_standard_on_the_shared_options() {
    let standard = search(&corpus(), Mode::Standard);
    let resilient = search(&corpus(), Mode::Resilient);

    assert_eq!(standard.distance, resilient.distance);
    for (name, value) in standard.style.iter() {
        assert_eq!(
            resilient.style.get(name),
            Some(value),
            "resilient mode must keep standard mode's finding for {name}"
        );
    }
    assert!(resilient.cardinality >= standard.cardinality);
}

#[test]
fn standard_mode_on_resiliently_reformatted_corpus_is_stable() {
    let resilient = search(&corpus(), Mode::Resilient);

    // Reformat the corpus under the resilient style and search again in
    // standard mode; the result must match standard mode on the original.
    let formatter = SpacerTool::new();
    let reformatted: Vec<SourceFile> = corpus()
        .files
        .iter()
        .map(|file| {
            let out = match formatter
                .format(&resilient.style, &file.bytes, None)
                .expect("format")
            {
                stylefit_fmt::FormatOutcome::Formatted(bytes) => bytes,
                other => panic!("unexpected outcome {other:?}"),
            };
            SourceFile::from_bytes(file.path.clone(), out)
        })
        .collect();
    let standard_original = search(&corpus(), Mode::Standard);
    let standard_reformatted = search(&Corpus::from_files(reformatted), Mode::Standard);

    assert_eq!(standard_original.style, standard_reformatted.style);
    assert_eq!(standard_original.distance, standard_reformatted.distance);
}

/// A formatter that cannot report its effective configuration and whose
/// behavior for an absent option differs from the explicit default: writing
/// `align: false` explicitly changes the output.
struct AutoAlignFormatter {
    fingerprint: stylefit_core::FormatterFingerprint,
    options: Vec<stylefit_core::OptionDef>,
}

impl stylefit_fmt::Formatter for AutoAlignFormatter {
    fn name(&self) -> &str {
        "auto-align"
    }

    fn fingerprint(&self) -> &stylefit_core::FormatterFingerprint {
        &self.fingerprint
    }

    fn options(&self) -> &[stylefit_core::OptionDef] {
        &self.options
    }

    fn base_styles(&self) -> Vec<stylefit_core::NamedStyle> {
        vec![stylefit_core::NamedStyle::new("base", Style::new())]
    }

    fn format(
        &self,
        style: &Style,
        source: &[u8],
        _filename_hint: Option<&std::path::Path>,
    ) -> Result<stylefit_fmt::FormatOutcome, stylefit_core::StyleFitError> {
        let bytes = match style.get("align") {
            None => source.to_vec(),
            Some(_) => String::from_utf8_lossy(source).to_uppercase().into_bytes(),
        };
        Ok(stylefit_fmt::FormatOutcome::Formatted(bytes))
    }

    fn style_text(&self, style: &Style) -> String {
        style
            .iter()
            .map(|(name, value)| format!("{name} = {value}\n"))
            .collect()
    }
}

#[test]
fn resilient_pins_are_rejected_when_they_change_the_distance() {
    let formatter = AutoAlignFormatter {
        fingerprint: stylefit_core::FormatterFingerprint::from_identity("auto-align", "test 1"),
        options: vec![stylefit_core::OptionDef::boolean("align", false)],
    };
    let cache = EvalCache::new();
    let metric = DiffMetric::select(BackendChoice::Internal).expect("metric");
    let evaluator = Evaluator::new(&formatter, metric, &cache, None, 2).expect("evaluator");
    let corpus = Corpus::from_files(vec![SourceFile::from_bytes(
        "notes.txt",
        b"lowercase body\n".to_vec(),
    )]);

    let outcome = run_search(
        &evaluator,
        &corpus,
        &SearchConfig {
            mode: Mode::Resilient,
            ..SearchConfig::default()
        },
        &CancelToken::new(),
    )
    .expect("search");

    assert_eq!(outcome.distance, Distance::ZERO);
    assert!(
        outcome.style.get("align").is_none(),
        "a pin that changes the output must be rejected"
    );
}
