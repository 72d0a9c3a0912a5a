use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stylefit::eval::{CancelToken, EvalCache, Evaluator};
use stylefit::fmt::SpacerTool;
use stylefit::search::{run_search, SearchConfig};
use stylefit::{Corpus, SourceFile};
use stylefit_diff::{internal, BackendChoice, DiffMetric};

fn synthetic_source(blocks: usize) -> Vec<u8> {
    let mut text = String::new();
    for i in 0..blocks {
        text.push_str(&format!("block{i} {{\n  stmt_a();\n  stmt_b();\n\n  inner {{\n    stmt_c();\n  }}\n}}\n"));
    }
    text.into_bytes()
}

fn bench_internal_diff(c: &mut Criterion) {
    let reference = synthetic_source(64);
    // Perturb one line per block so the diff is non-trivial.
    let candidate: Vec<u8> = String::from_utf8_lossy(&reference)
        .replace("  stmt_b", "    stmt_b")
        .into_bytes();

    c.bench_function("internal_diff_64_blocks", |b| {
        b.iter(|| internal::diff(black_box(&reference), black_box(&candidate)))
    });
}

fn bench_spacer_search(c: &mut Criterion) {
    let corpus = Corpus::from_files(vec![SourceFile::from_bytes(
        "bench.c",
        synthetic_source(16),
    )]);

    c.bench_function("spacer_search_standard", |b| {
        b.iter(|| {
            let formatter = SpacerTool::new();
            let cache = EvalCache::new();
            let metric = DiffMetric::select(BackendChoice::Internal).expect("metric");
            let evaluator =
                Evaluator::new(&formatter, metric, &cache, None, 2).expect("evaluator");
            run_search(
                &evaluator,
                black_box(&corpus),
                &SearchConfig::default(),
                &CancelToken::new(),
            )
            .expect("search")
        })
    });
}

criterion_group!(benches, bench_internal_diff, bench_spacer_search);
criterion_main!(benches);
