use std::error::Error;
use std::time::Duration;

use clap::Args;

use stylefit_core::{Corpus, Distance, SourceFile};
use stylefit_diff::{BackendChoice, DiffMetric};
use stylefit_eval::{CancelToken, EvalCache, Evaluator};
use stylefit_fmt::{create_adapter, ExecOptions, Formatter, SUPPORTED_FORMATTERS};
use stylefit_search::{run_search, SearchConfig};

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Per-probe timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

pub fn run(args: &DoctorArgs) -> Result<(), Box<dyn Error>> {
    let exec = ExecOptions {
        timeout: Duration::from_secs(args.timeout_secs.max(1)),
    };

    println!("formatter adapters:");
    for name in SUPPORTED_FORMATTERS {
        match create_adapter(name, exec) {
            Ok(adapter) => println!(
                "  {name}: ok ({} options, {} base styles)",
                adapter.options().len(),
                adapter.base_styles().len(),
            ),
            Err(err) => println!("  {name}: unavailable ({})", err.info().message),
        }
    }

    println!("diff backends:");
    for (label, choice) in [
        ("external-diff", BackendChoice::ExternalDiff),
        ("external-git", BackendChoice::ExternalGit),
        ("internal", BackendChoice::Internal),
    ] {
        match DiffMetric::select(choice) {
            Ok(_) => println!("  {label}: ok"),
            Err(err) => println!("  {label}: unavailable ({})", err.info().message),
        }
    }

    self_check()?;
    println!("self-check: ok");
    Ok(())
}

/// Runs a tiny end-to-end search against the built-in spacer formatter; any
/// engine-level regression shows up here without touching external tools.
fn self_check() -> Result<(), Box<dyn Error>> {
    let adapter = create_adapter("spacer", ExecOptions::default())?;
    let corpus = Corpus::from_files(vec![SourceFile::from_bytes(
        "selfcheck.c",
        b"a {\n  b;\n}\n".to_vec(),
    )]);
    let metric = DiffMetric::select(BackendChoice::Internal)?;
    let cache = EvalCache::new();
    let evaluator = Evaluator::new(&adapter, metric, &cache, None, 2)?;
    let outcome = run_search(
        &evaluator,
        &corpus,
        &SearchConfig::default(),
        &CancelToken::new(),
    )?;
    if outcome.distance != Distance::ZERO {
        return Err(format!("self-check distance {} (expected 0)", outcome.distance).into());
    }
    Ok(())
}
