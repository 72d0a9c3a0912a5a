use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;

use stylefit_core::serde::to_canonical_json_bytes;
use stylefit_diff::BackendChoice;
use stylefit_eval::CancelToken;
use stylefit_search::{run_request, Mode, SearchRequest};

#[derive(Args, Debug)]
pub struct InferArgs {
    /// Formatter adapter (clang-format, rustfmt, spacer).
    #[arg(long)]
    pub formatter: Option<String>,
    /// Search mode: standard, resilient or variants [default: standard].
    #[arg(long)]
    pub mode: Option<String>,
    /// Worker count; 0 selects the number of hardware threads [default: 0].
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Diff backend: auto, external-diff, external-git or internal
    /// [default: auto].
    #[arg(long)]
    pub diff_backend: Option<String>,
    /// Bound on hunks rendered per variant (variants mode) [default: 5].
    #[arg(long)]
    pub variants_hunks: Option<usize>,
    /// Per-subprocess wall-clock timeout in seconds [default: 30].
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Optional on-disk evaluation store.
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Write the full outcome as canonical JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// YAML request file; flags override its fields when given.
    #[arg(long)]
    pub request: Option<PathBuf>,
    /// Reference source files.
    pub sources: Vec<PathBuf>,
}

pub fn run(args: &InferArgs) -> Result<(), Box<dyn Error>> {
    let request = build_request(args)?;
    let outcome = run_request(&request, &CancelToken::new())?;

    print!("{}", outcome.style_text);
    eprintln!(
        "distance {} | cardinality {} | backend {:?} | rounds {} | trials {}",
        outcome.distance,
        outcome.cardinality,
        outcome.backend,
        outcome.stats.rounds,
        outcome.stats.trials_evaluated,
    );
    for warning in &outcome.warnings {
        eprintln!("warning [{}]: {}", warning.code, warning.message);
    }
    for variant in &outcome.variants {
        eprintln!(
            "variant {} = {} (distance {}, {} hunks)",
            variant.option,
            variant.value,
            variant.distance,
            variant.hunks.len(),
        );
    }

    if let Some(path) = &args.report {
        let bytes = to_canonical_json_bytes(&outcome)?;
        fs::write(path, bytes)?;
    }
    Ok(())
}

fn build_request(args: &InferArgs) -> Result<SearchRequest, Box<dyn Error>> {
    let mut request = match &args.request {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_yaml::from_str::<SearchRequest>(&text)?
        }
        None => {
            let formatter = args
                .formatter
                .clone()
                .ok_or("either --formatter or --request is required")?;
            SearchRequest::new(formatter, Vec::new())
        }
    };
    if let Some(formatter) = &args.formatter {
        request.formatter_name = formatter.clone();
    }
    if !args.sources.is_empty() {
        request.sources = args.sources.clone();
    }
    // Flags override the request file only when actually passed; absent
    // flags leave the file's (or SearchRequest's) values alone.
    if let Some(mode) = &args.mode {
        request.mode = parse_mode(mode)?;
    }
    if let Some(concurrency) = args.concurrency {
        request.concurrency = concurrency;
    }
    if let Some(backend) = &args.diff_backend {
        request.diff_backend = parse_backend(backend)?;
    }
    if let Some(variants_hunks) = args.variants_hunks {
        request.variants_hunks = variants_hunks;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        request.timeout_secs = timeout_secs;
    }
    if let Some(store) = &args.store {
        request.store_path = Some(store.clone());
    }
    if request.sources.is_empty() {
        return Err("at least one source file is required".into());
    }
    Ok(request)
}

fn parse_mode(text: &str) -> Result<Mode, Box<dyn Error>> {
    match text {
        "standard" => Ok(Mode::Standard),
        "resilient" => Ok(Mode::Resilient),
        "variants" => Ok(Mode::Variants),
        other => Err(format!("unknown mode '{other}' (standard, resilient, variants)").into()),
    }
}

fn parse_backend(text: &str) -> Result<BackendChoice, Box<dyn Error>> {
    match text {
        "auto" => Ok(BackendChoice::Auto),
        "external-diff" => Ok(BackendChoice::ExternalDiff),
        "external-git" => Ok(BackendChoice::ExternalGit),
        "internal" => Ok(BackendChoice::Internal),
        other => Err(format!(
            "unknown diff backend '{other}' (auto, external-diff, external-git, internal)"
        )
        .into()),
    }
}
