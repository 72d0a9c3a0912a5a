#![deny(missing_docs)]
#![doc = "The style search engine: generates candidate styles, drives the parallel evaluator, and selects a minimal configuration reproducing the reference corpus."]

mod candidate;
mod engine;
mod request;
mod trials;
mod variants;

pub use candidate::{select_min, Candidate};
pub use engine::{run_request, run_search, SearchConfig};
pub use request::{Mode, SearchOutcome, SearchRequest, SearchStats, SearchWarning};
pub use trials::{admissible_values, generate_trials, substitute_scalar, Trial};
pub use variants::{explore_variants, VariantHunk, VariantRecord};
