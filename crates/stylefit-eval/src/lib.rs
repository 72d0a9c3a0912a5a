#![deny(missing_docs)]
#![doc = "Evaluation cache and parallel evaluator. Memoizes (formatter, style, source) scores with single-flight semantics and fans uncached work out over a bounded rayon pool."]

mod cache;
mod cancel;
mod evaluator;
mod store;

pub use cache::{CacheKey, CacheStats, EvalCache, Evaluation};
pub use cancel::CancelToken;
pub use evaluator::{
    default_concurrency, Evaluator, PairOutcome, StyleEvaluation, CODE_FORMATTER_ERROR,
    CODE_INVALID_OPTION,
};
pub use store::SqliteStore;
