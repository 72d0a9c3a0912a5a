#![deny(missing_docs)]
#![doc = "Line-oriented diff metric for the stylefit engine. Reduces a (reference, candidate) byte pair to a distance plus positional hunks, with pluggable backends that all obey one counting rule."]

mod backend;
pub mod external;
mod hunk;
pub mod internal;

pub use backend::{BackendChoice, BackendKind, DiffMetric};
pub use hunk::{DiffResult, Hunk, HunkKind};
