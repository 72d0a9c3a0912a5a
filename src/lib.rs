#![deny(missing_docs)]
#![doc = "Facade crate re-exporting the stylefit engine: infer a minimal formatter configuration that reproduces a reference corpus."]

pub use stylefit_diff as diff;
pub use stylefit_eval as eval;
pub use stylefit_fmt as fmt;
pub use stylefit_search as search;

pub use stylefit_core::{Corpus, Distance, SourceFile, Style, StyleFitError};
pub use stylefit_search::{run_request, Mode, SearchOutcome, SearchRequest};
