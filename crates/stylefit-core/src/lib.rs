#![deny(missing_docs)]
#![doc = "Shared data model, errors, and canonical serialization for the stylefit engine."]

pub mod corpus;
pub mod distance;
pub mod errors;
pub mod fingerprint;
pub mod option;
pub mod serde;
pub mod style;

pub use corpus::{Corpus, SourceFile};
pub use distance::Distance;
pub use errors::{ErrorInfo, StyleFitError};
pub use fingerprint::{
    sha256_hex, stable_hash_string, FormatterFingerprint, SourceFingerprint, StyleFingerprint,
};
pub use option::{OptionDef, OptionDomain, OptionValue};
pub use style::{NamedStyle, Style};
