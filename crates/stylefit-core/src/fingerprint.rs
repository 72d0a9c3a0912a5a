//! Content fingerprints used as cache keys and dedup handles.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::StyleFitError;
use crate::serde::to_canonical_json_bytes;

/// Computes the lowercase hexadecimal SHA-256 digest of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Computes a stable hexadecimal hash for any serializable payload by
/// digesting its canonical JSON form.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, StyleFitError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// Fingerprint of a [`crate::style::Style`], pure in its (option, value) pairs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StyleFingerprint(pub String);

/// Fingerprint of a source file's content bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceFingerprint(pub String);

/// Fingerprint identifying a formatter binary and version, so cached
/// evaluations never alias across tool upgrades.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormatterFingerprint(pub String);

impl FormatterFingerprint {
    /// Derives a formatter fingerprint from its name and a version banner.
    pub fn from_identity(name: &str, version_banner: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update([0]);
        hasher.update(version_banner.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }
}
