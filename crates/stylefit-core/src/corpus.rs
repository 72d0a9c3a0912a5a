//! The reference corpus: source files read once and retained for the run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ErrorInfo, StyleFitError};
use crate::fingerprint::{sha256_hex, SourceFingerprint};

/// A single immutable source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the file was read from; also the filename hint for adapters.
    pub path: PathBuf,
    /// Content bytes. The core treats them as an opaque byte stream.
    pub bytes: Vec<u8>,
    /// SHA-256 content fingerprint.
    pub fingerprint: SourceFingerprint,
}

impl SourceFile {
    /// Wraps in-memory content as a source file.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let fingerprint = SourceFingerprint(sha256_hex(&bytes));
        Self {
            path: path.into(),
            bytes,
            fingerprint,
        }
    }

    /// Reads a source file from disk.
    pub fn load(path: &Path) -> Result<Self, StyleFitError> {
        let bytes = fs::read(path).map_err(|err| {
            StyleFitError::Corpus(
                ErrorInfo::new("source-read", err.to_string()).about(path.display().to_string()),
            )
        })?;
        Ok(Self::from_bytes(path, bytes))
    }
}

/// An ordered collection of source files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Corpus {
    /// Files in the order the caller supplied them.
    pub files: Vec<SourceFile>,
}

impl Corpus {
    /// Reads every path into memory; fails on the first unreadable file.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, StyleFitError> {
        if paths.is_empty() {
            return Err(StyleFitError::Corpus(ErrorInfo::new(
                "corpus-empty",
                "at least one source file is required",
            )));
        }
        let files = paths
            .iter()
            .map(|path| SourceFile::load(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { files })
    }

    /// Wraps already-loaded files.
    pub fn from_files(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    /// Number of files in the corpus.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true when the corpus holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
