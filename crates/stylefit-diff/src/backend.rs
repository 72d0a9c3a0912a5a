//! Backend selection. The backend is probed once at startup and frozen for
//! the run so distances stay comparable across candidates.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use stylefit_core::{ErrorInfo, StyleFitError};

use crate::external::{self, ExternalTool};
use crate::hunk::DiffResult;
use crate::internal;

/// Caller preference for the diff backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackendChoice {
    /// Probe external tools, fall back to the internal backend.
    #[default]
    Auto,
    /// Require the external `diff` tool.
    ExternalDiff,
    /// Require `git diff --no-index`.
    ExternalGit,
    /// Use the built-in line diff.
    Internal,
}

/// The backend frozen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// External `diff -U 0`.
    ExternalDiff,
    /// External `git diff --no-index --unified=0`.
    ExternalGit,
    /// Built-in line diff.
    Internal,
}

/// Probe sample: a small program and two well-separated modifications with
/// known distances under the counting rule. A backend that is missing or
/// miscounts on these is rejected.
const PROBE_SOURCE: &str = "fn greet() {\n    println!(\"hello\");\n}\n\nfn main() {\n    greet();\n}\n";
const PROBE_REINDENTED: &str =
    "fn greet() {\n  println!(\"hello\");\n}\n\nfn main() {\n    greet();\n}\n";
const PROBE_UNSPACED: &str = "fn greet() {\n    println!(\"hello\");\n}\nfn main() {\n    greet();\n}\n";

const PROBE_EXPECTED: [(&str, u64); 3] =
    [(PROBE_REINDENTED, 2), (PROBE_UNSPACED, 1), (PROBE_SOURCE, 0)];

/// The diff metric: a frozen backend plus the shared counting rule.
#[derive(Debug, Clone, Copy)]
pub struct DiffMetric {
    kind: BackendKind,
}

impl DiffMetric {
    /// Probes availability and freezes a backend for the run.
    ///
    /// `Auto` tries the external `diff`, then `git`, then settles on the
    /// internal backend, which is always available. A named external choice
    /// fails hard when its tool does not pass the probe.
    pub fn select(choice: BackendChoice) -> Result<Self, StyleFitError> {
        match choice {
            BackendChoice::Internal => Ok(Self {
                kind: BackendKind::Internal,
            }),
            BackendChoice::ExternalDiff => {
                if probe_external(ExternalTool::Diff) {
                    Ok(Self {
                        kind: BackendKind::ExternalDiff,
                    })
                } else {
                    Err(backend_unavailable("diff"))
                }
            }
            BackendChoice::ExternalGit => {
                if probe_external(ExternalTool::Git) {
                    Ok(Self {
                        kind: BackendKind::ExternalGit,
                    })
                } else {
                    Err(backend_unavailable("git"))
                }
            }
            BackendChoice::Auto => {
                let kind = if probe_external(ExternalTool::Diff) {
                    BackendKind::ExternalDiff
                } else if probe_external(ExternalTool::Git) {
                    BackendKind::ExternalGit
                } else {
                    BackendKind::Internal
                };
                Ok(Self { kind })
            }
        }
    }

    /// The backend this metric was frozen to.
    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Diffs a reference file (path on disk, bytes already read) against
    /// candidate bytes.
    ///
    /// External backend failure retries the pair on the internal backend;
    /// the counting rule is backend-independent, so mixing is safe.
    pub fn diff_file(
        &self,
        reference_path: &Path,
        reference_bytes: &[u8],
        candidate: &[u8],
    ) -> Result<DiffResult, StyleFitError> {
        let tool = match self.kind {
            BackendKind::Internal => return Ok(internal::diff(reference_bytes, candidate)),
            BackendKind::ExternalDiff => ExternalTool::Diff,
            BackendKind::ExternalGit => ExternalTool::Git,
        };
        match external::diff(tool, reference_path, candidate) {
            Ok(result) => Ok(result),
            Err(_) => Ok(internal::diff(reference_bytes, candidate)),
        }
    }

    /// Diffs two in-memory byte streams. External backends stage the
    /// reference in a scratch file.
    pub fn diff_bytes(
        &self,
        reference: &[u8],
        candidate: &[u8],
    ) -> Result<DiffResult, StyleFitError> {
        match self.kind {
            BackendKind::Internal => Ok(internal::diff(reference, candidate)),
            BackendKind::ExternalDiff | BackendKind::ExternalGit => {
                let dir = tempfile::tempdir().map_err(|err| {
                    StyleFitError::Metric(ErrorInfo::new("metric-scratch", err.to_string()))
                })?;
                let path = dir.path().join("reference");
                fs::write(&path, reference).map_err(|err| {
                    StyleFitError::Metric(ErrorInfo::new("metric-scratch", err.to_string()))
                })?;
                self.diff_file(&path, reference, candidate)
            }
        }
    }
}

fn backend_unavailable(tool: &str) -> StyleFitError {
    StyleFitError::Metric(
        ErrorInfo::new(
            "metric-backend-unavailable",
            format!("requested diff backend '{tool}' is missing or failed its probe"),
        )
        .suggest("use --diff-backend auto or install the tool"),
    )
}

fn probe_external(tool: ExternalTool) -> bool {
    let Ok(dir) = tempfile::tempdir() else {
        return false;
    };
    let path = dir.path().join("probe.rs");
    if fs::write(&path, PROBE_SOURCE).is_err() {
        return false;
    }
    for (candidate, expected) in PROBE_EXPECTED {
        match external::diff(tool, &path, candidate.as_bytes()) {
            Ok(result) if result.distance.0 == expected => {}
            _ => return false,
        }
    }
    true
}
