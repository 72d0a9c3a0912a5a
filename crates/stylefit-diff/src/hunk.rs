//! The diff result model: an integer distance plus positional hunks.

use serde::{Deserialize, Serialize};

use stylefit_core::Distance;

/// Classification of a contiguous changed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HunkKind {
    /// Lines present only in the candidate.
    Insert,
    /// Lines present only in the reference.
    Delete,
    /// Reference lines replaced by candidate lines.
    Replace,
}

/// A contiguous changed region, positioned like a unified hunk header:
/// 1-based line numbers, zero-length ranges anchored to the preceding line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// First affected line in the reference.
    pub ref_start: u64,
    /// Number of reference lines removed.
    pub ref_lines: u64,
    /// First affected line in the candidate.
    pub new_start: u64,
    /// Number of candidate lines added.
    pub new_lines: u64,
    /// Structural classification.
    pub kind: HunkKind,
}

impl Hunk {
    /// Builds a hunk, deriving the classification from the two lengths.
    pub fn new(ref_start: u64, ref_lines: u64, new_start: u64, new_lines: u64) -> Self {
        let kind = if ref_lines == 0 {
            HunkKind::Insert
        } else if new_lines == 0 {
            HunkKind::Delete
        } else {
            HunkKind::Replace
        };
        Self {
            ref_start,
            ref_lines,
            new_start,
            new_lines,
            kind,
        }
    }

    /// Lines changed by this hunk under the counting rule
    /// (insertions plus deletions).
    pub fn changed_lines(&self) -> u64 {
        self.ref_lines + self.new_lines
    }
}

/// Result of diffing a (reference, candidate) byte pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Insertions plus deletions; a replacement counts as one of each.
    pub distance: Distance,
    /// Changed regions in reference order.
    pub hunks: Vec<Hunk>,
}

impl DiffResult {
    /// A result for byte streams with identical line content.
    pub fn identical() -> Self {
        Self {
            distance: Distance::ZERO,
            hunks: Vec::new(),
        }
    }

    /// Builds a result from hunks, summing their changed lines.
    pub fn from_hunks(hunks: Vec<Hunk>) -> Self {
        let total: u64 = hunks.iter().map(Hunk::changed_lines).sum();
        Self {
            distance: Distance(total),
            hunks,
        }
    }
}
