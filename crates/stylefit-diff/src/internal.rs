//! Built-in line diff backend. Always available; used as the fallback when
//! an external tool fails mid-run.

use similar::{DiffOp, TextDiff};

use crate::hunk::{DiffResult, Hunk};

/// Diffs two byte streams line by line.
///
/// Line tokens retain their terminators, so a missing trailing newline on
/// the last line makes that line count as changed.
pub fn diff(reference: &[u8], candidate: &[u8]) -> DiffResult {
    if reference == candidate {
        return DiffResult::identical();
    }
    let diff = TextDiff::from_lines(reference, candidate);
    let mut hunks = Vec::new();
    for op in diff.ops() {
        match *op {
            DiffOp::Equal { .. } => {}
            DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => {
                hunks.push(Hunk::new(old_index as u64 + 1, old_len as u64, new_index as u64, 0));
            }
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => {
                hunks.push(Hunk::new(old_index as u64, 0, new_index as u64 + 1, new_len as u64));
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                hunks.push(Hunk::new(
                    old_index as u64 + 1,
                    old_len as u64,
                    new_index as u64 + 1,
                    new_len as u64,
                ));
            }
        }
    }
    DiffResult::from_hunks(hunks)
}
