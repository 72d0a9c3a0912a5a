//! External diff backends: `diff -U 0` and `git diff --no-index`.
//!
//! Both compare an on-disk reference file against candidate bytes piped on
//! stdin, and both are reduced to the shared counting rule by parsing the
//! unified hunk headers; the tools' own notions of distance never leak out.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use stylefit_core::{ErrorInfo, StyleFitError};

use crate::hunk::{DiffResult, Hunk};

/// Which external tool to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTool {
    /// POSIX `diff` with zero context lines.
    Diff,
    /// `git diff --no-index` with zero context lines.
    Git,
}

impl ExternalTool {
    /// Program name for process invocation.
    pub fn program(&self) -> &'static str {
        match self {
            ExternalTool::Diff => "diff",
            ExternalTool::Git => "git",
        }
    }

    fn command(&self, reference: &Path) -> Command {
        let mut cmd = Command::new(self.program());
        match self {
            ExternalTool::Diff => {
                cmd.arg("-U").arg("0").arg("--");
            }
            ExternalTool::Git => {
                cmd.arg("-c")
                    .arg("core.quotepath=false")
                    .arg("diff")
                    .arg("--no-index")
                    .arg("--unified=0")
                    .arg("--");
            }
        }
        cmd.arg(reference).arg("-");
        cmd
    }
}

fn tool_error(tool: ExternalTool, code: &str, message: impl ToString) -> StyleFitError {
    StyleFitError::Metric(ErrorInfo::new(code, message.to_string()).about(tool.program()))
}

/// Runs the external tool on (reference file, candidate stdin) and parses
/// the unified output into a [`DiffResult`].
pub fn diff(
    tool: ExternalTool,
    reference: &Path,
    candidate: &[u8],
) -> Result<DiffResult, StyleFitError> {
    let mut child = tool
        .command(reference)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| tool_error(tool, "metric-spawn", err))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| tool_error(tool, "metric-spawn", "stdin not piped"))?;
    let payload = candidate.to_vec();
    let writer = thread::spawn(move || {
        // A closed pipe just means the tool stopped reading early.
        let _ = stdin.write_all(&payload);
    });
    let output = child
        .wait_with_output()
        .map_err(|err| tool_error(tool, "metric-io", err))?;
    let _ = writer.join();

    let exit = output.status.code();
    match exit {
        Some(0) => Ok(DiffResult::identical()),
        Some(1) => {
            let hunks = parse_unified_hunks(&output.stdout);
            if hunks.is_empty() {
                // Differences reported but no parseable hunks (e.g. the tool
                // considered the input binary).
                return Err(tool_error(tool, "metric-unparseable", "no hunk headers in output"));
            }
            Ok(DiffResult::from_hunks(hunks))
        }
        other => Err(tool_error(
            tool,
            "metric-exit",
            format!("unexpected exit status {other:?}"),
        )),
    }
}

/// Parses `@@ -a[,b] +c[,d] @@` headers out of unified diff output.
pub fn parse_unified_hunks(output: &[u8]) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    for line in output.split(|&b| b == b'\n') {
        if let Some(hunk) = parse_hunk_header(line) {
            hunks.push(hunk);
        }
    }
    hunks
}

fn parse_hunk_header(line: &[u8]) -> Option<Hunk> {
    let text = std::str::from_utf8(line).ok()?;
    let rest = text.strip_prefix("@@ -")?;
    let (old_part, rest) = rest.split_once(" +")?;
    let (new_part, _) = rest.split_once(" @@")?;
    let (ref_start, ref_lines) = parse_range(old_part)?;
    let (new_start, new_lines) = parse_range(new_part)?;
    Some(Hunk::new(ref_start, ref_lines, new_start, new_lines))
}

fn parse_range(part: &str) -> Option<(u64, u64)> {
    match part.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((part.parse().ok()?, 1)),
    }
}
