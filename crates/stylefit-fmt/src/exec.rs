//! Subprocess execution with stdin piping and a wall-clock timeout.
//!
//! Children own their pipes through dedicated reader threads, so large
//! outputs never deadlock. On timeout the child is killed and reaped; no
//! orphan processes survive an evaluation.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use stylefit_core::{ErrorInfo, StyleFitError};

/// Options governing every subprocess invocation of a run.
#[derive(Debug, Clone, Copy)]
pub struct ExecOptions {
    /// Wall-clock budget per invocation.
    pub timeout: Duration,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome of one subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExeResult {
    /// Exit code, when the process terminated normally.
    pub exit: Option<i32>,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// True when the wall-clock budget was exceeded and the child killed.
    pub timed_out: bool,
}

impl ExeResult {
    /// True for a normal zero exit.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit == Some(0)
    }
}

fn exec_error(code: &str, program: &str, err: impl ToString) -> StyleFitError {
    StyleFitError::Formatter(ErrorInfo::new(code, err.to_string()).about(program))
}

/// Runs `program` with `args`, piping `stdin_bytes` to the child, and waits
/// up to `timeout`.
pub fn run_with_stdin(
    program: &str,
    args: &[String],
    stdin_bytes: &[u8],
    timeout: Duration,
) -> Result<ExeResult, StyleFitError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| exec_error("exec-spawn", program, err))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| exec_error("exec-spawn", program, "stdin not piped"))?;
    let payload = stdin_bytes.to_vec();
    let writer = thread::spawn(move || {
        // A closed pipe means the child stopped reading; not an error here.
        let _ = stdin.write_all(&payload);
        drop(stdin);
    });

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| exec_error("exec-spawn", program, "stdout not piped"))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| exec_error("exec-spawn", program, "stderr not piped"))?;
    let stdout_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf);
        buf
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf);
        buf
    });

    let timed_out = !wait_with_deadline(&mut child, timeout)
        .map_err(|err| exec_error("exec-wait", program, err))?;
    if timed_out {
        let _ = child.kill();
        let _ = child.wait();
    }

    let _ = writer.join();
    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();
    let exit = if timed_out {
        None
    } else {
        child.wait().ok().and_then(|status| status.code())
    };

    Ok(ExeResult {
        exit,
        stdout,
        stderr,
        timed_out,
    })
}

/// Polls the child until it exits or the deadline passes.
/// Returns Ok(true) when the child exited in time.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<bool, std::io::Error> {
    let deadline = Instant::now() + timeout;
    loop {
        if child.try_wait()?.is_some() {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(Duration::from_millis(5));
    }
}

/// Captures the first line of a tool's `--version` banner. Used to derive
/// formatter fingerprints and to probe availability.
pub fn version_banner(program: &str, args: &[String]) -> Result<String, StyleFitError> {
    let result = run_with_stdin(program, args, b"", Duration::from_secs(10))?;
    if result.timed_out || result.exit.is_none() {
        return Err(exec_error("exec-version", program, "version probe did not exit"));
    }
    let text = if result.stdout.is_empty() {
        String::from_utf8_lossy(&result.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&result.stdout).into_owned()
    };
    Ok(text.lines().next().unwrap_or_default().trim().to_string())
}
