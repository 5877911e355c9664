//! The external helper subprocess (§5, §6.1, §6.2, §9 "External helper
//! isolation").
//!
//! This is the one place in the workspace that reaches outside
//! process-local computation, and the one place that touches
//! `std::process` directly rather than going through a crate: no crate in
//! the retrieval pack provides a bounded-wait-on-child primitive, so the
//! 30-second cap is a plain polling loop against `Instant`, same as the
//! rest of the core stays free of async/thread crates it doesn't need.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::error::LoadError;
use super::schema::{BundleTables, HelperOutput};

const HELPER_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Built-in extraction script, piped to the helper's stdin. Writes one JSON
/// object keyed by the six table names to stdout.
const EXTRACTION_SCRIPT: &str = include_str!("extract.py");

/// Runs the helper interpreter with the built-in extraction script on
/// stdin, the two environment variables of §6.2, and a hard 30-second
/// wall-clock cap. `cancel` is polled between subphases (§5); returning
/// `true` aborts the helper and reports it as a failure.
pub fn run_helper(
    helper_command: &Path,
    bundle_path: &Path,
    ecosystem_repo: Option<&Path>,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<BundleTables, LoadError> {
    let mut child = Command::new(helper_command)
        .env("APWORLD_PATH", bundle_path)
        .env(
            "ECOSYSTEM_REPO_PATH",
            ecosystem_repo.unwrap_or_else(|| Path::new("")),
        )
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| LoadError::HelperFailure(e.to_string()))?;

    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(EXTRACTION_SCRIPT.as_bytes())
        .map_err(|e| LoadError::HelperFailure(e.to_string()))?;

    // Drained on their own threads, concurrently with the wait loop below:
    // a real bundle's JSON payload routinely exceeds the OS pipe buffer
    // (~64KB), and reading stdout only after the child exits would let it
    // fill the pipe and block the helper before it ever gets there.
    let mut stdout_pipe = child.stdout.take().expect("piped stdout");
    let stdout_reader = std::thread::spawn(move || {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).map(|_| buf)
    });
    let mut stderr_pipe = child.stderr.take().expect("piped stderr");
    let stderr_reader = std::thread::spawn(move || {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).map(|_| buf)
    });

    let start = Instant::now();
    let status = loop {
        if let Some(cancel) = cancel {
            if cancel() {
                let _ = child.kill();
                return Err(LoadError::HelperFailure(
                    "load cancelled while helper was running".to_string(),
                ));
            }
        }
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() >= HELPER_TIMEOUT {
                    let _ = child.kill();
                    return Err(LoadError::HelperFailure(
                        "helper exceeded 30-second wall-clock cap".to_string(),
                    ));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(LoadError::HelperFailure(e.to_string())),
        }
    };

    let stdout = stdout_reader
        .join()
        .expect("stdout reader thread panicked")
        .map_err(|e| LoadError::HelperFailure(e.to_string()))?;
    let stderr = stderr_reader
        .join()
        .expect("stderr reader thread panicked")
        .map_err(|e| LoadError::HelperFailure(e.to_string()))?;

    if !status.success() {
        return Err(LoadError::HelperFailure(format!(
            "helper exited with {status}: {}",
            String::from_utf8_lossy(&stderr)
        )));
    }

    let parsed: HelperOutput = serde_json::from_slice(&stdout).map_err(|source| {
        LoadError::Json {
            table: "helper output",
            source,
        }
    })?;
    Ok(parsed.into())
}
