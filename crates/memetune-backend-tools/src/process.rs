//! Subprocess execution with piped stdin/stdout and a timeout.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{ToolError, ToolResult};

/// Default timeout for one tool invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs `cmd`, feeding `input` on stdin, and returns everything it wrote to
/// stdout.
///
/// Stdin is written and stdout/stderr are drained on their own threads so a
/// child that fills one pipe while the other is blocked cannot deadlock.
/// The child is killed if it runs longer than `timeout`.
pub fn run_piped(
    tool: &str,
    mut cmd: Command,
    input: Vec<u8>,
    timeout: Duration,
) -> ToolResult<Vec<u8>> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| ToolError::SpawnFailed {
        tool: tool.to_string(),
        source,
    })?;

    let writer = child.stdin.take().map(|mut stdin| {
        thread::spawn(move || {
            // A child that exits early closes the pipe; its status tells the story
            let _ = stdin.write_all(&input);
        })
    });
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = wait_with_timeout(tool, &mut child, timeout)?;

    if let Some(writer) = writer {
        let _ = writer.join();
    }
    let stdout = collect(stdout)?;
    let stderr = String::from_utf8_lossy(&collect(stderr)?).trim().to_string();

    if !status.success() {
        let exit_code = status.code().unwrap_or(-1);
        return Err(ToolError::process_failed(tool, exit_code, stderr));
    }
    if !stderr.is_empty() {
        log::debug!("{} stderr: {}", tool, stderr);
    }
    if stdout.is_empty() {
        return Err(ToolError::EmptyOutput {
            tool: tool.to_string(),
        });
    }

    Ok(stdout)
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> ToolResult<Vec<u8>> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err(ToolError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "pipe reader thread panicked",
            ))),
        },
        None => Ok(Vec::new()),
    }
}

fn wait_with_timeout(tool: &str, child: &mut Child, timeout: Duration) -> ToolResult<ExitStatus> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ToolError::Timeout {
                        tool: tool.to_string(),
                        timeout_secs: timeout.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                return Err(ToolError::SpawnFailed {
                    tool: tool.to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", script]);
        cmd
    }

    #[test]
    fn test_round_trips_stdin() {
        let out = run_piped("cat", sh("cat"), b"hello".to_vec(), Duration::from_secs(5)).unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn test_large_payload_does_not_deadlock() {
        let input = vec![7u8; 4 * 1024 * 1024];
        let out = run_piped("cat", sh("cat"), input.clone(), Duration::from_secs(30)).unwrap();
        assert_eq!(out.len(), input.len());
    }

    #[test]
    fn test_nonzero_exit_reports_stderr() {
        let err = run_piped(
            "failing",
            sh("echo broken 1>&2; exit 3"),
            Vec::new(),
            Duration::from_secs(5),
        )
        .unwrap_err();
        match err {
            ToolError::ProcessFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_output() {
        let err = run_piped("quiet", sh("cat >/dev/null"), b"x".to_vec(), Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, ToolError::EmptyOutput { .. }));
    }

    #[test]
    fn test_timeout_kills_child() {
        let start = Instant::now();
        let err = run_piped("sleeper", sh("exec sleep 10"), Vec::new(), Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_spawn_failure() {
        let cmd = Command::new("/nonexistent/memetune/tool");
        let err = run_piped("missing", cmd, Vec::new(), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ToolError::SpawnFailed { .. }));
    }
}
