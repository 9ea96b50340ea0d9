//! Shell spawning with a wall-clock timeout and bounded output capture.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

/// Captured output of one shell invocation.
#[derive(Debug)]
pub struct ShellOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
}

/// Run `command` through `sh -c` with a timeout, capturing stdout/stderr
/// without risking pipe deadlocks.
///
/// The command string is handed to the shell verbatim so batched diagnostics
/// (`;`, `|`, `&&`) work as a single invocation. Output is read concurrently
/// while the child runs; `output_limit_bytes` bounds the amount stored in
/// memory per stream (bytes beyond it are discarded while still draining the
/// pipe). On timeout the child is killed and the output captured so far is
/// returned with `timed_out` set.
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs(), output_limit_bytes))]
pub fn run_shell_with_timeout(
    command: &str,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<ShellOutput> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning shell");
    let mut child = cmd.spawn().context("spawn shell")?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => status,
        None => {
            warn!(timeout_secs = timeout.as_secs(), "command timed out, killing");
            timed_out = true;
            child.kill().context("kill command")?;
            child.wait().context("wait command after kill")?
        }
    };

    let stdout = join_output(stdout_handle).context("join stdout")?;
    let stderr = join_output(stderr_handle).context("join stderr")?;

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(ShellOutput {
        status,
        stdout,
        stderr,
        timed_out,
    })
}

fn join_output(handle: thread::JoinHandle<Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            buf.extend_from_slice(&chunk[..n.min(remaining)]);
        }
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_status() {
        let output =
            run_shell_with_timeout("echo one; echo two >&2", Duration::from_secs(5), 10_000)
                .expect("run");
        assert!(output.status.success());
        assert!(!output.timed_out);
        assert_eq!(String::from_utf8_lossy(&output.stdout), "one\n");
        assert_eq!(String::from_utf8_lossy(&output.stderr), "two\n");
    }

    #[test]
    fn capture_is_bounded() {
        let output = run_shell_with_timeout(
            "printf 'abcdefghij'; printf 'abcdefghij'",
            Duration::from_secs(5),
            8,
        )
        .expect("run");
        assert_eq!(output.stdout.len(), 8);
    }

    #[test]
    fn timeout_kills_the_child_and_keeps_partial_output() {
        let output = run_shell_with_timeout(
            "echo early; sleep 30; echo late",
            Duration::from_secs(1),
            10_000,
        )
        .expect("run");
        assert!(output.timed_out);
        assert_eq!(String::from_utf8_lossy(&output.stdout), "early\n");
    }

    #[test]
    fn bounded_reader_drains_past_the_limit() {
        let data = std::io::Cursor::new(vec![b'x'; 20_000]);
        let buf = read_stream_limited(data, 100).expect("read");
        assert_eq!(buf.len(), 100);
    }
}
