//! Stdio-subprocess transport variant.
//!
//! Spawns a child process from a caller-supplied command line with piped
//! stdin/stdout. A background task continuously drains the child's stdout
//! line-by-line onto an unbounded queue, tagging each line with its arrival
//! time — this decoupling exists so a slow or absent reader on our side can
//! never block the child from writing, and so our sender never blocks on
//! the child's read loop either. Sending writes the JSON followed by a
//! newline, flushes, and dequeues one line within the deadline.
//!
//! Per the open question this design inherits from its source material: the
//! queue head is assumed to correspond to the most recent outstanding
//! request. MCP is request-paired in practice, but a server that emits
//! unsolicited notifications would be mis-paired by this scheme; a
//! follow-up would reject lines whose decoded `id` doesn't match, or switch
//! to an id-indexed dispatch map.

use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::{ScanError, ScanResult};

use super::TransportResponse;

struct ResponseLine {
    raw: String,
    arrived_at: Instant,
}

pub struct StdioTransport {
    child: Child,
    stdin: tokio::process::ChildStdin,
    lines: UnboundedReceiver<ResponseLine>,
}

impl StdioTransport {
    /// Spawns `command` through the platform shell so callers can pass a
    /// full command line (e.g. `"python server.py --flag"`) the same way
    /// the source material's `subprocess.Popen(cmd, shell=True)` does.
    pub fn spawn(command: &str) -> ScanResult<Self> {
        let mut cmd = shell_command(command);
        cmd.stdin(std::process::Stdio::piped());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());

        let mut child = cmd.spawn().map_err(ScanError::TransportIo)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ScanError::other("failed to open stdio child stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ScanError::other("failed to open stdio child stdout"))?;

        let (tx, rx): (UnboundedSender<ResponseLine>, UnboundedReceiver<ResponseLine>) =
            mpsc::unbounded_channel();
        tokio::spawn(read_loop(stdout, tx));

        Ok(Self {
            child,
            stdin,
            lines: rx,
        })
    }

    pub async fn send(&mut self, message: &Value, timeout: Duration) -> ScanResult<TransportResponse> {
        if let Ok(Some(_)) = self.child.try_wait() {
            return Err(ScanError::other("stdio process has exited"));
        }

        let start = Instant::now();
        let mut payload = serde_json::to_vec(message).map_err(ScanError::TransportDecode)?;
        payload.push(b'\n');

        self.stdin
            .write_all(&payload)
            .await
            .map_err(ScanError::TransportIo)?;
        self.stdin.flush().await.map_err(ScanError::TransportIo)?;

        let line = tokio::time::timeout(timeout, self.lines.recv())
            .await
            .map_err(|_| ScanError::timeout(format!("timed out waiting for stdio response after {timeout:?}")))?
            .ok_or_else(|| ScanError::other("stdio reader closed before a response arrived"))?;

        let latency_ms = line.arrived_at.duration_since(start).as_secs_f64() * 1000.0;
        let response_payload: Value =
            serde_json::from_str(&line.raw).map_err(ScanError::TransportDecode)?;

        Ok(TransportResponse {
            payload: response_payload,
            latency_ms,
        })
    }

    pub async fn close(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.start_kill();
            let wait = tokio::time::timeout(Duration::from_secs(2), self.child.wait()).await;
            if wait.is_err() {
                let _ = self.child.kill().await;
            }
        }
    }
}

async fn read_loop(stdout: tokio::process::ChildStdout, tx: UnboundedSender<ResponseLine>) {
    let mut reader = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = reader.next_line().await {
        let trimmed = line.trim().to_string();
        if trimmed.is_empty() {
            continue;
        }
        if tx
            .send(ResponseLine {
                raw: trimmed,
                arrived_at: Instant::now(),
            })
            .is_err()
        {
            break;
        }
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(not(unix))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
