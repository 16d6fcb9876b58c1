//! The recognizer as a child process driven over stdin/stdout pipes.
//!
//! The child reads observations from the observation log on its own; the pipe
//! only carries control frames and candidate reports. A reader thread owns the
//! child's stdout and forwards lines over a channel, so reads can honor the
//! [`CancelToken`] deadline instead of blocking forever.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use super::frame::{ControlFrame, ResponseLine};
use super::{CancelToken, Oracle};
use crate::error::{RecognizerError, RecognizerResult};

/// How often a read without deadline wakes up to check for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A recognizer child process, alive for one input file.
#[derive(Debug)]
pub struct ProcessOracle {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<std::io::Result<String>>,
}

impl ProcessOracle {
    /// Spawn `command[0]` with the remaining elements as arguments.
    pub fn spawn(command: &[String]) -> RecognizerResult<Self> {
        let (program, args) = command.split_first().ok_or_else(|| RecognizerError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| RecognizerError::Spawn {
                program: program.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().ok_or(RecognizerError::Closed)?;
        let (tx, lines) = mpsc::channel();
        thread::Builder::new()
            .name("recognizer-stdout".into())
            .spawn(move || {
                let mut reader = BufReader::new(stdout);
                let mut buf = Vec::new();
                loop {
                    buf.clear();
                    match reader.read_until(b'\n', &mut buf) {
                        Ok(0) => break,
                        Ok(_) => {
                            let line = String::from_utf8_lossy(&buf).into_owned();
                            if tx.send(Ok(line)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            break;
                        }
                    }
                }
            })
            .map_err(|e| RecognizerError::Spawn {
                program: program.clone(),
                source: e,
            })?;

        tracing::info!(program = %program, pid = child.id(), "recognizer started");
        Ok(Self {
            child,
            stdin,
            lines,
        })
    }

    fn send(&mut self, frame: ControlFrame) -> RecognizerResult<()> {
        let stdin = self.stdin.as_mut().ok_or(RecognizerError::Closed)?;
        stdin
            .write_all(frame.encode())
            .and_then(|()| stdin.flush())
            .map_err(|e| RecognizerError::Write { source: e })
    }

    fn next_line(&self, token: &CancelToken) -> RecognizerResult<String> {
        loop {
            if token.is_cancelled() {
                return Err(RecognizerError::Cancelled);
            }
            let wait = match token.remaining() {
                None => POLL_INTERVAL,
                Some(left) if left.is_zero() => {
                    return Err(RecognizerError::Timeout {
                        timeout: token.timeout().unwrap_or_default(),
                    });
                }
                Some(left) => left.min(POLL_INTERVAL),
            };
            match self.lines.recv_timeout(wait) {
                Ok(Ok(line)) => return Ok(line),
                Ok(Err(e)) => return Err(RecognizerError::Read { source: e }),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(RecognizerError::Closed),
            }
        }
    }
}

impl Oracle for ProcessOracle {
    /// The observation itself travels through the observation log; the child
    /// only needs the request frame.
    fn submit(&mut self, _observation: &str) -> RecognizerResult<()> {
        self.send(ControlFrame::Request)
    }

    fn read_candidates(&mut self, token: &CancelToken) -> RecognizerResult<Vec<String>> {
        let mut report = Vec::new();
        loop {
            let line = self.next_line(token)?;
            match ResponseLine::classify(&line) {
                ResponseLine::Terminator => break,
                ResponseLine::EndOfStream => {
                    tracing::warn!("recognizer stalled, resending end marker");
                    self.send(ControlFrame::Resync)?;
                    break;
                }
                ResponseLine::Candidate(candidate) => report.push(candidate),
            }
        }
        Ok(report)
    }
}

impl Drop for ProcessOracle {
    fn drop(&mut self) {
        // Closing stdin lets a well-behaved recognizer exit on its own.
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
        tracing::debug!(pid = self.child.id(), "recognizer stopped");
    }
}
