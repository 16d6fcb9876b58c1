//! Recognizer session: one oracle, one observation log, one input file.
//!
//! The session only contacts the oracle when the encoded observation differs
//! from the previous frame's. Unchanged frames reuse the last candidate
//! report, so oracle invocations are bounded by world-state transitions rather
//! than by frame count.

use std::time::Duration;

use super::{CancelToken, Oracle};
use crate::error::{RecognizerError, RecognizerResult};
use crate::obslog::ObservationLog;

/// Protocol state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for the next observation.
    Idle,
    /// A request is out; draining the response.
    AwaitingResponse,
    /// The oracle failed or went away; no further requests.
    Closed,
}

/// Drives an [`Oracle`] with per-frame observations.
pub struct RecognizerSession<O: Oracle> {
    oracle: O,
    log: ObservationLog,
    timeout: Option<Duration>,
    state: SessionState,
    last_observation: Option<String>,
    report: Vec<String>,
    requests: usize,
}

impl<O: Oracle> RecognizerSession<O> {
    /// Start a session. `timeout` bounds each response; `None` waits forever.
    pub fn new(oracle: O, log: ObservationLog, timeout: Option<Duration>) -> Self {
        Self {
            oracle,
            log,
            timeout,
            state: SessionState::Idle,
            last_observation: None,
            report: Vec::new(),
            requests: 0,
        }
    }

    /// Feed one frame's observation and return the current candidate report.
    ///
    /// A new observation is logged, synced, and submitted; a repeated one
    /// returns the previous report without touching the oracle.
    pub fn observe(&mut self, observation: &str) -> RecognizerResult<&[String]> {
        if self.last_observation.as_deref() == Some(observation) {
            return Ok(&self.report);
        }
        if self.state == SessionState::Closed {
            return Err(RecognizerError::Closed);
        }

        self.log.write_observation(observation)?;
        self.state = SessionState::AwaitingResponse;
        let token = CancelToken::from_timeout(self.timeout);
        let result = self
            .oracle
            .submit(observation)
            .and_then(|()| self.oracle.read_candidates(&token));
        match result {
            Ok(report) => {
                self.state = SessionState::Idle;
                self.requests += 1;
                self.report = report;
                self.last_observation = Some(observation.to_string());
                tracing::debug!(
                    request = self.requests,
                    candidates = self.report.len(),
                    "recognizer report received"
                );
                Ok(&self.report)
            }
            Err(e) => {
                self.state = SessionState::Closed;
                Err(e)
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Requests actually sent to the oracle.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// The most recent candidate report.
    pub fn report(&self) -> &[String] {
        &self.report
    }

    pub fn log(&self) -> &ObservationLog {
        &self.log
    }

    /// Tear the session down and hand back the oracle.
    pub fn into_oracle(self) -> O {
        self.oracle
    }
}
