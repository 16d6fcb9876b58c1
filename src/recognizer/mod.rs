//! Goal recognizer: the external oracle and the session that drives it.
//!
//! - [`Oracle`]: capability interface over any transport (child process, in-process)
//! - [`frame`]: control frames and response-line classification
//! - [`process::ProcessOracle`]: the recognizer as a child process over pipes
//! - [`session::RecognizerSession`]: suppresses requests for unchanged observations

pub mod frame;
pub mod process;
pub mod session;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::RecognizerResult;

/// A goal-recognition oracle.
///
/// The oracle is stateful: observations must be submitted in frame order and
/// each submission answered with [`read_candidates`](Oracle::read_candidates)
/// before the next one.
pub trait Oracle {
    /// Announce a new observation.
    fn submit(&mut self, observation: &str) -> RecognizerResult<()>;

    /// Collect the candidate-goal report for the last submission.
    fn read_candidates(&mut self, token: &CancelToken) -> RecognizerResult<Vec<String>>;
}

/// Bounds a blocking read by a deadline and an external cancel flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that never expires.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A token expiring `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            deadline: Some(Instant::now() + timeout),
            cancelled: Arc::default(),
        }
    }

    /// `Some(t)` bounds reads by `t`, `None` waits forever.
    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::unbounded, Self::with_timeout)
    }

    /// Request cancellation; clones share the flag.
    ///
    /// The CLI never cancels and relies on the deadline alone. Library callers
    /// driving an [`Oracle`] from another thread hand a clone of the token to
    /// that thread and cancel it to abort a pending read.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The configured timeout, for error reporting.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Time left before the deadline. `None` means no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}
