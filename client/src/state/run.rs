//! Single-run state: one run's detail plus its live log stream.
//!
//! The log arrives on a separate channel with its own lifecycle and no
//! ordering guarantee relative to state events; it is accumulated by
//! concatenation only and cleared exactly when the log channel is
//! (re)opened.

#[cfg(test)]
#[path = "run_test.rs"]
mod run_test;

use crate::net::types::{Envelope, RunDetail};
use crate::state::{EventError, payload};

/// Events the single-run view understands.
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    /// Full-state snapshot: the run's detail.
    Snapshot(Box<RunDetail>),
    /// A newer run of the same job started while this one is on screen.
    JobStarted,
    /// The viewed run finished.
    JobCompleted(Box<RunDetail>),
}

impl RunEvent {
    /// Parse an envelope into a typed event, or reject it whole.
    ///
    /// # Errors
    ///
    /// [`EventError::UnknownKind`] for kinds outside this view's protocol,
    /// [`EventError::Payload`] when the payload does not match the schema.
    pub fn parse(envelope: &Envelope) -> Result<Self, EventError> {
        match envelope.kind.as_str() {
            events::SNAPSHOT => payload(envelope).map(|r| Self::Snapshot(Box::new(r))),
            events::JOB_STARTED => Ok(Self::JobStarted),
            events::JOB_COMPLETED => payload(envelope).map(|r| Self::JobCompleted(Box::new(r))),
            other => Err(EventError::UnknownKind(other.to_owned())),
        }
    }
}

/// Whether a run has reached a terminal result. Anything else — including no
/// result at all — means it is still in progress.
#[must_use]
pub fn run_complete(run: &RunDetail) -> bool {
    matches!(run.result.as_deref(), Some("aborted" | "failed" | "success"))
}

/// Single-run view state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunState {
    /// The viewed run, absent until the first snapshot lands.
    pub run: Option<RunDetail>,
    /// Newest run number of this job; bumped when a newer run starts.
    pub latest_run_number: i64,
    /// The viewed run while it executes: zero or one element.
    pub running: Vec<RunDetail>,
    /// Accumulated log text from the log channel.
    pub log: String,
}

impl RunState {
    /// Fold one event into the state.
    pub fn apply(&mut self, event: RunEvent) {
        match event {
            RunEvent::Snapshot(run) => {
                self.latest_run_number = run.latest_num.unwrap_or(run.number);
                self.running = vec![(*run).clone()];
                self.run = Some(*run);
            }
            RunEvent::JobStarted => {
                self.latest_run_number += 1;
            }
            RunEvent::JobCompleted(run) => {
                self.running.clear();
                self.run = Some(*run);
            }
        }
    }

    /// Whether the viewed run has reached a terminal result.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.run.as_ref().is_some_and(run_complete)
    }

    /// Whether a newer run of this job exists than the one on screen.
    #[must_use]
    pub fn newer_run_available(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| self.latest_run_number > run.number)
    }

    /// Clear the log; called exactly when the log channel is (re)opened.
    pub fn reset_log(&mut self) {
        self.log.clear();
    }

    /// Append one log fragment in emission order.
    pub fn append_log(&mut self, chunk: &str) {
        self.log.push_str(chunk);
    }
}
