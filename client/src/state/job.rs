//! Single-job state: the job's run table, queue counter, and the
//! server-scoped sort/pagination controls.

#[cfg(test)]
#[path = "job_test.rs"]
mod job_test;

use crate::net::types::{Envelope, JobSnapshot, RunRef, SortOrder, SortSpec};
use crate::state::{EventError, payload};

/// Events the single-job view understands.
#[derive(Clone, Debug, PartialEq)]
pub enum JobEvent {
    /// Full-state snapshot, scoped by the sort the server applied. Also
    /// delivered mid-session as the answer to a re-sort/re-paginate request.
    Snapshot(Box<JobSnapshot>),
    /// Another run of this job entered the queue. Carries no payload the
    /// view needs.
    JobQueued,
    /// A queued run of this job began executing.
    JobStarted(RunRef),
    /// A running run of this job finished.
    JobCompleted(RunRef),
}

impl JobEvent {
    /// Parse an envelope into a typed event, or reject it whole.
    ///
    /// # Errors
    ///
    /// [`EventError::UnknownKind`] for kinds outside this view's protocol,
    /// [`EventError::Payload`] when the payload does not match the schema.
    pub fn parse(envelope: &Envelope) -> Result<Self, EventError> {
        match envelope.kind.as_str() {
            events::SNAPSHOT => payload(envelope).map(|s| Self::Snapshot(Box::new(s))),
            events::JOB_QUEUED => Ok(Self::JobQueued),
            events::JOB_STARTED => payload(envelope).map(Self::JobStarted),
            events::JOB_COMPLETED => payload(envelope).map(Self::JobCompleted),
            other => Err(EventError::UnknownKind(other.to_owned())),
        }
    }
}

/// One bar of the job view's build-time series, oldest run first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildTime {
    pub number: i64,
    pub seconds: i64,
    pub success: bool,
}

/// Single-job view state.
#[derive(Clone, Debug, PartialEq)]
pub struct JobState {
    pub running: Vec<RunRef>,
    pub recent: Vec<RunRef>,
    pub last_success: Option<RunRef>,
    pub last_failed: Option<RunRef>,
    /// Runs of this job currently waiting in the queue.
    pub queued_count: i64,
    /// Total pages of the run table under the current sort.
    pub page_count: i64,
    /// The sort the run table is currently scoped by.
    pub sort: SortSpec,
}

impl Default for JobState {
    fn default() -> Self {
        Self {
            running: Vec::new(),
            recent: Vec::new(),
            last_success: None,
            last_failed: None,
            queued_count: 0,
            page_count: 0,
            sort: SortSpec::default(),
        }
    }
}

impl JobState {
    /// Fold one event into the state.
    pub fn apply(&mut self, event: JobEvent) {
        match event {
            JobEvent::Snapshot(snapshot) => {
                self.running = snapshot.running;
                self.recent = snapshot.recent;
                self.last_success = snapshot.last_success;
                self.last_failed = snapshot.last_failed;
                self.queued_count = snapshot.n_queued;
                self.page_count = snapshot.pages;
                self.sort = snapshot.sort;
            }
            JobEvent::JobQueued => {
                self.queued_count += 1;
            }
            JobEvent::JobStarted(run) => {
                self.queued_count -= 1;
                self.running.insert(0, run);
            }
            JobEvent::JobCompleted(run) => {
                if let Some(pos) = self.running.iter().position(|entry| entry.number == run.number)
                {
                    self.running.remove(pos);
                    self.recent.insert(0, run);
                }
            }
        }
    }

    /// Advance to the next page. Returns the sort spec to send so the server
    /// answers with a re-scoped snapshot.
    pub fn page_next(&mut self) -> SortSpec {
        self.sort.page += 1;
        self.sort.clone()
    }

    /// Go back one page. Returns the sort spec to send.
    pub fn page_prev(&mut self) -> SortSpec {
        self.sort.page -= 1;
        self.sort.clone()
    }

    /// Sort by a field: re-sorting the current field flips the order, a new
    /// field starts descending. Returns the sort spec to send.
    pub fn do_sort(&mut self, field: &str) -> SortSpec {
        if self.sort.field == field {
            self.sort.order = self.sort.order.flipped();
        } else {
            self.sort.order = SortOrder::Dsc;
            self.sort.field = field.to_owned();
        }
        self.sort.clone()
    }

    /// Build-time bars for the recent-run chart, oldest first. Runs without
    /// both timestamps (still running when snapshotted) are skipped.
    #[must_use]
    pub fn build_time_series(&self) -> Vec<BuildTime> {
        self.recent
            .iter()
            .rev()
            .filter_map(|run| {
                let started = run.started?;
                let completed = run.completed?;
                Some(BuildTime {
                    number: run.number,
                    seconds: completed - started,
                    success: run.result.as_deref() == Some("success"),
                })
            })
            .collect()
    }
}
