//! Shared wire-protocol DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types intentionally mirror server payloads so serde round-trips stay
//! lossless and websocket dispatch code can remain schema-driven. A payload
//! either deserializes as a whole or the update is rejected as a unit — no
//! partially-applied state.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use events::{Envelope, SortOrder, SortSpec};

/// A queued, running, or completed job as carried by aggregate-view payloads.
///
/// Which optional fields are populated depends on lifecycle position: queue
/// entries carry only identity (and possibly a trigger `reason`), running
/// entries add `started`/`eta`, completed entries add `completed`/`result`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobRef {
    /// Job name, unique on the server.
    pub name: String,
    /// Run number within the job; together with `name` identifies one run.
    pub number: i64,
    /// Terminal result (`"success"`, `"failed"`, `"aborted"`), if finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// What triggered the run, if the server knows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Start time in unix seconds (server clock).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
    /// Completion time in unix seconds (server clock).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<i64>,
    /// Estimated completion time in unix seconds, for progress display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
}

impl JobRef {
    /// Whether this ref identifies the run `(name, number)`.
    #[must_use]
    pub fn is_run(&self, name: &str, number: i64) -> bool {
        self.name == name && self.number == number
    }
}

/// A `job_started` payload on the aggregate dashboard: the job that left the
/// queue, plus its position in the queue counted from the tail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobStarted {
    pub name: String,
    pub number: i64,
    /// Queue position indexed from the tail of the queued list.
    #[serde(rename = "queueIndex")]
    pub queue_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
}

impl From<JobStarted> for JobRef {
    fn from(value: JobStarted) -> Self {
        Self {
            name: value.name,
            number: value.number,
            result: value.result,
            reason: value.reason,
            started: value.started,
            completed: None,
            eta: value.eta,
        }
    }
}

/// A job-list row: latest-run data plus the job's tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    pub number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
    /// Job tags used for list filtering.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One run of a single job, as listed in the job view's run table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRef {
    pub number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
}

/// Full detail of one run, the payload of the single-run view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunDetail {
    pub name: String,
    pub number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<i64>,
    /// Seconds spent waiting in the queue before starting.
    #[serde(default, rename = "queuedFor", skip_serializing_if = "Option::is_none")]
    pub queued_for: Option<i64>,
    /// Artifacts published by the run.
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    /// Newest run number of this job known to the server at snapshot time.
    #[serde(default, rename = "latestNum", skip_serializing_if = "Option::is_none")]
    pub latest_num: Option<i64>,
}

/// A downloadable artifact published by a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub url: String,
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
}

/// One day's success/failure tally in the dashboard's 7-day series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTally {
    #[serde(default)]
    pub success: u32,
    #[serde(default)]
    pub failed: u32,
}

/// Aggregate-dashboard snapshot payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub queued: Vec<JobRef>,
    #[serde(default)]
    pub running: Vec<JobRef>,
    #[serde(default)]
    pub recent: Vec<JobRef>,
    #[serde(default, rename = "executorsBusy")]
    pub executors_busy: u32,
    #[serde(default, rename = "executorsTotal")]
    pub executors_total: u32,
    /// Per-day build tallies, oldest first; the last entry is today.
    #[serde(default, rename = "buildsPerDay")]
    pub builds_per_day: Vec<DayTally>,
    /// Run counts per job name over the server's reporting window.
    #[serde(default, rename = "buildsPerJob")]
    pub builds_per_job: HashMap<String, u64>,
    /// Average runtime in seconds per job name.
    #[serde(default, rename = "timePerJob")]
    pub time_per_job: HashMap<String, i64>,
}

/// Job-list snapshot payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobsSnapshot {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
    #[serde(default)]
    pub running: Vec<JobSummary>,
}

/// Single-job snapshot payload: the run table scoped by the current sort.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    #[serde(default)]
    pub running: Vec<RunRef>,
    #[serde(default)]
    pub recent: Vec<RunRef>,
    #[serde(default, rename = "lastSuccess", skip_serializing_if = "Option::is_none")]
    pub last_success: Option<RunRef>,
    #[serde(default, rename = "lastFailed", skip_serializing_if = "Option::is_none")]
    pub last_failed: Option<RunRef>,
    #[serde(rename = "nQueued")]
    pub n_queued: i64,
    /// Total pages of the run table under the current sort.
    pub pages: i64,
    /// Sort the server used to scope this snapshot.
    pub sort: SortSpec,
}
