//! Aggregate-dashboard state: the queue, running and recent lists, executor
//! utilization, and the chart series fed to the (external) renderer.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::collections::HashMap;

use crate::net::types::{DashboardSnapshot, DayTally, Envelope, JobRef, JobStarted};
use crate::state::{EventError, payload};

/// Events the aggregate dashboard understands.
#[derive(Clone, Debug, PartialEq)]
pub enum DashboardEvent {
    /// Full-state snapshot; replaces everything wholesale.
    Snapshot(DashboardSnapshot),
    /// A job entered the queue.
    JobQueued(JobRef),
    /// A queued job began executing.
    JobStarted(JobStarted),
    /// A running job finished.
    JobCompleted(JobRef),
}

impl DashboardEvent {
    /// Parse an envelope into a typed event, or reject it whole.
    ///
    /// # Errors
    ///
    /// [`EventError::UnknownKind`] for kinds outside this view's protocol,
    /// [`EventError::Payload`] when the payload does not match the schema.
    pub fn parse(envelope: &Envelope) -> Result<Self, EventError> {
        match envelope.kind.as_str() {
            events::SNAPSHOT => payload(envelope).map(Self::Snapshot),
            events::JOB_QUEUED => payload(envelope).map(Self::JobQueued),
            events::JOB_STARTED => payload(envelope).map(Self::JobStarted),
            events::JOB_COMPLETED => payload(envelope).map(Self::JobCompleted),
            other => Err(EventError::UnknownKind(other.to_owned())),
        }
    }
}

/// Aggregate-dashboard view state.
///
/// `queued` is insertion-ordered, most recent first; `running` and `recent`
/// are keyed by `(name, number)` with live entries prepended.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    pub queued: Vec<JobRef>,
    pub running: Vec<JobRef>,
    pub recent: Vec<JobRef>,
    pub executors_busy: u32,
    pub executors_total: u32,
    /// 7-day success/failure tallies, oldest first; the last entry is today.
    pub builds_per_day: Vec<DayTally>,
    pub builds_per_job: HashMap<String, u64>,
    pub time_per_job: HashMap<String, i64>,
}

impl DashboardState {
    /// Fold one event into the state.
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Snapshot(snapshot) => {
                self.queued = snapshot.queued;
                self.running = snapshot.running;
                self.recent = snapshot.recent;
                self.executors_busy = snapshot.executors_busy;
                self.executors_total = snapshot.executors_total;
                self.builds_per_day = snapshot.builds_per_day;
                self.builds_per_job = snapshot.builds_per_job;
                self.time_per_job = snapshot.time_per_job;
            }
            DashboardEvent::JobQueued(job) => {
                self.queued.insert(0, job);
            }
            DashboardEvent::JobStarted(started) => {
                // Queue position is indexed from the tail of the list. An
                // index past the head means the server and client disagree;
                // the next snapshot reconciles, so skip the removal.
                if let Some(pos) = self.queued.len().checked_sub(started.queue_index + 1) {
                    self.queued.remove(pos);
                }
                self.running.insert(0, started.into());
                self.executors_busy += 1;
            }
            DashboardEvent::JobCompleted(job) => {
                if job.result.as_deref() == Some("success") {
                    if let Some(today) = self.builds_per_day.last_mut() {
                        today.success += 1;
                    }
                } else if let Some(today) = self.builds_per_day.last_mut() {
                    today.failed += 1;
                }
                *self.builds_per_job.entry(job.name.clone()).or_insert(0) += 1;
                self.executors_busy = self.executors_busy.saturating_sub(1);

                if let Some(pos) = self
                    .running
                    .iter()
                    .position(|entry| entry.is_run(&job.name, job.number))
                {
                    self.running.remove(pos);
                    self.recent.insert(0, job);
                }
            }
        }
    }

    /// Executors neither busy nor offline, for the utilization chart.
    #[must_use]
    pub fn executors_idle(&self) -> u32 {
        self.executors_total.saturating_sub(self.executors_busy)
    }

    /// Per-job run counts, most-run first, for the runs-per-job chart.
    #[must_use]
    pub fn builds_per_job_series(&self) -> Vec<(String, u64)> {
        let mut series: Vec<_> = self
            .builds_per_job
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        series.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        series
    }

    /// Per-job average runtimes, longest first, for the runtime chart.
    #[must_use]
    pub fn time_per_job_series(&self) -> Vec<(String, i64)> {
        let mut series: Vec<_> = self
            .time_per_job
            .iter()
            .map(|(name, seconds)| (name.clone(), *seconds))
            .collect();
        series.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        series
    }
}
