//! Job-list state: every configured job, name-sorted, with tag and search
//! filtering.

#[cfg(test)]
#[path = "jobs_test.rs"]
mod jobs_test;

use std::collections::BTreeSet;

use crate::net::types::{Envelope, JobSummary, JobsSnapshot};
use crate::state::{EventError, payload};

/// Events the job-list view understands.
#[derive(Clone, Debug, PartialEq)]
pub enum JobsEvent {
    /// Full-state snapshot.
    Snapshot(JobsSnapshot),
    /// A run of some job began executing.
    JobStarted(JobSummary),
    /// A run of some job finished.
    JobCompleted(JobSummary),
}

impl JobsEvent {
    /// Parse an envelope into a typed event, or reject it whole.
    ///
    /// # Errors
    ///
    /// [`EventError::UnknownKind`] for kinds outside this view's protocol,
    /// [`EventError::Payload`] when the payload does not match the schema.
    pub fn parse(envelope: &Envelope) -> Result<Self, EventError> {
        match envelope.kind.as_str() {
            events::SNAPSHOT => payload(envelope).map(Self::Snapshot),
            events::JOB_STARTED => payload(envelope).map(Self::JobStarted),
            events::JOB_COMPLETED => payload(envelope).map(Self::JobCompleted),
            other => Err(EventError::UnknownKind(other.to_owned())),
        }
    }
}

/// Job-list view state.
///
/// `jobs` stays name-sorted ascending: a brand-new name is inserted and the
/// list immediately re-sorted; replacing an existing name never disturbs the
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobsState {
    pub jobs: Vec<JobSummary>,
    pub running: Vec<JobSummary>,
    /// Union of all tags across `jobs`, recomputed on snapshot.
    pub tags: Vec<String>,
    /// Active tag filter, if any.
    pub tag: Option<String>,
    /// Active name search text.
    pub search: String,
}

impl JobsState {
    /// Fold one event into the state.
    pub fn apply(&mut self, event: JobsEvent) {
        match event {
            JobsEvent::Snapshot(snapshot) => {
                self.jobs = snapshot.jobs;
                self.running = snapshot.running;
                // Running entries are authoritative and richer than the
                // stored rows; a job whose first-ever run is in flight has
                // no stored row at all yet.
                for entry in self.running.clone() {
                    upsert_by_name(&mut self.jobs, entry);
                }
                self.tags = self
                    .jobs
                    .iter()
                    .flat_map(|job| job.tags.iter().cloned())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
            }
            JobsEvent::JobStarted(job) => {
                match self.running.iter_mut().find(|entry| entry.name == job.name) {
                    Some(entry) => *entry = job.clone(),
                    None => self.running.insert(0, job.clone()),
                }
                upsert_by_name(&mut self.jobs, job);
            }
            JobsEvent::JobCompleted(job) => {
                if let Some(entry) = self.jobs.iter_mut().find(|entry| entry.name == job.name) {
                    *entry = job.clone();
                }
                self.running.retain(|entry| entry.name != job.name);
            }
        }
    }

    /// Jobs passing the active filters: tag first, then case-sensitive
    /// substring search on the name. Pure — repeated calls with unchanged
    /// state yield identical results.
    #[must_use]
    pub fn filtered_jobs(&self) -> Vec<&JobSummary> {
        self.jobs
            .iter()
            .filter(|job| {
                self.tag
                    .as_ref()
                    .is_none_or(|tag| job.tags.iter().any(|t| t == tag))
            })
            .filter(|job| self.search.is_empty() || job.name.contains(&self.search))
            .collect()
    }
}

/// Replace the entry with the same name, or insert the new name and restore
/// sort order.
fn upsert_by_name(jobs: &mut Vec<JobSummary>, job: JobSummary) {
    match jobs.iter_mut().find(|entry| entry.name == job.name) {
        Some(entry) => *entry = job,
        None => {
            jobs.insert(0, job);
            jobs.sort_by(|a, b| a.name.cmp(&b.name));
        }
    }
}
