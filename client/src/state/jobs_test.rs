use super::*;

fn summary(name: &str, number: i64) -> JobSummary {
    JobSummary {
        name: name.to_owned(),
        number,
        result: None,
        reason: None,
        started: None,
        completed: None,
        eta: None,
        tags: Vec::new(),
    }
}

fn tagged(name: &str, number: i64, tags: &[&str]) -> JobSummary {
    JobSummary { tags: tags.iter().map(|t| (*t).to_owned()).collect(), ..summary(name, number) }
}

fn names(jobs: &[&JobSummary]) -> Vec<String> {
    jobs.iter().map(|job| job.name.clone()).collect()
}

fn sorted_names(state: &JobsState) -> Vec<String> {
    state.jobs.iter().map(|job| job.name.clone()).collect()
}

#[test]
fn snapshot_merges_running_entries_over_stored_rows() {
    let mut state = JobsState::default();
    let mut running_build = summary("build", 8);
    running_build.started = Some(100);

    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![summary("build", 7), summary("deploy", 3)],
        running: vec![running_build],
    }));

    // The running entry is authoritative for its name.
    assert_eq!(state.jobs.len(), 2);
    let build = state.jobs.iter().find(|j| j.name == "build").expect("build row");
    assert_eq!(build.number, 8);
    assert_eq!(build.started, Some(100));
}

#[test]
fn snapshot_inserts_first_ever_run_and_re_sorts() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![summary("alpha", 1), summary("zulu", 2)],
        running: vec![summary("mike", 1)],
    }));
    assert_eq!(sorted_names(&state), ["alpha", "mike", "zulu"]);
}

#[test]
fn snapshot_recomputes_tag_union() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![
            tagged("a", 1, &["deploy", "nightly"]),
            tagged("b", 2, &["nightly"]),
            summary("c", 3),
        ],
        running: vec![],
    }));
    assert_eq!(state.tags, ["deploy", "nightly"]);
}

#[test]
fn job_started_upserts_running_and_jobs() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![summary("build", 1)],
        running: vec![],
    }));

    state.apply(JobsEvent::JobStarted(summary("build", 2)));
    assert_eq!(state.running.len(), 1);
    assert_eq!(state.jobs.len(), 1);
    assert_eq!(state.jobs[0].number, 2);

    // Same name again replaces, never duplicates.
    state.apply(JobsEvent::JobStarted(summary("build", 3)));
    assert_eq!(state.running.len(), 1);
    assert_eq!(state.running[0].number, 3);
    assert_eq!(state.jobs.len(), 1);
}

#[test]
fn job_started_with_new_name_keeps_sort_order() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![summary("alpha", 1), summary("zulu", 1)],
        running: vec![],
    }));
    state.apply(JobsEvent::JobStarted(summary("mike", 1)));
    assert_eq!(sorted_names(&state), ["alpha", "mike", "zulu"]);
}

#[test]
fn jobs_stay_sorted_after_every_mutation() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![summary("b", 1)],
        running: vec![summary("d", 1)],
    }));
    state.apply(JobsEvent::JobStarted(summary("a", 1)));
    state.apply(JobsEvent::JobStarted(summary("c", 1)));
    state.apply(JobsEvent::JobCompleted(summary("c", 1)));
    assert_eq!(sorted_names(&state), ["a", "b", "c", "d"]);
}

#[test]
fn job_completed_replaces_row_and_clears_running() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![summary("build", 1)],
        running: vec![summary("build", 2)],
    }));

    let mut done = summary("build", 2);
    done.result = Some("success".to_owned());
    state.apply(JobsEvent::JobCompleted(done));

    assert!(state.running.is_empty());
    assert_eq!(state.jobs[0].result.as_deref(), Some("success"));
}

#[test]
fn filtered_jobs_applies_tag_then_search() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![
            tagged("build-linux", 1, &["linux"]),
            tagged("build-mac", 1, &["mac"]),
            tagged("test-linux", 1, &["linux"]),
        ],
        running: vec![],
    }));

    state.tag = Some("linux".to_owned());
    assert_eq!(names(&state.filtered_jobs()), ["build-linux", "test-linux"]);

    state.search = "build".to_owned();
    assert_eq!(names(&state.filtered_jobs()), ["build-linux"]);
}

#[test]
fn filtered_jobs_search_is_case_sensitive_substring() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![summary("Build", 1), summary("rebuild", 1)],
        running: vec![],
    }));
    state.search = "build".to_owned();
    assert_eq!(names(&state.filtered_jobs()), ["rebuild"]);
}

#[test]
fn filtered_jobs_is_pure_and_idempotent() {
    let mut state = JobsState::default();
    state.apply(JobsEvent::Snapshot(JobsSnapshot {
        jobs: vec![tagged("a", 1, &["x"]), summary("b", 1)],
        running: vec![],
    }));
    state.tag = Some("x".to_owned());

    let first = names(&state.filtered_jobs());
    let second = names(&state.filtered_jobs());
    assert_eq!(first, second);

    // A tag no job carries filters everything out.
    state.tag = Some("nope".to_owned());
    assert!(state.filtered_jobs().is_empty());

    // Empty search leaves the tag-filtered list unchanged.
    state.tag = Some("x".to_owned());
    state.search = String::new();
    assert_eq!(names(&state.filtered_jobs()), ["a"]);
}

#[test]
fn parse_rejects_kinds_outside_this_view() {
    let envelope = events::decode_envelope(r#"{"type":"job_queued","data":{}}"#).expect("decode");
    let err = JobsEvent::parse(&envelope).expect_err("kind should be rejected");
    assert!(matches!(err, EventError::UnknownKind(_)));
}
