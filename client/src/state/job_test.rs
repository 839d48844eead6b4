use super::*;

fn run(number: i64) -> RunRef {
    RunRef { number, result: None, reason: None, started: None, completed: None, eta: None }
}

fn finished(number: i64, result: &str, started: i64, completed: i64) -> RunRef {
    RunRef {
        result: Some(result.to_owned()),
        started: Some(started),
        completed: Some(completed),
        ..run(number)
    }
}

fn snapshot() -> JobSnapshot {
    JobSnapshot {
        running: vec![run(5)],
        recent: vec![finished(4, "success", 100, 160), finished(3, "failed", 50, 80)],
        last_success: Some(finished(4, "success", 100, 160)),
        last_failed: Some(finished(3, "failed", 50, 80)),
        n_queued: 2,
        pages: 3,
        sort: SortSpec { field: "number".to_owned(), order: SortOrder::Dsc, page: 1 },
    }
}

fn state() -> JobState {
    let mut state = JobState::default();
    state.apply(JobEvent::Snapshot(Box::new(snapshot())));
    state
}

#[test]
fn snapshot_replaces_all_fields_verbatim() {
    let state = state();
    assert_eq!(state.running.len(), 1);
    assert_eq!(state.recent.len(), 2);
    assert_eq!(state.queued_count, 2);
    assert_eq!(state.page_count, 3);
    assert_eq!(state.sort.field, "number");
    assert_eq!(state.last_success.as_ref().map(|r| r.number), Some(4));
    assert_eq!(state.last_failed.as_ref().map(|r| r.number), Some(3));
}

#[test]
fn job_queued_bumps_the_counter() {
    let mut state = state();
    state.apply(JobEvent::JobQueued);
    assert_eq!(state.queued_count, 3);
}

#[test]
fn job_started_dequeues_and_prepends() {
    let mut state = state();
    state.apply(JobEvent::JobStarted(run(6)));
    assert_eq!(state.queued_count, 1);
    assert_eq!(state.running[0].number, 6);
    assert_eq!(state.running.len(), 2);
}

#[test]
fn job_completed_moves_run_by_number() {
    let mut state = state();
    state.apply(JobEvent::JobCompleted(finished(5, "success", 200, 260)));
    assert!(state.running.is_empty());
    assert_eq!(state.recent[0].number, 5);
    assert_eq!(state.recent.len(), 3);
}

#[test]
fn job_completed_for_unknown_number_changes_nothing() {
    let mut state = state();
    state.apply(JobEvent::JobCompleted(finished(99, "success", 0, 1)));
    assert_eq!(state.running.len(), 1);
    assert_eq!(state.recent.len(), 2);
}

#[test]
fn do_sort_same_field_flips_order() {
    // sort = {field: number, order: dsc, page: 1}
    let mut state = state();
    let sent = state.do_sort("number");
    assert_eq!(sent, SortSpec { field: "number".to_owned(), order: SortOrder::Asc, page: 1 });

    let sent = state.do_sort("duration");
    assert_eq!(sent, SortSpec { field: "duration".to_owned(), order: SortOrder::Dsc, page: 1 });
}

#[test]
fn page_controls_move_and_return_the_spec_to_send() {
    let mut state = state();
    let sent = state.page_next();
    assert_eq!(sent.page, 2);
    assert_eq!(state.sort.page, 2);

    let sent = state.page_prev();
    assert_eq!(sent.page, 1);
}

#[test]
fn refresh_snapshot_adopts_the_servers_sort() {
    let mut state = state();
    state.do_sort("duration");

    // The server answers with a snapshot scoped by the requested sort; the
    // view folds it in like any other snapshot.
    let mut refreshed = snapshot();
    refreshed.sort = SortSpec { field: "duration".to_owned(), order: SortOrder::Dsc, page: 1 };
    refreshed.n_queued = 0;
    state.apply(JobEvent::Snapshot(Box::new(refreshed)));

    assert_eq!(state.sort.field, "duration");
    assert_eq!(state.queued_count, 0);
}

#[test]
fn build_time_series_is_oldest_first_with_result_flags() {
    let state = state();
    let series = state.build_time_series();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0], BuildTime { number: 3, seconds: 30, success: false });
    assert_eq!(series[1], BuildTime { number: 4, seconds: 60, success: true });
}

#[test]
fn build_time_series_skips_unfinished_runs() {
    let mut state = state();
    state.recent.insert(0, run(6));
    assert_eq!(state.build_time_series().len(), 2);
}

#[test]
fn parse_accepts_job_queued_without_payload() {
    let envelope = events::decode_envelope(r#"{"type":"job_queued"}"#).expect("decode");
    assert_eq!(JobEvent::parse(&envelope).expect("event"), JobEvent::JobQueued);
}

#[test]
fn parse_rejects_malformed_started_payload() {
    let envelope =
        events::decode_envelope(r#"{"type":"job_started","data":{"started":"soon"}}"#)
            .expect("decode");
    assert!(matches!(
        JobEvent::parse(&envelope),
        Err(EventError::Payload { .. })
    ));
}
