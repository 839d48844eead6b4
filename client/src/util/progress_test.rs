use super::*;

#[test]
fn no_estimate_means_unknown() {
    assert_eq!(progress(100, 0, 50, None), Progress::Unknown);
}

#[test]
fn degenerate_estimate_means_unknown() {
    assert_eq!(progress(100, 0, 50, Some(50)), Progress::Unknown);
    assert_eq!(progress(100, 0, 50, Some(40)), Progress::Unknown);
}

#[test]
fn progress_is_proportional_before_the_estimate() {
    // Started at 0, estimated 100s: half way at t=50.
    assert_eq!(progress(50, 0, 0, Some(100)), Progress::Percent(50.0));
    assert_eq!(progress(25, 0, 0, Some(100)), Progress::Percent(25.0));
}

#[test]
fn progress_caps_at_99_past_the_estimate() {
    assert_eq!(progress(100, 0, 0, Some(100)), Progress::Percent(99.0));
    assert_eq!(progress(115, 0, 0, Some(100)), Progress::Percent(99.0));
    assert_eq!(progress(120, 0, 0, Some(100)), Progress::Percent(99.0));
}

#[test]
fn progress_goes_overtime_past_120_percent() {
    assert_eq!(progress(121, 0, 0, Some(100)), Progress::Overtime);
    assert_eq!(progress(500, 0, 0, Some(100)), Progress::Overtime);
}

#[test]
fn clock_skew_shifts_the_local_clock_onto_the_server_clock() {
    // Local clock is 30s behind the server: t_server = 50.
    assert_eq!(progress(20, 30, 0, Some(100)), Progress::Percent(50.0));
    // Local clock ahead of the server.
    assert_eq!(progress(80, -30, 0, Some(100)), Progress::Percent(50.0));
}
