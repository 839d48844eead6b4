use super::*;

#[test]
fn recovery_delay_is_a_fixed_two_seconds() {
    // Constant backoff, no exponential growth.
    assert_eq!(RECONNECT_DELAY_MS, 2000);
}

#[test]
fn starts_active_with_no_timer() {
    let machine = Reconnector::new();
    assert_eq!(machine.phase(), Phase::Active);
    assert!(!machine.has_pending_timer());
}

#[test]
fn unclean_close_arms_exactly_one_timer() {
    let mut machine = Reconnector::new();
    let timer = machine.unclean_close();
    assert!(timer.is_some());
    assert_eq!(machine.phase(), Phase::WaitingToReconnect);

    // Further unclean closures while waiting must not stack timers.
    assert_eq!(machine.unclean_close(), None);
    assert_eq!(machine.unclean_close(), None);
    assert!(machine.has_pending_timer());
}

#[test]
fn timer_fired_moves_to_reconnecting_once() {
    let mut machine = Reconnector::new();
    let timer = machine.unclean_close().expect("timer");

    assert!(machine.timer_fired(timer));
    assert_eq!(machine.phase(), Phase::Reconnecting);
    assert!(!machine.has_pending_timer());

    // A duplicate fire of the same timer is a no-op.
    assert!(!machine.timer_fired(timer));
}

#[test]
fn cancelled_timer_fire_is_a_no_op() {
    let mut machine = Reconnector::new();
    let timer = machine.unclean_close().expect("timer");

    assert_eq!(machine.cancel(), Some(timer));
    assert!(!machine.has_pending_timer());

    // The sleep may still wake after teardown; it must not reconnect.
    assert!(!machine.timer_fired(timer));
    assert_eq!(machine.phase(), Phase::Active);
}

#[test]
fn cancel_with_no_timer_returns_none() {
    let mut machine = Reconnector::new();
    assert_eq!(machine.cancel(), None);
}

#[test]
fn snapshot_after_reconnect_returns_to_active() {
    let mut machine = Reconnector::new();
    let timer = machine.unclean_close().expect("timer");
    assert!(machine.timer_fired(timer));

    machine.connected();
    assert_eq!(machine.phase(), Phase::Active);
    assert!(!machine.has_pending_timer());
}

#[test]
fn failed_reconnect_arms_a_fresh_timer() {
    let mut machine = Reconnector::new();
    let first = machine.unclean_close().expect("timer");
    assert!(machine.timer_fired(first));

    // Reopening failed: another unclean close arrives while reconnecting.
    let second = machine.unclean_close().expect("timer");
    assert_ne!(first, second);

    // The old generation can no longer fire.
    assert!(!machine.timer_fired(first));
    assert!(machine.timer_fired(second));
}

#[test]
fn recovery_cycle_never_holds_two_timers() {
    let mut machine = Reconnector::new();
    for _ in 0..5 {
        let timer = machine.unclean_close().expect("timer");
        assert_eq!(machine.unclean_close(), None);
        assert!(machine.timer_fired(timer));
        machine.connected();
    }
    assert!(!machine.has_pending_timer());
}
