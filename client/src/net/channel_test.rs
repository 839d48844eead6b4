use super::channel_binding::{BindingTable, Dispatch};
use super::channel_reconnect::{Phase, Reconnector};
use crate::net::topic::Topic;

// Drives the pure halves of the channel through the same sequences the
// async driver produces, so the recovery and classification invariants are
// checked without a browser socket.

#[test]
fn reconnect_delivers_snapshot_to_the_same_view() {
    let mut table = BindingTable::new();
    let mut machine = Reconnector::new();
    let topic = Topic::job("build");
    let view = uuid::Uuid::new_v4();
    let first_conn = uuid::Uuid::new_v4();

    // View enters; first snapshot binds the first connection.
    table.attach_view(topic.clone(), view);
    assert_eq!(table.classify(&topic, events::SNAPSHOT), Dispatch::FirstSnapshot);
    assert!(table.bind_connection(&topic, first_conn));
    machine.connected();

    // Unclean closure: connection detaches, timer arms, view survives.
    table.detach_connection(&topic);
    let timer = machine.unclean_close().expect("timer armed");
    assert_eq!(machine.phase(), Phase::WaitingToReconnect);
    assert_eq!(table.view_id(&topic), Some(view));

    // Timer fires, a new connection opens, and its opening snapshot is
    // first-time again — rebinding the same view, not creating a new one.
    assert!(machine.timer_fired(timer));
    let second_conn = uuid::Uuid::new_v4();
    assert_eq!(table.classify(&topic, events::SNAPSHOT), Dispatch::FirstSnapshot);
    assert!(table.bind_connection(&topic, second_conn));
    machine.connected();

    assert_eq!(table.view_id(&topic), Some(view));
    assert_eq!(table.bound_connection(&topic), Some(second_conn));
    assert_eq!(machine.phase(), Phase::Active);
}

#[test]
fn navigation_during_wait_cancels_recovery() {
    let mut table = BindingTable::new();
    let mut machine = Reconnector::new();
    let topic = Topic::run("build", 7);
    table.attach_view(topic.clone(), uuid::Uuid::new_v4());
    table.bind_connection(&topic, uuid::Uuid::new_v4());

    table.detach_connection(&topic);
    let timer = machine.unclean_close().expect("timer armed");

    // Teardown: cancel the timer, clear the slot.
    assert_eq!(machine.cancel(), Some(timer));
    table.detach_view(&topic);

    // The sleep still wakes afterwards; it must not resurrect anything.
    assert!(!machine.timer_fired(timer));
    assert!(!machine.has_pending_timer());
    assert_eq!(table.view_id(&topic), None);
}

#[test]
fn refresh_snapshot_never_resets_the_binding() {
    let mut table = BindingTable::new();
    let topic = Topic::job("deploy");
    let view = uuid::Uuid::new_v4();
    let conn = uuid::Uuid::new_v4();
    table.attach_view(topic.clone(), view);
    table.bind_connection(&topic, conn);

    // The job view re-sorts: the server answers with snapshots while the
    // view stays bound. Every one of them is an ordinary update.
    for _ in 0..3 {
        assert_eq!(table.classify(&topic, events::SNAPSHOT), Dispatch::Update);
    }
    assert_eq!(table.view_id(&topic), Some(view));
    assert_eq!(table.bound_connection(&topic), Some(conn));
}

#[test]
fn events_racing_a_navigation_are_rejected_not_crashed() {
    let mut table = BindingTable::new();
    let topic = Topic::dashboard();
    table.attach_view(topic.clone(), uuid::Uuid::new_v4());
    table.bind_connection(&topic, uuid::Uuid::new_v4());

    // Leave the page: the slot clears before the next view's setup.
    table.detach_view(&topic);

    // A straggler event for the dead view is a protocol error, and a
    // straggler snapshot would start a fresh first-time cycle.
    assert_eq!(table.classify(&topic, events::JOB_COMPLETED), Dispatch::ProtocolError);
    assert_eq!(table.classify(&topic, events::SNAPSHOT), Dispatch::FirstSnapshot);
}
