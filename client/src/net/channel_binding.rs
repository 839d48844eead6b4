//! Binding table between live views and their push channels.
//!
//! DESIGN
//! ======
//! Each topic owns one slot `{view_id, connection_id}`. A view attaches its
//! id when its page mounts; a connection id is recorded only once the
//! channel's first snapshot has been delivered to that view. Classification
//! of every inbound envelope reads this table, so "is this a first-time
//! snapshot" is an explicit state question instead of an implicit check on
//! cyclic back-references between socket and view.

#[cfg(test)]
#[path = "channel_binding_test.rs"]
mod channel_binding_test;

use std::collections::HashMap;

use uuid::Uuid;

use crate::net::topic::Topic;

/// How an inbound envelope must be dispatched for a given topic slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A genuine first snapshot: bind the connection to the view, apply
    /// session metadata (title, clock skew, connectivity), then fold the
    /// snapshot into the view state.
    FirstSnapshot,
    /// An ordinary incremental event for the already-bound view. Refresh
    /// snapshots requested by the view itself (re-sort, re-paginate) land
    /// here too: they update state but never rebind.
    Update,
    /// A non-snapshot message with no view to deliver to. Reported, then
    /// discarded.
    ProtocolError,
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    view_id: Option<Uuid>,
    connection_id: Option<Uuid>,
}

/// Per-topic binding state for all live channels.
#[derive(Debug, Default)]
pub struct BindingTable {
    slots: HashMap<Topic, Slot>,
}

impl BindingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a freshly mounted view to a topic slot. Replaces any stale
    /// slot left by a previous view of the same topic.
    pub fn attach_view(&mut self, topic: Topic, view_id: Uuid) {
        self.slots
            .insert(topic, Slot { view_id: Some(view_id), connection_id: None });
    }

    /// Record that a connection has delivered its first snapshot to the
    /// attached view. Returns `false` when no view is attached, in which
    /// case nothing is bound.
    pub fn bind_connection(&mut self, topic: &Topic, connection_id: Uuid) -> bool {
        match self.slots.get_mut(topic) {
            Some(slot) if slot.view_id.is_some() => {
                slot.connection_id = Some(connection_id);
                true
            }
            _ => false,
        }
    }

    /// Drop the connection half of a slot after an unclean closure. The view
    /// stays attached so the reconnect's snapshot re-binds the same view.
    pub fn detach_connection(&mut self, topic: &Topic) {
        if let Some(slot) = self.slots.get_mut(topic) {
            slot.connection_id = None;
        }
    }

    /// Tear down a slot entirely on navigation away.
    pub fn detach_view(&mut self, topic: &Topic) {
        self.slots.remove(topic);
    }

    /// The view currently attached to a topic, if any.
    #[must_use]
    pub fn view_id(&self, topic: &Topic) -> Option<Uuid> {
        self.slots.get(topic).and_then(|slot| slot.view_id)
    }

    /// The connection currently bound to a topic's view, if any.
    #[must_use]
    pub fn bound_connection(&self, topic: &Topic) -> Option<Uuid> {
        self.slots.get(topic).and_then(|slot| slot.connection_id)
    }

    /// Classify an inbound envelope kind for a topic.
    ///
    /// A snapshot is a genuine first snapshot iff the slot has no bound,
    /// live view — no view at all, or a view whose connection was lost.
    /// Everything else is either an update to the attached view or, with no
    /// view present, a protocol/ordering error.
    #[must_use]
    pub fn classify(&self, topic: &Topic, kind: &str) -> Dispatch {
        let slot = self.slots.get(topic).copied().unwrap_or_default();
        if kind == events::SNAPSHOT {
            if slot.view_id.is_some() && slot.connection_id.is_some() {
                Dispatch::Update
            } else {
                Dispatch::FirstSnapshot
            }
        } else if slot.view_id.is_some() {
            Dispatch::Update
        } else {
            Dispatch::ProtocolError
        }
    }
}
