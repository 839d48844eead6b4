//! View-state modules: one reducer per view kind plus session-wide state.
//!
//! DESIGN
//! ======
//! Each view kind owns a typed event enum parsed as a whole from the wire
//! envelope — a payload that fails to parse rejects the entire update, so a
//! reducer never sees (or leaves behind) partially-applied state. Chart and
//! table series are plain data owned here; no handler touches a rendering
//! object.

pub mod dashboard;
pub mod job;
pub mod jobs;
pub mod run;
pub mod session;

use serde::de::DeserializeOwned;

use crate::net::types::Envelope;

/// Error produced when an envelope cannot become a typed view event.
///
/// Both variants are protocol violations: the update is discarded whole and
/// reported, and the view keeps its last-known-good state.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The event kind is not part of this view's protocol.
    #[error("unknown event kind {0:?} for this view")]
    UnknownKind(String),
    /// The payload did not match the event's schema.
    #[error("malformed {kind} payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Deserialize an envelope's payload as one unit.
pub(crate) fn payload<T: DeserializeOwned>(envelope: &Envelope) -> Result<T, EventError> {
    serde_json::from_value(envelope.data.clone())
        .map_err(|source| EventError::Payload { kind: envelope.kind.clone(), source })
}
