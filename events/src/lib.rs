//! Shared message envelope and codec for the realtime push protocol.
//!
//! This crate owns the wire representation exchanged with the CI server over
//! per-view websocket channels. It intentionally keeps payloads flexible
//! (`serde_json::Value`) while the envelope itself — a type tag plus optional
//! snapshot metadata — stays strongly typed. View-specific payload schemas
//! live with their reducers in the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned by [`decode_envelope`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text could not be parsed as a JSON envelope.
    #[error("failed to parse message envelope: {0}")]
    Envelope(#[from] serde_json::Error),
    /// The envelope parsed but carries an empty `type` tag.
    #[error("message envelope has an empty type tag")]
    EmptyKind,
}

/// Type tag of the full-state snapshot, always the first message on a newly
/// opened state channel.
pub const SNAPSHOT: &str = "status";
/// A job entered the queue.
pub const JOB_QUEUED: &str = "job_queued";
/// A queued job began executing.
pub const JOB_STARTED: &str = "job_started";
/// A running job finished.
pub const JOB_COMPLETED: &str = "job_completed";

/// A single server→client message on a state channel.
///
/// `time` and `title` are present only on snapshot envelopes; incremental
/// events carry just the type tag and payload. The run log channel bypasses
/// this envelope entirely and streams raw text fragments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type tag, e.g. `"status"` or `"job_started"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific payload.
    #[serde(default)]
    pub data: Value,
    /// Server wall-clock time in seconds, snapshot only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    /// Page title for the subscribed topic, snapshot only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Envelope {
    /// Whether this envelope is a full-state snapshot.
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.kind == SNAPSHOT
    }
}

/// Decode one text frame from a state channel into an envelope.
///
/// # Errors
///
/// Returns [`CodecError::Envelope`] for malformed JSON or a missing `type`
/// tag, and [`CodecError::EmptyKind`] when the tag is present but empty.
pub fn decode_envelope(text: &str) -> Result<Envelope, CodecError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    if envelope.kind.is_empty() {
        return Err(CodecError::EmptyKind);
    }
    Ok(envelope)
}

/// Sort order of the single-job run table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Dsc,
}

impl SortOrder {
    /// The opposite order.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Dsc,
            Self::Dsc => Self::Asc,
        }
    }
}

/// The single client→server request: re-scope the run table of a job view.
///
/// Sent verbatim as the entire message body; the server answers with a fresh
/// snapshot envelope on the same channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column to sort the run table by.
    pub field: String,
    /// Sort direction.
    pub order: SortOrder,
    /// 1-based page of the run table.
    pub page: i64,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self { field: "number".to_owned(), order: SortOrder::Dsc, page: 1 }
    }
}

/// Encode a sort request for sending over the state channel.
///
/// # Panics
///
/// Never panics in practice; serializing a `SortSpec` is infallible.
#[must_use]
pub fn encode_sort(sort: &SortSpec) -> String {
    serde_json::to_string(sort).unwrap_or_default()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
