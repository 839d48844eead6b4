//! Process-wide session state shared by every view.
//!
//! Connectivity, clock skew, and the server-provided page title are mutated
//! only from snapshot-handling code and read everywhere; the single-threaded
//! event loop makes that safe without locking.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

/// Session-level state: connectivity indicator, server clock skew, and the
/// title of the currently subscribed topic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Page title delivered with the last genuine first snapshot.
    pub title: String,
    /// `serverTime − localTime` in seconds; last snapshot wins. All
    /// progress and duration math uses this to read the server clock.
    pub clock_skew: i64,
    /// False while a channel is waiting to reconnect; true again once the
    /// next snapshot arrives.
    pub connected: bool,
}

impl SessionState {
    /// Fold a genuine first snapshot's metadata into the session.
    pub fn apply_snapshot_meta(&mut self, time: Option<i64>, title: Option<String>, local_now: i64) {
        if let Some(server_time) = time {
            self.clock_skew = server_time - local_now;
        }
        if let Some(title) = title {
            self.title = title;
        }
        self.connected = true;
    }

    /// The server's current time in unix seconds, given the local clock.
    #[must_use]
    pub fn server_now(&self, local_now: i64) -> i64 {
        local_now + self.clock_skew
    }
}
