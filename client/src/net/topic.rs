//! Topic keys for per-view push channels.
//!
//! A topic is the opaque key a channel subscribes to, derived from the
//! navigable path: the aggregate dashboard, the job list, one job, or one
//! run. Two topics are interchangeable exactly when their keys are equal.

#[cfg(test)]
#[path = "topic_test.rs"]
mod topic_test;

use std::fmt;

/// Key identifying which server-side resource a channel subscribes to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// The aggregate dashboard.
    #[must_use]
    pub fn dashboard() -> Self {
        Self("/".to_owned())
    }

    /// The job list.
    #[must_use]
    pub fn jobs() -> Self {
        Self("/jobs".to_owned())
    }

    /// One job's run table.
    #[must_use]
    pub fn job(name: &str) -> Self {
        Self(format!("/jobs/{name}"))
    }

    /// One run of one job.
    #[must_use]
    pub fn run(name: &str, number: i64) -> Self {
        Self(format!("/jobs/{name}/{number}"))
    }

    /// The sibling log stream of this topic. Only meaningful for run topics;
    /// the server rejects log subscriptions elsewhere.
    #[must_use]
    pub fn log(&self) -> Self {
        Self(format!("{}/log", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the websocket URL for a topic given the page's scheme and host.
#[must_use]
pub fn ws_url(secure: bool, host: &str, topic: &Topic) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    format!("{scheme}://{host}{topic}")
}

/// Websocket URL for a topic derived from the current window location.
#[cfg(feature = "hydrate")]
#[must_use]
pub fn ws_url_from_location(topic: &Topic) -> String {
    let window = web_sys::window();
    let secure = window
        .as_ref()
        .and_then(|w| w.location().protocol().ok())
        .is_some_and(|p| p == "https:");
    let host = window
        .and_then(|w| w.location().host().ok())
        .unwrap_or_else(|| "localhost:8080".to_owned());
    ws_url(secure, &host, topic)
}
