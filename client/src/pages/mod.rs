//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns the binding between its route and its push channel(s):
//! opened on enter, re-created on in-place navigation to a different topic,
//! closed on leave. Rendering is deliberately plain — the protocol layer is
//! the point.

pub mod dashboard;
pub mod job;
pub mod jobs;
pub mod run;
