//! Networking modules for the websocket push protocol.
//!
//! SYSTEM CONTEXT
//! ==============
//! `channel` manages websocket lifecycles and dispatch, `topic` derives
//! channel addresses from navigable paths, and `types` defines the shared
//! wire schema.

pub mod channel;
pub mod topic;
pub mod types;
