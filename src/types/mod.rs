//! Core domain types for the relay.
//!
//! This module contains all the fundamental types used throughout the
//! application, designed to encode invariants via the type system.

pub mod event;
pub mod host;
pub mod ids;

// Re-export commonly used types at the module level
pub use event::{
    ChatMessage, EventAction, EventPayload, IssueSnapshot, JournalSnapshot, PersonName,
};
pub use host::{Issue, Journal, ProjectRef};
pub use ids::{IssueId, ProjectId, StatusId, TargetId};
