//! Redmine Relay - forwards issue-tracking events to chat webhook endpoints.
//!
//! This library provides the webhook resolution, payload construction, and
//! delivery pipeline for notifying chat endpoints about Redmine issue events.

pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod hooks;
pub mod message;
pub mod payload;
pub mod server;
pub mod status;
pub mod targets;
pub mod types;
