//! Outbound delivery seam.
//!
//! [`Deliverer`] describes a single best-effort delivery attempt without
//! saying how it is performed. The trait-based design enables:
//! - Mock deliverers for testing the dispatcher's failure isolation
//! - The real HTTP deliverer ([`HttpDeliverer`])
//!
//! There is deliberately no retry here: delivery is at-most-once, and a
//! failure is terminal at the point of occurrence.

use std::future::Future;

use thiserror::Error;

use crate::types::ChatMessage;

pub mod http;

pub use http::HttpDeliverer;

/// Errors from a single delivery attempt.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never completed: connect failure, timeout, etc.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The target responded, but not with a 2xx status.
    #[error("target responded with HTTP {0}")]
    Status(u16),

    /// The chat message could not be serialized to the wire format.
    #[error("failed to serialize chat message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Performs one outbound delivery to one target URL.
///
/// Implementations report failure through the `Result`; they must not
/// panic past their own boundary, and must not retry internally.
pub trait Deliverer {
    /// Delivers `message` to `url`.
    fn deliver(
        &self,
        url: &str,
        message: &ChatMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
