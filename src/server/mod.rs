//! HTTP server bridging the host's event hooks to the relay.
//!
//! This module implements the HTTP surface that:
//! - Accepts issue event notifications from the host application
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `POST /hooks/redmine` - Accepts host issue events (returns 202 Accepted)
//! - `GET /health` - Returns 200 if server is running
//!
//! Inbound requests are not authenticated; the endpoint is meant to be
//! reachable only from the host application.

use std::sync::Arc;

pub mod health;
pub mod hook;

pub use health::health_handler;
pub use hook::hook_handler;

use crate::delivery::Deliverer;
use crate::hooks::HookListener;
use crate::status::StatusDirectory;
use crate::targets::TargetStore;

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. It wraps
/// the hook listener, which owns the whole dispatch pipeline.
pub struct AppState<S, C, D> {
    listener: Arc<HookListener<S, C, D>>,
}

// Manual impl: deriving Clone would bound S, C, D themselves.
impl<S, C, D> Clone for AppState<S, C, D> {
    fn clone(&self) -> Self {
        AppState {
            listener: Arc::clone(&self.listener),
        }
    }
}

impl<S, C, D> AppState<S, C, D> {
    pub fn new(listener: HookListener<S, C, D>) -> Self {
        AppState {
            listener: Arc::new(listener),
        }
    }

    /// Returns the hook listener.
    pub fn listener(&self) -> &HookListener<S, C, D> {
        &self.listener
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<S, C, D>(app_state: AppState<S, C, D>) -> axum::Router
where
    S: TargetStore + Send + Sync + 'static,
    C: StatusDirectory + Send + Sync + 'static,
    D: Deliverer + Send + Sync + 'static,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/hooks/redmine", post(hook_handler::<S, C, D>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
