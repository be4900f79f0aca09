//! Host-side trigger surface.
//!
//! The host's issue tracker fires four hooks: issue created, issue
//! updated, bulk update, and commit-linked update. Each listener method
//! is one of those call sites; it applies the cooperative skip gate and
//! then hands exactly one event to the [`Dispatcher`].
//!
//! The skip gate exists to break re-notification loops: a system reacting
//! to one of our webhooks can replay an action against the host with the
//! `X-Skip-Webhooks` header set, and the replayed action stays silent. An
//! absent request context is treated the same way for the three
//! controller-driven hooks. The commit-scan hook has no request by nature
//! and is never gated.

use std::collections::HashMap;

use tracing::debug;

use crate::delivery::Deliverer;
use crate::dispatch::{DispatchOutcome, Dispatcher, IssueEvent};
use crate::status::StatusDirectory;
use crate::targets::TargetStore;
use crate::types::{Issue, Journal};

/// Request header that suppresses webhook dispatch (any value).
pub const SKIP_HEADER: &str = "x-skip-webhooks";

/// The parts of the triggering request the listener cares about.
///
/// Header names are normalized to lowercase at construction.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    headers: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(headers: HashMap<String, String>) -> Self {
        RequestContext {
            headers: headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
        }
    }

    /// True if the request carries the skip marker, with any value.
    pub fn has_skip_marker(&self) -> bool {
        self.headers.contains_key(SKIP_HEADER)
    }
}

/// What happened to a triggered hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The event was suppressed by the skip gate. Nothing was resolved,
    /// built, or delivered.
    Skipped,

    /// The event went through the dispatcher.
    Dispatched(DispatchOutcome),
}

/// Listens for host issue events and forwards them to the dispatcher.
pub struct HookListener<S, C, D> {
    dispatcher: Dispatcher<S, C, D>,
}

impl<S, C, D> HookListener<S, C, D>
where
    S: TargetStore,
    C: StatusDirectory,
    D: Deliverer,
{
    pub fn new(dispatcher: Dispatcher<S, C, D>) -> Self {
        HookListener { dispatcher }
    }

    /// Call site: an issue was created through the host's controller.
    pub async fn issue_created(
        &self,
        ctx: Option<&RequestContext>,
        issue: &Issue,
        url: &str,
    ) -> HookOutcome {
        if skip_webhooks(ctx) {
            debug!(issue = %issue.id, "skipping webhooks for created issue");
            return HookOutcome::Skipped;
        }

        HookOutcome::Dispatched(self.dispatcher.dispatch(IssueEvent::Created { issue, url }).await)
    }

    /// Call site: an issue was edited through the host's controller.
    pub async fn issue_updated(
        &self,
        ctx: Option<&RequestContext>,
        issue: &Issue,
        journal: &Journal,
        url: Option<&str>,
    ) -> HookOutcome {
        if skip_webhooks(ctx) {
            debug!(issue = %issue.id, "skipping webhooks for updated issue");
            return HookOutcome::Skipped;
        }

        HookOutcome::Dispatched(
            self.dispatcher
                .dispatch(IssueEvent::Updated {
                    issue,
                    journal,
                    url,
                })
                .await,
        )
    }

    /// Call site: one issue out of a bulk edit. The host fires this once
    /// per affected issue; each fires its own dispatch.
    pub async fn issues_bulk_updated(
        &self,
        ctx: Option<&RequestContext>,
        issue: &Issue,
        journal: &Journal,
        url: Option<&str>,
    ) -> HookOutcome {
        self.issue_updated(ctx, issue, journal, url).await
    }

    /// Call site: a commit message referenced the issue and the
    /// background changeset scan updated it. There is no serving request
    /// here, so there is no skip gate and no canonical URL - the payload
    /// builder substitutes its placeholder.
    pub async fn commit_referenced(&self, issue: &Issue, journal: &Journal) -> HookOutcome {
        HookOutcome::Dispatched(
            self.dispatcher
                .dispatch(IssueEvent::Updated {
                    issue,
                    journal,
                    url: None,
                })
                .await,
        )
    }
}

/// The pre-dispatch gate: suppress when there is no triggering request,
/// or when it explicitly asks to be skipped.
fn skip_webhooks(ctx: Option<&RequestContext>) -> bool {
    match ctx {
        None => true,
        Some(ctx) => ctx.has_skip_marker(),
    }
}
