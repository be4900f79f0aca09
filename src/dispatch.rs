//! Event dispatch: resolve targets, build once, format once, deliver to
//! each target independently.
//!
//! Each dispatch is a one-shot, stateless transaction. Nothing is
//! persisted and no retry state is carried forward. The dispatcher never
//! surfaces an error to its caller: payload build failures and per-target
//! delivery failures are logged and summarized in the returned
//! [`DispatchOutcome`], so a failed webhook can never fail or roll back
//! the host action that triggered it.

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::delivery::Deliverer;
use crate::message;
use crate::payload::EventPayloadBuilder;
use crate::status::StatusDirectory;
use crate::targets::{TargetResolver, TargetStore};
use crate::types::{Issue, Journal, ProjectId};

/// One triggering event, borrowed from the host trigger for the duration
/// of the dispatch.
#[derive(Debug, Clone)]
pub enum IssueEvent<'a> {
    /// An issue was created.
    Created {
        issue: &'a Issue,
        /// Canonical URL of the new issue.
        url: &'a str,
    },
    /// An issue was updated. `url` is `None` when the trigger had no
    /// serving context (commit scans); the builder substitutes its
    /// placeholder.
    Updated {
        issue: &'a Issue,
        journal: &'a Journal,
        url: Option<&'a str>,
    },
}

impl IssueEvent<'_> {
    fn project(&self) -> ProjectId {
        match self {
            IssueEvent::Created { issue, .. } | IssueEvent::Updated { issue, .. } => {
                issue.project.id
            }
        }
    }
}

/// Summary of one dispatch, for logging and tests. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No targets configured for the project or globally. Nothing was
    /// built and no network calls were made.
    NoTargets,

    /// The payload could not be built; the event was abandoned before any
    /// delivery.
    Abandoned,

    /// Delivery was attempted to every resolved target.
    Completed { delivered: usize, failed: usize },
}

/// Orchestrates the notification pipeline for one event at a time.
pub struct Dispatcher<S, C, D> {
    resolver: TargetResolver<S>,
    builder: EventPayloadBuilder<C>,
    deliverer: D,
}

impl<S, C, D> Dispatcher<S, C, D>
where
    S: TargetStore,
    C: StatusDirectory,
    D: Deliverer,
{
    pub fn new(
        resolver: TargetResolver<S>,
        builder: EventPayloadBuilder<C>,
        deliverer: D,
    ) -> Self {
        Dispatcher {
            resolver,
            builder,
            deliverer,
        }
    }

    /// Dispatches one event to all matching targets.
    ///
    /// Targets are resolved first so unconfigured projects cost nothing:
    /// no payload build, no formatting, no network. The payload and
    /// message are built once and shared read-only across all deliveries,
    /// which run concurrently with no ordering guarantee. A failing
    /// target never blocks its siblings.
    pub async fn dispatch(&self, event: IssueEvent<'_>) -> DispatchOutcome {
        let targets = self.resolver.resolve(event.project());
        if targets.is_empty() {
            return DispatchOutcome::NoTargets;
        }

        let payload = match &event {
            IssueEvent::Created { issue, url } => self.builder.build_for_create(issue, *url),
            IssueEvent::Updated {
                issue,
                journal,
                url,
            } => self.builder.build_for_update(issue, journal, *url),
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to build event payload, abandoning dispatch");
                return DispatchOutcome::Abandoned;
            }
        };

        let chat_message = message::format(&payload);

        let attempts = targets.iter().map(|target| {
            let delivery = self.deliverer.deliver(&target.url, &chat_message);
            async move { (target, delivery.await) }
        });

        let mut delivered = 0;
        let mut failed = 0;
        for (target, result) in join_all(attempts).await {
            match result {
                Ok(()) => {
                    debug!(target = %target.url, "webhook delivered");
                    delivered += 1;
                }
                Err(e) => {
                    warn!(target = %target.url, error = %e, "webhook delivery failed");
                    failed += 1;
                }
            }
        }

        info!(
            project = %event.project(),
            delivered,
            failed,
            "dispatch complete"
        );
        DispatchOutcome::Completed { delivered, failed }
    }
}
