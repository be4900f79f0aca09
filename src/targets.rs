//! Webhook targets and the project-to-targets resolution rule.
//!
//! Target configuration is owned by external administration; the relay
//! only reads it through the [`TargetStore`] trait. [`TargetResolver`]
//! applies the one piece of logic on top of the store: per-project lookup
//! with a global fallback set registered under [`ProjectId::GLOBAL`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ProjectId, TargetId};

/// One configured delivery destination.
///
/// `project_id == ProjectId::GLOBAL` marks a global fallback target,
/// matched when a project has no targets of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTarget {
    pub id: TargetId,
    pub project_id: ProjectId,
    pub url: String,
}

/// Read access to the externally managed target configuration.
///
/// Implementations must be safe to query concurrently for different
/// projects; the relay never writes through this interface.
pub trait TargetStore {
    /// Returns the targets registered for exactly this project id, in
    /// configuration order. No fallback logic here - that belongs to
    /// [`TargetResolver`].
    fn targets_for_project(&self, project: ProjectId) -> Vec<WebhookTarget>;
}

/// A store over a fixed target list, loaded from the relay config at
/// startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTargetStore {
    targets: Vec<WebhookTarget>,
}

impl InMemoryTargetStore {
    pub fn new(targets: Vec<WebhookTarget>) -> Self {
        InMemoryTargetStore { targets }
    }
}

impl TargetStore for InMemoryTargetStore {
    fn targets_for_project(&self, project: ProjectId) -> Vec<WebhookTarget> {
        self.targets
            .iter()
            .filter(|t| t.project_id == project)
            .cloned()
            .collect()
    }
}

/// Resolves which targets receive an event for a given project.
pub struct TargetResolver<S> {
    store: S,
}

impl<S: TargetStore> TargetResolver<S> {
    pub fn new(store: S) -> Self {
        TargetResolver { store }
    }

    /// Returns the targets to notify for `project`, in configuration order.
    ///
    /// The project-specific set wins when non-empty; otherwise the global
    /// fallback set is used. An empty result means "nothing to do", never
    /// an error.
    pub fn resolve(&self, project: ProjectId) -> Vec<WebhookTarget> {
        let specific = self.store.targets_for_project(project);
        if !specific.is_empty() {
            return specific;
        }

        let global = self.store.targets_for_project(ProjectId::GLOBAL);
        if global.is_empty() {
            debug!(project = %project, "no webhook targets configured");
        }
        global
    }
}
