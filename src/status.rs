//! Status-name lookup capability.
//!
//! The relay only ever needs one thing from the host's status table: a
//! `status id -> name` lookup. That capability belongs to the data layer,
//! not the core pipeline, so it sits behind the [`StatusDirectory`] trait.
//! [`CachedStatusDirectory`] is the standard implementation: a read-through
//! cache over a [`StatusSource`], built lazily on first lookup and cleared
//! explicitly when status configuration changes.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::StatusId;

/// Resolves a status id to its display name.
pub trait StatusDirectory {
    /// Returns the status name, or `None` if the id is unknown.
    fn status_name(&self, id: StatusId) -> Option<String>;
}

/// Plain maps act as directories; used by tests and small fixtures.
impl StatusDirectory for HashMap<StatusId, String> {
    fn status_name(&self, id: StatusId) -> Option<String> {
        self.get(&id).cloned()
    }
}

/// Supplies the full status table on demand.
///
/// In a deployment this is backed by the host's configuration store; the
/// relay only sees the fetched table.
pub trait StatusSource {
    /// Fetches the complete `id -> name` table.
    fn fetch_all(&self) -> HashMap<StatusId, String>;
}

/// A source over a fixed table, typically loaded from the relay config.
#[derive(Debug, Clone, Default)]
pub struct StaticStatusSource {
    statuses: HashMap<StatusId, String>,
}

impl StaticStatusSource {
    pub fn new(statuses: HashMap<StatusId, String>) -> Self {
        StaticStatusSource { statuses }
    }
}

impl StatusSource for StaticStatusSource {
    fn fetch_all(&self) -> HashMap<StatusId, String> {
        self.statuses.clone()
    }
}

/// Read-through cache over a [`StatusSource`].
///
/// The table is fetched once, on the first lookup after construction or
/// [`invalidate`](CachedStatusDirectory::invalidate). Lookups are safe to
/// call concurrently.
pub struct CachedStatusDirectory<S> {
    source: S,
    cache: RwLock<Option<HashMap<StatusId, String>>>,
}

impl<S: StatusSource> CachedStatusDirectory<S> {
    /// Creates an empty cache over the given source. No fetch happens
    /// until the first lookup.
    pub fn new(source: S) -> Self {
        CachedStatusDirectory {
            source,
            cache: RwLock::new(None),
        }
    }

    /// Clears the cached table. The next lookup refetches from the source.
    pub fn invalidate(&self) {
        *self.cache.write().expect("status cache lock poisoned") = None;
    }
}

impl<S: StatusSource> StatusDirectory for CachedStatusDirectory<S> {
    fn status_name(&self, id: StatusId) -> Option<String> {
        {
            let guard = self.cache.read().expect("status cache lock poisoned");
            if let Some(table) = guard.as_ref() {
                return table.get(&id).cloned();
            }
        }

        let mut guard = self.cache.write().expect("status cache lock poisoned");
        let table = guard.get_or_insert_with(|| self.source.fetch_all());
        table.get(&id).cloned()
    }
}
