//! Read-only projections of the host application's domain model.
//!
//! The relay never holds live references into the host's issue tracker.
//! Triggers hand over these narrow, owned projections, and the payload
//! builder turns them into snapshots. Status names are deliberately not
//! part of [`Issue`]: the host supplies a status id and the relay resolves
//! the name through [`StatusDirectory`](crate::status::StatusDirectory).

use serde::{Deserialize, Serialize};

use super::event::PersonName;
use super::ids::{IssueId, ProjectId, StatusId};

/// The project an issue belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: ProjectId,
    pub name: String,
}

/// An issue as supplied by a host trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub subject: String,
    pub project: ProjectRef,
    pub tracker_name: String,
    pub status_id: StatusId,
    pub author: PersonName,
}

/// A single update to an issue, as supplied by a host trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Free-form notes entered with the update. May be empty.
    #[serde(default)]
    pub notes: String,

    /// The person who made the update, when the host records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PersonName>,
}
