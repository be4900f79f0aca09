//! The canonical event payload and the outbound chat message.
//!
//! An [`EventPayload`] is the stable intermediate representation of one
//! issue event. It is built exactly once per triggering event and shared
//! (read-only) across all target deliveries for that event. Snapshots are
//! fully owned projections: mutating the host's domain objects after
//! snapshot time cannot affect a payload already built.

use serde::{Deserialize, Serialize};

use super::ids::IssueId;

/// What happened to the issue.
///
/// Kept consistent with journal presence by construction: the payload
/// builder sets `Updated` exactly when it attaches a journal snapshot.
/// The formatter nonetheless derives new-vs-update solely from journal
/// presence, so the two signals can never diverge in the outward message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    /// The issue was created.
    Opened,
    /// The issue was updated (edit, bulk edit, or commit-linked update).
    Updated,
}

/// A person's name as the host records it.
///
/// Either part may be missing; rendering treats a missing part as an empty
/// string rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

impl PersonName {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        PersonName {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }

    /// Renders `"<firstname> <lastname>"`, dropping whichever part is empty.
    pub fn full_name(&self) -> String {
        match (self.firstname.is_empty(), self.lastname.is_empty()) {
            (false, false) => format!("{} {}", self.firstname, self.lastname),
            (false, true) => self.firstname.clone(),
            (true, false) => self.lastname.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Flattened, owned projection of an issue at event time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// The issue number.
    pub id: IssueId,

    /// The issue subject line.
    pub subject: String,

    /// The status name (e.g. "New", "Resolved"), already resolved from
    /// the status id via the data layer.
    pub status: String,

    /// The tracker name (e.g. "Bug", "Feature").
    pub tracker: String,

    /// The project name.
    pub project: String,

    /// The issue's original author.
    pub author: PersonName,
}

/// Snapshot of a single journal entry (one update to an issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSnapshot {
    /// The update's notes text. May be empty.
    pub notes: String,

    /// The editing author, when the journal carries one distinct from the
    /// issue's author. `None` means the message credits the issue author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PersonName>,
}

/// The canonical structured payload for one issue event.
///
/// Invariant: `journal.is_some()` exactly when `action == Updated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// What happened.
    pub action: EventAction,

    /// The issue as of event time.
    pub issue: IssueSnapshot,

    /// The journal entry, present only for update-class events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<JournalSnapshot>,

    /// Canonical URL of the issue, or the fixed placeholder when the
    /// triggering context could not provide one.
    pub url: String,
}

/// The only wire format sent outward: `{"text": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The formatted message body.
    pub text: String,
}
