//! Canonical event payload construction.
//!
//! The builder turns a host trigger (issue + optional journal + optional
//! canonical URL) into one immutable [`EventPayload`]. Everything is
//! snapshotted eagerly: the payload stays valid even if the host mutates
//! the underlying issue afterwards.
//!
//! Authorship precedence is load-bearing here: when a journal carries its
//! own author (the person who made the edit), that author is credited in
//! the outward message instead of the issue's original author.

use thiserror::Error;
use tracing::instrument;

use crate::status::StatusDirectory;
use crate::types::{
    EventAction, EventPayload, Issue, IssueSnapshot, Journal, JournalSnapshot, StatusId,
};

/// Substituted for the canonical URL when the trigger has no serving
/// context (e.g. a background commit scan).
pub const MISSING_URL_PLACEHOLDER: &str = "not yet implemented";

/// Errors that can occur while building a payload.
///
/// A build failure abandons the whole dispatch for the triggering event;
/// there is never a partial delivery of a half-built payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The issue references a status id the data layer doesn't know.
    #[error("unknown status id: {0}")]
    UnknownStatus(StatusId),
}

/// Builds canonical payloads, resolving status names through the data
/// layer's [`StatusDirectory`] capability.
pub struct EventPayloadBuilder<C> {
    statuses: C,
}

impl<C: StatusDirectory> EventPayloadBuilder<C> {
    pub fn new(statuses: C) -> Self {
        EventPayloadBuilder { statuses }
    }

    /// Builds the payload for an issue-created event.
    #[instrument(skip(self, issue), fields(issue = %issue.id))]
    pub fn build_for_create(
        &self,
        issue: &Issue,
        url: impl Into<String> + std::fmt::Debug,
    ) -> Result<EventPayload, PayloadError> {
        Ok(EventPayload {
            action: EventAction::Opened,
            issue: self.snapshot_issue(issue)?,
            journal: None,
            url: url.into(),
        })
    }

    /// Builds the payload for an update-class event (edit, bulk edit, or
    /// commit-linked update).
    ///
    /// `url` is `None` for triggers with no serving context; the payload
    /// still has to be deliverable, so the fixed placeholder is
    /// substituted rather than failing.
    #[instrument(skip(self, issue, journal), fields(issue = %issue.id))]
    pub fn build_for_update(
        &self,
        issue: &Issue,
        journal: &Journal,
        url: Option<&str>,
    ) -> Result<EventPayload, PayloadError> {
        Ok(EventPayload {
            action: EventAction::Updated,
            issue: self.snapshot_issue(issue)?,
            journal: Some(snapshot_journal(journal)),
            url: url.unwrap_or(MISSING_URL_PLACEHOLDER).to_string(),
        })
    }

    fn snapshot_issue(&self, issue: &Issue) -> Result<IssueSnapshot, PayloadError> {
        let status = self
            .statuses
            .status_name(issue.status_id)
            .ok_or(PayloadError::UnknownStatus(issue.status_id))?;

        Ok(IssueSnapshot {
            id: issue.id,
            subject: issue.subject.clone(),
            status,
            tracker: issue.tracker_name.clone(),
            project: issue.project.name.clone(),
            author: issue.author.clone(),
        })
    }
}

/// Snapshots a journal, keeping its author only when one is actually
/// recorded with a first name. An authorless journal snapshot makes the
/// formatter credit the issue author instead.
fn snapshot_journal(journal: &Journal) -> JournalSnapshot {
    JournalSnapshot {
        notes: journal.notes.clone(),
        author: journal
            .author
            .clone()
            .filter(|author| !author.firstname.is_empty()),
    }
}
