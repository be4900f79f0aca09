//! Chat message formatting.
//!
//! Turns a canonical [`EventPayload`] into the single text body sent to
//! every target. Formatting is deterministic: the same payload always
//! yields byte-identical text.
//!
//! New-vs-update is derived solely from journal presence, never from the
//! payload's `action` field, so the header, verb, and credited author can
//! never disagree with the journal data actually shown.

use crate::types::{ChatMessage, EventPayload};

/// Formats a payload into the outward chat message.
///
/// Layout, one element per line, joined with newlines (the subject,
/// author, and notes lines each end with their own `\n`, producing a
/// blank line after them):
///
/// ```text
/// 📌 Redmine New
/// Subject: [Web - Bug #42] (New) Login broken
///
/// Issue #42 was created by Alice Smith.
///
/// URL: https://host/issues/42
/// ```
///
/// When a journal is present but its notes are empty, the notes line is
/// omitted entirely - no blank placeholder.
pub fn format(payload: &EventPayload) -> ChatMessage {
    let issue = &payload.issue;
    let journal = payload.journal.as_ref();

    let author = journal
        .and_then(|j| j.author.as_ref())
        .unwrap_or(&issue.author);

    let subject_line = format!(
        "[{} - {} {}] ({}) {}",
        issue.project, issue.tracker, issue.id, issue.status, issue.subject
    );

    let mut lines = Vec::with_capacity(5);
    lines.push(format!(
        "📌 Redmine {}",
        if journal.is_some() { "Update" } else { "New" }
    ));
    lines.push(format!("Subject: {}\n", subject_line));
    lines.push(format!(
        "Issue {} was {} by {}.\n",
        issue.id,
        if journal.is_some() { "updated" } else { "created" },
        author.full_name()
    ));

    if let Some(journal) = journal {
        if !journal.notes.is_empty() {
            lines.push(format!("{}\n", journal.notes));
        }
    }

    lines.push(format!("URL: {}", payload.url));

    ChatMessage {
        text: lines.join("\n"),
    }
}
