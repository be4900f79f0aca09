//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID types (e.g., using a
//! StatusId where a ProjectId is expected) and make the code more
//! self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Redmine project identifier.
///
/// `ProjectId::GLOBAL` (0) is reserved: webhook targets registered under it
/// act as the fallback set for projects with no targets of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl ProjectId {
    /// The reserved key for global fallback webhook targets.
    pub const GLOBAL: ProjectId = ProjectId(0);

    /// Returns true if this is the reserved global fallback key.
    pub fn is_global(&self) -> bool {
        *self == Self::GLOBAL
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProjectId {
    fn from(n: u64) -> Self {
        ProjectId(n)
    }
}

/// A Redmine issue number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub u64);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for IssueId {
    fn from(n: u64) -> Self {
        IssueId(n)
    }
}

/// A configured webhook target identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TargetId {
    fn from(n: u64) -> Self {
        TargetId(n)
    }
}

/// A Redmine issue status identifier.
///
/// Status names are resolved through the data layer's
/// [`StatusDirectory`](crate::status::StatusDirectory) capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(pub u64);

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StatusId {
    fn from(n: u64) -> Self {
        StatusId(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_id_global_sentinel() {
        assert!(ProjectId(0).is_global());
        assert!(!ProjectId(1).is_global());
        assert_eq!(ProjectId::GLOBAL, ProjectId(0));
    }

    #[test]
    fn issue_id_displays_with_hash() {
        assert_eq!(IssueId(42).to_string(), "#42");
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&ProjectId(5)).unwrap(), "5");
        assert_eq!(serde_json::from_str::<StatusId>("3").unwrap(), StatusId(3));
    }
}
