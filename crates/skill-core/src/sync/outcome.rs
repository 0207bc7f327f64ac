//! Result types for SyncEngine operations

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LockEntry, SyncStatus};

/// What a successful operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Installed,
    Updated,
    Pushed,
    Resolved,
    Unchanged,
    Uninstalled,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Installed => "installed",
            SyncAction::Updated => "updated",
            SyncAction::Pushed => "pushed",
            SyncAction::Resolved => "resolved",
            SyncAction::Unchanged => "unchanged",
            SyncAction::Uninstalled => "uninstalled",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report from a mutating operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub id: String,
    pub action: SyncAction,
    /// The project lock entry after the operation; for uninstall, the entry
    /// that was removed
    pub entry: Option<LockEntry>,
}

impl SyncOutcome {
    pub(crate) fn new(id: &str, action: SyncAction, entry: Option<LockEntry>) -> Self {
        Self {
            id: id.to_string(),
            action,
            entry,
        }
    }
}

/// Status of one skill together with the inputs it was resolved from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStatus {
    pub id: String,
    pub status: SyncStatus,
    pub project_hash: Option<String>,
    pub project_entry: Option<LockEntry>,
    pub library_entry: Option<LockEntry>,
}

/// Which side wins in `resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveStrategy {
    /// Discard project changes and adopt the library state
    Library,
    /// Publish the project state as the next library version
    Project,
    /// Content merge; not supported
    Merge,
}

impl ResolveStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveStrategy::Library => "library",
            ResolveStrategy::Project => "project",
            ResolveStrategy::Merge => "merge",
        }
    }
}

impl fmt::Display for ResolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
