//! Sync status resolution
//!
//! Classifies one skill from three inputs: the current content hash of the
//! project copy, the project's lock entry and the library's lock entry.
//! The project entry is the common base, so comparing against it tells
//! which side moved since the two last agreed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LockEntry;

/// Relationship between a project copy and the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    /// Both sides equal the common base
    Synced,
    /// Only the project changed
    Ahead,
    /// Only the library advanced
    Behind,
    /// Both changed
    Diverged,
    /// Present in the project but not linked to a library entry
    LocalOnly,
    /// Present in the library but not in the project
    LibraryOnly,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Ahead => "ahead",
            SyncStatus::Behind => "behind",
            SyncStatus::Diverged => "diverged",
            SyncStatus::LocalOnly => "local-only",
            SyncStatus::LibraryOnly => "library-only",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the status of one skill.
///
/// `project_hash` is `None` when the project has no copy. Pure; never
/// touches the filesystem.
pub fn resolve_status(
    project_hash: Option<&str>,
    project_entry: Option<&LockEntry>,
    library_entry: Option<&LockEntry>,
) -> SyncStatus {
    let Some(project_hash) = project_hash else {
        return if library_entry.is_some() {
            SyncStatus::LibraryOnly
        } else {
            SyncStatus::LocalOnly
        };
    };
    let (Some(base), Some(library)) = (project_entry, library_entry) else {
        return SyncStatus::LocalOnly;
    };

    let project_changed = project_hash != base.hash;
    let library_advanced = library.version != base.version || library.hash != base.hash;

    match (project_changed, library_advanced) {
        (true, true) => SyncStatus::Diverged,
        (true, false) => SyncStatus::Ahead,
        (false, true) => SyncStatus::Behind,
        (false, false) => SyncStatus::Synced,
    }
}
