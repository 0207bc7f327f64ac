//! Reports returned by harness operations

use serde::{Deserialize, Serialize};

use crate::{Harness, LinkMode};

/// State of one skill's harness binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingState {
    /// Link resolves to the canonical skill, or the copy hashes equal
    #[serde(rename = "harness-synced")]
    Synced,
    /// Link points elsewhere, or the copy's content differs
    #[serde(rename = "harness-drifted")]
    Drifted,
    /// Nothing at the harness path
    #[serde(rename = "missing")]
    Missing,
    /// A regular file or directory occupies the path in symlink mode
    #[serde(rename = "conflict")]
    Conflict,
}

impl BindingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingState::Synced => "harness-synced",
            BindingState::Drifted => "harness-drifted",
            BindingState::Missing => "missing",
            BindingState::Conflict => "conflict",
        }
    }
}

/// One skill's binding, as found before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingReport {
    pub skill: String,
    pub state: BindingState,
    /// Whether the operation wrote this entry
    pub written: bool,
}

/// Aggregate result of `sync` or `status` for one harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarnessReport {
    pub harness: Harness,
    /// Mode actually used; `copy` after a symlink fallback
    pub mode: LinkMode,
    pub total: usize,
    pub synced: usize,
    pub drifted: usize,
    pub missing: usize,
    pub conflicts: usize,
    pub fallback_to_copy: bool,
    pub entries: Vec<BindingReport>,
}

impl HarnessReport {
    pub fn new(harness: Harness, mode: LinkMode) -> Self {
        Self {
            harness,
            mode,
            total: 0,
            synced: 0,
            drifted: 0,
            missing: 0,
            conflicts: 0,
            fallback_to_copy: false,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, skill: &str, state: BindingState, written: bool) {
        self.total += 1;
        match state {
            BindingState::Synced => self.synced += 1,
            BindingState::Drifted => self.drifted += 1,
            BindingState::Missing => self.missing += 1,
            BindingState::Conflict => self.conflicts += 1,
        }
        self.entries.push(BindingReport {
            skill: skill.to_string(),
            state,
            written,
        });
    }

    /// Number of entries the operation wrote.
    pub fn written(&self) -> usize {
        self.entries.iter().filter(|e| e.written).count()
    }

    /// Skills reported as conflicts.
    pub fn conflicting(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.state == BindingState::Conflict)
            .map(|e| e.skill.as_str())
    }
}

/// Result of importing a harness back into the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarnessImportReport {
    pub harness: Harness,
    /// Skill ids copied into the canonical location
    pub imported: Vec<String>,
    /// Harness entry names that were not importable
    pub skipped: Vec<String>,
    /// Imported entries replaced by a link to the canonical location
    pub relinked: usize,
    pub fallback_to_copy: bool,
}

impl HarnessImportReport {
    pub fn empty(harness: Harness) -> Self {
        Self {
            harness,
            imported: Vec::new(),
            skipped: Vec::new(),
            relinked: 0,
            fallback_to_copy: false,
        }
    }
}
