//! Lock store
//!
//! Every root carries a `skills.lock.json` recording, per skill, the version
//! and content hash of the last state both roots agreed on. Reads are
//! tolerant: a lock file that is missing, truncated or partially malformed
//! is read as much as possible rather than refused, since a later write
//! repairs it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use skill_fs::ConfigStore;
use skill_harness::{Harness, LinkMode};

use crate::Result;

/// Lock file format version written by this crate
pub const SCHEMA_VERSION: u32 = 1;

/// One skill's record in a root's lock file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockEntry {
    /// Monotonic version, 1 for the first push
    pub version: u64,
    /// Content hash (`sha256:<hex>`) of the skill directory
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LockEntry {
    /// A new entry stamped with the current time.
    pub fn new(version: u64, hash: impl Into<String>) -> Self {
        Self {
            version,
            hash: hash.into(),
            updated_at: Some(Utc::now().trunc_subsecs(0)),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let version = object.get("version")?.as_u64().filter(|v| *v >= 1)?;
        let hash = object.get("hash")?.as_str()?.to_string();
        let updated_at = object
            .get("updatedAt")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));
        Some(Self {
            version,
            hash,
            updated_at,
        })
    }
}

/// The lock file of one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockFile {
    pub schema_version: u32,
    pub skills: BTreeMap<String, LockEntry>,
    /// Harnesses registered for this project, in registration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harnesses: Option<Vec<Harness>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harness_modes: Option<BTreeMap<Harness, LinkMode>>,
}

impl Default for LockFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            skills: BTreeMap::new(),
            harnesses: None,
            harness_modes: None,
        }
    }
}

impl LockFile {
    /// Read a lock file.
    ///
    /// An absent file reads as an empty lock. Unparseable JSON is logged and
    /// also read as empty. Malformed entries and unknown harness ids are
    /// dropped individually.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(skill_fs::Error::io(path, e).into()),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(value) => Ok(Self::from_value(&value)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable lock file, treating as empty");
                Ok(Self::default())
            }
        }
    }

    /// Write the lock file atomically, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        let normalized = Self {
            schema_version: SCHEMA_VERSION,
            ..self.clone()
        };
        ConfigStore::new().save(path, &normalized)?;
        tracing::debug!(path = %path.display(), skills = self.skills.len(), "wrote lock file");
        Ok(())
    }

    fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            tracing::warn!("lock file is not a JSON object, treating as empty");
            return Self::default();
        };

        let mut lock = Self::default();

        if let Some(skills) = object.get("skills").and_then(Value::as_object) {
            for (id, raw) in skills {
                match LockEntry::from_value(raw) {
                    Some(entry) => {
                        lock.skills.insert(id.clone(), entry);
                    }
                    None => tracing::warn!(skill = %id, "dropping malformed lock entry"),
                }
            }
        }

        if let Some(list) = object.get("harnesses").and_then(Value::as_array) {
            let mut harnesses = Vec::new();
            for harness in list.iter().filter_map(parse_harness) {
                if !harnesses.contains(&harness) {
                    harnesses.push(harness);
                }
            }
            lock.harnesses = Some(harnesses);
        }

        if let Some(modes) = object.get("harnessModes").and_then(Value::as_object) {
            lock.harness_modes = Some(parse_modes(modes));
        }

        lock
    }

    pub fn entry(&self, id: &str) -> Option<&LockEntry> {
        self.skills.get(id)
    }

    /// Replace the entry for `id` wholesale.
    pub fn set_entry(mut self, id: &str, entry: LockEntry) -> Self {
        self.skills.insert(id.to_string(), entry);
        self
    }

    pub fn remove_entry(mut self, id: &str) -> Self {
        self.skills.remove(id);
        self
    }

    /// Registered harnesses, empty when none are recorded.
    pub fn harnesses(&self) -> &[Harness] {
        self.harnesses.as_deref().unwrap_or(&[])
    }

    pub fn harness_mode(&self, harness: Harness) -> Option<LinkMode> {
        self.harness_modes
            .as_ref()
            .and_then(|modes| modes.get(&harness).copied())
    }

    /// Record `harness` with its link mode.
    pub fn enable_harness(mut self, harness: Harness, mode: LinkMode) -> Self {
        let harnesses = self.harnesses.get_or_insert_with(Vec::new);
        if !harnesses.contains(&harness) {
            harnesses.push(harness);
        }
        self.harness_modes
            .get_or_insert_with(BTreeMap::new)
            .insert(harness, mode);
        self
    }

    /// Drop the registration of `harness`.
    pub fn disable_harness(mut self, harness: Harness) -> Self {
        if let Some(harnesses) = self.harnesses.as_mut() {
            harnesses.retain(|h| *h != harness);
            if harnesses.is_empty() {
                self.harnesses = None;
            }
        }
        if let Some(modes) = self.harness_modes.as_mut() {
            modes.remove(&harness);
            if modes.is_empty() {
                self.harness_modes = None;
            }
        }
        self
    }
}

fn parse_harness(value: &Value) -> Option<Harness> {
    let name = value.as_str()?;
    match name.parse() {
        Ok(harness) => Some(harness),
        Err(_) => {
            tracing::warn!(harness = %name, "dropping unknown harness from lock file");
            None
        }
    }
}

fn parse_modes(modes: &Map<String, Value>) -> BTreeMap<Harness, LinkMode> {
    modes
        .iter()
        .filter_map(|(name, mode)| {
            let harness = name.parse().ok()?;
            let mode = mode.as_str()?.parse().ok()?;
            Some((harness, mode))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entry(version: u64, hash: &str) -> LockEntry {
        LockEntry {
            version,
            hash: hash.to_string(),
            updated_at: None,
        }
    }

    #[test]
    fn absent_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let lock = LockFile::read(&temp.path().join("skills.lock.json")).unwrap();
        assert_eq!(lock, LockFile::default());
    }

    #[test]
    fn truncated_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skills.lock.json");
        fs::write(&path, r#"{"schemaVersion": 1, "skills": {"alpha": {"vers"#).unwrap();

        assert_eq!(LockFile::read(&path).unwrap(), LockFile::default());
    }

    #[test]
    fn malformed_entries_and_unknown_harnesses_are_dropped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skills.lock.json");
        fs::write(
            &path,
            r#"{
                "schemaVersion": 7,
                "skills": {
                    "alpha": {"version": 2, "hash": "sha256:aa", "updatedAt": "2024-05-01T10:00:00Z"},
                    "zero": {"version": 0, "hash": "sha256:bb"},
                    "nohash": {"version": 3},
                    "badhash": {"version": 3, "hash": 12}
                },
                "harnesses": ["cursor", "vim", "cursor", "claude-code"],
                "harnessModes": {"cursor": "copy", "vim": "copy", "claude-code": "hardlink"}
            }"#,
        )
        .unwrap();

        let lock = LockFile::read(&path).unwrap();

        assert_eq!(lock.schema_version, SCHEMA_VERSION);
        assert_eq!(lock.skills.keys().collect::<Vec<_>>(), vec!["alpha"]);
        assert_eq!(lock.entry("alpha").unwrap().version, 2);
        assert!(lock.entry("alpha").unwrap().updated_at.is_some());
        assert_eq!(lock.harnesses(), &[Harness::Cursor, Harness::ClaudeCode]);
        assert_eq!(lock.harness_mode(Harness::Cursor), Some(LinkMode::Copy));
        assert_eq!(lock.harness_mode(Harness::ClaudeCode), None);
    }

    #[test]
    fn non_object_fields_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skills.lock.json");
        fs::write(&path, r#"{"skills": [1, 2], "harnesses": "cursor"}"#).unwrap();

        let lock = LockFile::read(&path).unwrap();
        assert!(lock.skills.is_empty());
        assert!(lock.harnesses.is_none());
    }

    #[test]
    fn write_then_read_keeps_entries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/skills.lock.json");
        let lock = LockFile::default()
            .set_entry("beta", LockEntry::new(3, "sha256:bb"))
            .set_entry("alpha", entry(1, "sha256:aa"))
            .enable_harness(Harness::Cursor, LinkMode::Copy);

        lock.write(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        assert!(text.contains("\"schemaVersion\": 1"));
        assert!(text.find("\"alpha\"").unwrap() < text.find("\"beta\"").unwrap());
        assert_eq!(LockFile::read(&path).unwrap(), lock);
    }

    #[test]
    fn absent_optional_fields_are_not_written() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("skills.lock.json");
        LockFile::default()
            .set_entry("alpha", entry(1, "sha256:aa"))
            .write(&path)
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("harnesses"));
        assert!(!text.contains("updatedAt"));
    }

    #[test]
    fn set_entry_replaces_wholesale() {
        let lock = LockFile::default()
            .set_entry("alpha", LockEntry::new(1, "sha256:aa"))
            .set_entry("alpha", entry(2, "sha256:bb"));

        assert_eq!(lock.entry("alpha"), Some(&entry(2, "sha256:bb")));
        assert!(lock.remove_entry("alpha").skills.is_empty());
    }

    #[test]
    fn harness_registration_round_trip() {
        let lock = LockFile::default()
            .enable_harness(Harness::ClaudeCode, LinkMode::Symlink)
            .enable_harness(Harness::Cursor, LinkMode::Copy)
            .enable_harness(Harness::ClaudeCode, LinkMode::Copy);

        assert_eq!(lock.harnesses(), &[Harness::ClaudeCode, Harness::Cursor]);
        assert_eq!(lock.harness_mode(Harness::ClaudeCode), Some(LinkMode::Copy));

        let lock = lock
            .disable_harness(Harness::ClaudeCode)
            .disable_harness(Harness::Cursor);
        assert!(lock.harnesses.is_none());
        assert!(lock.harness_modes.is_none());
    }
}
