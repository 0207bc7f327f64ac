//! The fixed table of supported harnesses.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A supported external tool convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Harness {
    #[serde(rename = "claude-code")]
    ClaudeCode,
    #[serde(rename = "cursor")]
    Cursor,
    #[serde(rename = "opencode")]
    OpenCode,
}

/// How a harness stores one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `<base>/<id>/SKILL.md` plus the rest of the skill tree
    Directory,
    /// `<base>/<id>.<extension>` holding the canonical file only
    Flat { extension: &'static str },
}

impl Harness {
    pub const ALL: [Harness; 3] = [Harness::ClaudeCode, Harness::Cursor, Harness::OpenCode];

    pub fn id(&self) -> &'static str {
        match self {
            Harness::ClaudeCode => "claude-code",
            Harness::Cursor => "cursor",
            Harness::OpenCode => "opencode",
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Harness::ClaudeCode | Harness::OpenCode => Layout::Directory,
            Harness::Cursor => Layout::Flat { extension: "md" },
        }
    }

    /// Base directory relative to the project checkout.
    pub fn base_dir(&self) -> &'static str {
        match self {
            Harness::ClaudeCode => ".claude/skills",
            Harness::Cursor => ".cursor/rules",
            Harness::OpenCode => ".opencode/skill",
        }
    }

    pub fn base_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(self.base_dir())
    }

    /// Path of the harness entry for one skill: a directory for directory
    /// layouts, a single file for flat layouts.
    pub fn entry_path(&self, project_dir: &Path, skill_id: &str) -> PathBuf {
        let base = self.base_path(project_dir);
        match self.layout() {
            Layout::Directory => base.join(skill_id),
            Layout::Flat { extension } => base.join(format!("{skill_id}.{extension}")),
        }
    }

    /// The skill id a harness entry name maps back to, before id validation.
    ///
    /// Flat layouts strip the extension; entries with another extension
    /// belong to the tool, not to us.
    pub fn skill_name_of<'a>(&self, entry_name: &'a str) -> Option<&'a str> {
        match self.layout() {
            Layout::Directory => Some(entry_name),
            Layout::Flat { extension } => entry_name
                .strip_suffix(extension)
                .and_then(|stem| stem.strip_suffix('.')),
        }
    }

    fn known() -> String {
        Harness::ALL
            .iter()
            .map(|h| h.id())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Harness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Harness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude-code" | "claude" => Ok(Harness::ClaudeCode),
            "cursor" => Ok(Harness::Cursor),
            "opencode" => Ok(Harness::OpenCode),
            _ => Err(Error::UnknownHarness {
                name: s.to_string(),
                known: Harness::known(),
            }),
        }
    }
}

/// How a harness entry is materialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    #[default]
    Symlink,
    Copy,
}

impl LinkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkMode::Symlink => "symlink",
            LinkMode::Copy => "copy",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symlink" => Ok(LinkMode::Symlink),
            "copy" => Ok(LinkMode::Copy),
            _ => Err(Error::UnknownMode {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Harness::ClaudeCode, "/p/.claude/skills/alpha")]
    #[case(Harness::Cursor, "/p/.cursor/rules/alpha.md")]
    #[case(Harness::OpenCode, "/p/.opencode/skill/alpha")]
    fn entry_paths(#[case] harness: Harness, #[case] expected: &str) {
        assert_eq!(
            harness.entry_path(Path::new("/p"), "alpha"),
            PathBuf::from(expected)
        );
    }

    #[rstest]
    #[case("claude-code", Harness::ClaudeCode)]
    #[case("claude", Harness::ClaudeCode)]
    #[case("cursor", Harness::Cursor)]
    #[case("opencode", Harness::OpenCode)]
    fn parses_ids(#[case] input: &str, #[case] expected: Harness) {
        assert_eq!(input.parse::<Harness>().unwrap(), expected);
    }

    #[test]
    fn unknown_harness_lists_known_ids() {
        let err = "vim".parse::<Harness>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("vim"));
        assert!(message.contains("claude-code, cursor, opencode"));
    }

    #[test]
    fn display_round_trips_through_serde() {
        for harness in Harness::ALL {
            let json = serde_json::to_string(&harness).unwrap();
            assert_eq!(json, format!("\"{}\"", harness));
        }
    }

    #[test]
    fn flat_names_strip_extension() {
        assert_eq!(Harness::Cursor.skill_name_of("alpha.md"), Some("alpha"));
        assert_eq!(Harness::Cursor.skill_name_of("alpha.mdc"), None);
        assert_eq!(Harness::Cursor.skill_name_of("md"), None);
        assert_eq!(Harness::ClaudeCode.skill_name_of("alpha"), Some("alpha"));
    }

    #[test]
    fn link_mode_parse() {
        assert_eq!("copy".parse::<LinkMode>().unwrap(), LinkMode::Copy);
        assert!("hardlink".parse::<LinkMode>().is_err());
        assert_eq!(LinkMode::default(), LinkMode::Symlink);
    }
}
