//! Constants and enums for skill root filesystem paths.

use std::path::Path;

/// Fixed names that make up a skill root on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillPath {
    /// The `skills` directory holding one subdirectory per skill
    SkillsDir,
    /// The lock file recording version and hash per skill
    LockFile,
    /// The canonical file every skill directory contains
    CanonicalFile,
    /// The `.skills` directory a project root lives in
    ProjectRootDir,
    /// The optional settings file in the library root
    SettingsFile,
}

impl SkillPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkillsDir => "skills",
            Self::LockFile => "skills.lock.json",
            Self::CanonicalFile => "SKILL.md",
            Self::ProjectRootDir => ".skills",
            Self::SettingsFile => "config.toml",
        }
    }
}

impl AsRef<Path> for SkillPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SkillPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SkillPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
