//! Root locations and library settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skill_fs::{ConfigStore, RootLayout, SkillPath};
use skill_harness::{Harness, LinkMode};

use crate::Result;

/// The pair of roots one engine synchronizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub library: RootLayout,
    pub project: RootLayout,
}

impl Roots {
    /// Library root at `library_root`, project root in `project_dir/.skills`.
    pub fn new(library_root: impl Into<PathBuf>, project_dir: impl AsRef<Path>) -> Self {
        Self {
            library: RootLayout::library(library_root),
            project: RootLayout::project(project_dir),
        }
    }
}

/// `<home>/.skills`, the library location when nothing else is configured.
pub fn default_library_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SkillPath::ProjectRootDir))
}

/// Library-wide settings from `<library>/config.toml`.
///
/// ```toml
/// default_mode = "copy"
/// harnesses = ["claude-code", "cursor"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Link mode used when neither the command nor the project lock names one
    pub default_mode: LinkMode,
    /// Harnesses synced when the project lock registers none
    pub harnesses: Vec<Harness>,
}

impl Settings {
    pub fn path(library: &RootLayout) -> PathBuf {
        library.root().join(SkillPath::SettingsFile)
    }

    /// Load settings, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if the file exists but is not valid.
    pub fn load(library: &RootLayout) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(&Self::path(library))?)
    }

    pub fn save(&self, library: &RootLayout) -> Result<()> {
        Ok(ConfigStore::new().save(&Self::path(library), self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_settings_default_to_symlink() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(&RootLayout::library(temp.path())).unwrap();
        assert_eq!(settings.default_mode, LinkMode::Symlink);
        assert!(settings.harnesses.is_empty());
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let temp = TempDir::new().unwrap();
        let library = RootLayout::library(temp.path());
        std::fs::write(Settings::path(&library), "harnesses = [\"cursor\"]\n").unwrap();

        let settings = Settings::load(&library).unwrap();
        assert_eq!(settings.default_mode, LinkMode::Symlink);
        assert_eq!(settings.harnesses, vec![Harness::Cursor]);
    }

    #[test]
    fn malformed_settings_are_an_error() {
        let temp = TempDir::new().unwrap();
        let library = RootLayout::library(temp.path());
        std::fs::write(Settings::path(&library), "default_mode = \"hardlink\"\n").unwrap();

        assert!(matches!(
            Settings::load(&library),
            Err(crate::Error::Fs(skill_fs::Error::ConfigParse { .. }))
        ));
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let library = RootLayout::library(temp.path());
        let settings = Settings {
            default_mode: LinkMode::Copy,
            harnesses: vec![Harness::ClaudeCode, Harness::OpenCode],
        };

        settings.save(&library).unwrap();
        assert_eq!(Settings::load(&library).unwrap(), settings);
    }

    #[test]
    fn roots_nest_project_root() {
        let roots = Roots::new("/home/me/.skills", "/work/app");
        assert_eq!(roots.library.root(), Path::new("/home/me/.skills"));
        assert_eq!(roots.project.root(), Path::new("/work/app/.skills"));
    }
}
