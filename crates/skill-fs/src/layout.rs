//! Skill root layout
//!
//! A root is a directory holding `skills/<id>/SKILL.md` trees and a lock
//! file. The library root is a user-wide location; a project root lives in
//! `<project>/.skills`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result, SkillPath};

/// Which side of the synchronization a root is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    Library,
    Project,
}

/// Path resolution for one skill root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLayout {
    root: PathBuf,
    kind: RootKind,
}

impl RootLayout {
    /// A library root located directly at `root`.
    pub fn library(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            kind: RootKind::Library,
        }
    }

    /// The project root nested in `project_dir`.
    pub fn project(project_dir: impl AsRef<Path>) -> Self {
        Self {
            root: project_dir.as_ref().join(SkillPath::ProjectRootDir),
            kind: RootKind::Project,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory harness paths are resolved against.
    ///
    /// For a project root this is the project checkout; a library root has
    /// no harnesses and returns itself.
    pub fn project_dir(&self) -> &Path {
        match self.kind {
            RootKind::Project => self.root.parent().unwrap_or(&self.root),
            RootKind::Library => &self.root,
        }
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.root.join(SkillPath::SkillsDir)
    }

    pub fn skill_dir(&self, id: &str) -> PathBuf {
        self.skills_dir().join(id)
    }

    pub fn canonical_file(&self, id: &str) -> PathBuf {
        self.skill_dir(id).join(SkillPath::CanonicalFile)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(SkillPath::LockFile)
    }

    pub fn has_skill(&self, id: &str) -> bool {
        self.skill_dir(id).is_dir()
    }

    /// Names of every directory under `skills/`, sorted.
    ///
    /// A missing `skills/` directory yields an empty list.
    pub fn skill_ids(&self) -> Result<Vec<String>> {
        let dir = self.skills_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))? {
            let entry = entry.map_err(|e| Error::io(&dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            ids.push(name);
        }
        ids.sort();
        Ok(ids)
    }
}
