//! Harness materializer
//!
//! Projects the canonical skills of a project root into harness directories
//! and reads harness content back.
//!
//! Policies:
//! - In symlink mode a regular file or directory at a harness path is a
//!   `conflict` and is never overwritten.
//! - If the platform refuses to create a symlink, the rest of the run
//!   switches to copy mode and the report carries `fallback_to_copy`.
//! - In copy mode a drifted copy is only overwritten with `force`; a link
//!   found at the path is always replaced since it holds no content of its own.
//! - Uninstalling a skill only removes harness entries it owns: links and
//!   copies identical to the canonical skill.
//! - Importing from a harness whose base directory does not exist is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use skill_fs::checksum::{compute_dir_checksum, compute_file_checksum_as};
use skill_fs::link::{create_relative_symlink, is_symlink, is_symlink_unsupported, points_to};
use skill_fs::replicate::{copy_file_replacing, remove_path, replace_dir};
use skill_fs::{RootLayout, SkillPath, is_valid_skill_id};

use crate::report::{BindingState, HarnessImportReport, HarnessReport};
use crate::{Harness, Layout, LinkMode, Result};

/// Creates a symbolic link at the second path resolving to the first.
pub type Linker = fn(&Path, &Path) -> skill_fs::Result<()>;

/// Materializes the skills of one project root into harness directories.
#[derive(Debug, Clone)]
pub struct HarnessMaterializer {
    project: RootLayout,
    linker: Linker,
}

/// What currently occupies a harness path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Inspection {
    state: BindingState,
    is_link: bool,
}

impl HarnessMaterializer {
    pub fn new(project: RootLayout) -> Self {
        Self {
            project,
            linker: create_relative_symlink,
        }
    }

    /// Use `linker` instead of relative symlinks when binding in symlink mode.
    pub fn with_linker(mut self, linker: Linker) -> Self {
        self.linker = linker;
        self
    }

    pub fn project(&self) -> &RootLayout {
        &self.project
    }

    fn project_dir(&self) -> &Path {
        self.project.project_dir()
    }

    /// Where a harness entry for `id` should point or copy from.
    fn source_path(&self, harness: Harness, id: &str) -> PathBuf {
        match harness.layout() {
            Layout::Directory => self.project.skill_dir(id),
            Layout::Flat { .. } => self.project.canonical_file(id),
        }
    }

    /// Skills of the project root that can be materialized.
    fn materializable_skills(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for id in self.project.skill_ids()? {
            if !is_valid_skill_id(&id) {
                tracing::warn!(skill = %id, "skipping directory with invalid skill id");
                continue;
            }
            if !self.project.canonical_file(&id).is_file() {
                tracing::warn!(skill = %id, "skipping skill without {}", SkillPath::CanonicalFile);
                continue;
            }
            ids.push(id);
        }
        Ok(ids)
    }

    /// Project every canonical skill into `harness`.
    pub fn sync(&self, harness: Harness, mode: LinkMode, force: bool) -> Result<HarnessReport> {
        let mut report = HarnessReport::new(harness, mode);
        let mut effective = mode;

        for id in self.materializable_skills()? {
            let found = self.inspect(harness, effective, &id)?;
            let write = match found.state {
                BindingState::Conflict => {
                    tracing::warn!(
                        harness = %harness,
                        skill = %id,
                        "harness path is not a symlink, leaving it untouched"
                    );
                    false
                }
                BindingState::Synced => false,
                BindingState::Missing => true,
                BindingState::Drifted => {
                    effective == LinkMode::Symlink || found.is_link || force
                }
            };

            if write {
                effective = self.materialize(harness, effective, &id, &mut report.fallback_to_copy)?;
                report.mode = effective;
            }
            report.record(&id, found.state, write);
        }

        tracing::info!(
            harness = %harness,
            mode = %report.mode,
            total = report.total,
            written = report.written(),
            conflicts = report.conflicts,
            "synced harness"
        );
        Ok(report)
    }

    /// Compare every canonical skill against `harness` without writing.
    pub fn status(&self, harness: Harness, mode: LinkMode) -> Result<HarnessReport> {
        let mut report = HarnessReport::new(harness, mode);
        for id in self.materializable_skills()? {
            let found = self.inspect(harness, mode, &id)?;
            report.record(&id, found.state, false);
        }
        Ok(report)
    }

    /// Copy harness content back into the project root's canonical location.
    ///
    /// Harness entries that are already links are projections of the
    /// canonical content and are skipped. With `LinkMode::Symlink` every
    /// imported entry is afterwards replaced by a link to its new canonical
    /// location.
    pub fn import(&self, harness: Harness, mode: LinkMode) -> Result<HarnessImportReport> {
        let mut report = HarnessImportReport::empty(harness);
        let base = harness.base_path(self.project_dir());
        if !base.is_dir() {
            tracing::debug!(harness = %harness, base = %base.display(), "harness folder absent, nothing to import");
            return Ok(report);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&base).map_err(|e| skill_fs::Error::io(&base, e))? {
            let entry = entry.map_err(|e| skill_fs::Error::io(&base, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        let mut effective = mode;
        for name in names {
            let entry = base.join(&name);
            if is_symlink(&entry) {
                continue;
            }
            let Some(id) = harness.skill_name_of(&name).filter(|id| is_valid_skill_id(id)) else {
                if !name.starts_with('.') {
                    tracing::warn!(harness = %harness, entry = %name, "skipping entry that is not a valid skill name");
                    report.skipped.push(name);
                }
                continue;
            };

            match harness.layout() {
                Layout::Directory => {
                    if !entry.join(SkillPath::CanonicalFile).is_file() {
                        tracing::warn!(harness = %harness, entry = %name, "skipping directory without {}", SkillPath::CanonicalFile);
                        report.skipped.push(name);
                        continue;
                    }
                    replace_dir(&entry, &self.project.skill_dir(id))?;
                }
                Layout::Flat { .. } => {
                    if !entry.is_file() {
                        report.skipped.push(name);
                        continue;
                    }
                    let skill_dir = self.project.skill_dir(id);
                    fs::create_dir_all(&skill_dir).map_err(|e| skill_fs::Error::io(&skill_dir, e))?;
                    copy_file_replacing(&entry, &self.project.canonical_file(id))?;
                }
            }
            tracing::info!(harness = %harness, skill = %id, "imported skill from harness");
            report.imported.push(id.to_string());

            if effective == LinkMode::Symlink {
                remove_path(&entry)?;
                effective = self.materialize(harness, effective, id, &mut report.fallback_to_copy)?;
                if effective == LinkMode::Symlink {
                    report.relinked += 1;
                }
            }
        }

        Ok(report)
    }

    /// Remove one skill's harness link, file or copied tree.
    ///
    /// Returns whether anything was removed.
    pub fn unlink(&self, harness: Harness, id: &str) -> Result<bool> {
        let entry = harness.entry_path(self.project_dir(), id);
        let existed = fs::symlink_metadata(&entry).is_ok();
        remove_path(&entry)?;
        if existed {
            tracing::debug!(harness = %harness, skill = %id, "removed harness binding");
        }
        Ok(existed)
    }

    /// Remove one skill's harness entry if it is a projection of the
    /// canonical skill: a link, or a copy identical to it. Anything else is
    /// user content and stays.
    ///
    /// Returns whether anything was removed.
    pub fn unbind(&self, harness: Harness, id: &str) -> Result<bool> {
        let entry = harness.entry_path(self.project_dir(), id);
        let metadata = match fs::symlink_metadata(&entry) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(skill_fs::Error::io(&entry, e).into()),
        };

        let owned = metadata.file_type().is_symlink()
            || (self.project.canonical_file(id).is_file() && self.copy_matches(harness, id, &entry)?);
        if !owned {
            tracing::warn!(
                harness = %harness,
                skill = %id,
                path = %entry.display(),
                "harness entry differs from the skill, leaving it in place"
            );
            return Ok(false);
        }

        remove_path(&entry)?;
        tracing::debug!(harness = %harness, skill = %id, "removed harness binding");
        Ok(true)
    }

    /// Delete the harness base directory with everything in it.
    pub fn remove_harness(&self, harness: Harness) -> Result<bool> {
        let base = harness.base_path(self.project_dir());
        let existed = fs::symlink_metadata(&base).is_ok();
        remove_path(&base)?;
        if existed {
            tracing::info!(harness = %harness, base = %base.display(), "removed harness directory");
        }
        Ok(existed)
    }

    fn inspect(&self, harness: Harness, mode: LinkMode, id: &str) -> Result<Inspection> {
        let entry = harness.entry_path(self.project_dir(), id);
        let metadata = match fs::symlink_metadata(&entry) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Inspection {
                    state: BindingState::Missing,
                    is_link: false,
                });
            }
            Err(e) => return Err(skill_fs::Error::io(&entry, e).into()),
        };
        let is_link = metadata.file_type().is_symlink();

        let state = match mode {
            LinkMode::Symlink if !is_link => BindingState::Conflict,
            LinkMode::Symlink => {
                if points_to(&entry, &self.source_path(harness, id)) {
                    BindingState::Synced
                } else {
                    BindingState::Drifted
                }
            }
            LinkMode::Copy if is_link => BindingState::Drifted,
            LinkMode::Copy => {
                if self.copy_matches(harness, id, &entry)? {
                    BindingState::Synced
                } else {
                    BindingState::Drifted
                }
            }
        };

        Ok(Inspection { state, is_link })
    }

    fn copy_matches(&self, harness: Harness, id: &str, entry: &Path) -> Result<bool> {
        let canonical_name = SkillPath::CanonicalFile.as_str();
        let matches = match harness.layout() {
            Layout::Directory => {
                entry.is_dir()
                    && compute_dir_checksum(entry)? == compute_dir_checksum(&self.project.skill_dir(id))?
            }
            Layout::Flat { .. } => {
                entry.is_file()
                    && compute_file_checksum_as(entry, canonical_name)?
                        == compute_file_checksum_as(&self.project.canonical_file(id), canonical_name)?
            }
        };
        Ok(matches)
    }

    /// Write one harness entry, replacing whatever is there.
    ///
    /// Returns the mode that is in effect afterwards, which is `Copy` once
    /// the platform has refused a symlink.
    fn materialize(
        &self,
        harness: Harness,
        mode: LinkMode,
        id: &str,
        fallback: &mut bool,
    ) -> Result<LinkMode> {
        let entry = harness.entry_path(self.project_dir(), id);
        let source = self.source_path(harness, id);

        if mode == LinkMode::Symlink {
            remove_path(&entry)?;
            match (self.linker)(&source, &entry) {
                Ok(()) => return Ok(LinkMode::Symlink),
                Err(e) if is_symlink_unsupported(&e) => {
                    tracing::warn!(
                        harness = %harness,
                        error = %e,
                        "symlinks unavailable, falling back to copy mode"
                    );
                    *fallback = true;
                }
                Err(e) => return Err(e.into()),
            }
        }

        match harness.layout() {
            Layout::Directory => replace_dir(&source, &entry)?,
            Layout::Flat { .. } => copy_file_replacing(&source, &entry)?,
        }
        tracing::debug!(harness = %harness, skill = %id, "copied skill into harness");
        Ok(LinkMode::Copy)
    }
}
