//! SyncEngine implementation
//!
//! Every mutation follows the same order: resolve the status from the
//! current state, replicate content, then write lock entries. A push writes
//! the library lock before the project lock. A crash between two steps
//! leaves content ahead of its lock entry, which the next `status` reports
//! and the next push or pull repairs.

use std::collections::BTreeSet;

use skill_fs::replicate::{remove_path, replace_dir};
use skill_fs::{RootLayout, compute_dir_checksum, is_valid_skill_id};
use skill_harness::{Harness, HarnessMaterializer, Linker};

use crate::{
    Error, LockEntry, LockFile, Result, Roots, SkillId, SyncStatus, resolve_status,
};

use super::outcome::{ResolveStrategy, SkillStatus, SyncAction, SyncOutcome};

/// Engine moving skills between one library root and one project root
///
/// Roots are fixed at construction; nothing is read from process-global
/// state.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    roots: Roots,
    materializer: HarnessMaterializer,
}

impl SyncEngine {
    pub fn new(roots: Roots) -> Self {
        let materializer = HarnessMaterializer::new(roots.project.clone());
        Self {
            roots,
            materializer,
        }
    }

    /// Bind harnesses in symlink mode through `linker`.
    pub fn with_linker(mut self, linker: Linker) -> Self {
        self.materializer = self.materializer.with_linker(linker);
        self
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    pub fn library(&self) -> &RootLayout {
        &self.roots.library
    }

    pub fn project(&self) -> &RootLayout {
        &self.roots.project
    }

    pub(crate) fn materializer(&self) -> &HarnessMaterializer {
        &self.materializer
    }

    pub fn library_lock(&self) -> Result<LockFile> {
        LockFile::read(&self.library().lock_path())
    }

    pub fn project_lock(&self) -> Result<LockFile> {
        LockFile::read(&self.project().lock_path())
    }

    /// Content hash of the project copy, `None` if the project has none.
    fn project_hash(&self, id: &SkillId) -> Result<Option<String>> {
        if !self.project().has_skill(id.as_str()) {
            return Ok(None);
        }
        Ok(Some(compute_dir_checksum(
            &self.project().skill_dir(id.as_str()),
        )?))
    }

    /// Status of one skill.
    pub fn status(&self, id: &str) -> Result<SkillStatus> {
        let id = SkillId::new(id)?;
        let project_lock = self.project_lock()?;
        let library_lock = self.library_lock()?;
        self.status_with(&id, &project_lock, &library_lock)
    }

    fn status_with(
        &self,
        id: &SkillId,
        project_lock: &LockFile,
        library_lock: &LockFile,
    ) -> Result<SkillStatus> {
        let project_hash = self.project_hash(id)?;
        let project_entry = project_lock.entry(id.as_str()).cloned();
        let library_entry = library_lock.entry(id.as_str()).cloned();
        let status = resolve_status(
            project_hash.as_deref(),
            project_entry.as_ref(),
            library_entry.as_ref(),
        );
        Ok(SkillStatus {
            id: id.to_string(),
            status,
            project_hash,
            project_entry,
            library_entry,
        })
    }

    /// Status of every skill known to either root, sorted by id.
    ///
    /// A skill is known if it has a directory under `skills/` or a lock
    /// entry in either root. Directory names that are not valid ids are
    /// ignored.
    pub fn status_all(&self) -> Result<Vec<SkillStatus>> {
        let project_lock = self.project_lock()?;
        let library_lock = self.library_lock()?;

        let mut ids = BTreeSet::new();
        ids.extend(self.project().skill_ids()?);
        ids.extend(self.library().skill_ids()?);
        ids.extend(project_lock.skills.keys().cloned());
        ids.extend(library_lock.skills.keys().cloned());

        let mut statuses = Vec::new();
        for id in ids {
            if !is_valid_skill_id(&id) {
                tracing::debug!(skill = %id, "ignoring entry with invalid skill id");
                continue;
            }
            let id = SkillId::new(id)?;
            statuses.push(self.status_with(&id, &project_lock, &library_lock)?);
        }
        Ok(statuses)
    }

    /// Copy a library skill into the project and link it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the library lacks the directory or the lock entry
    /// - `AlreadyExists` if the project has the skill and `overwrite` is false
    pub fn install(&self, id: &str, overwrite: bool) -> Result<SyncOutcome> {
        let id = SkillId::new(id)?;
        let id = id.as_str();

        let library_lock = self.library_lock()?;
        let Some(library_entry) = library_lock.entry(id).cloned() else {
            return Err(Error::not_found(id, "no lock entry in the library"));
        };
        if !self.library().has_skill(id) {
            return Err(Error::not_found(id, "no directory in the library"));
        }
        if self.project().has_skill(id) && !overwrite {
            return Err(Error::AlreadyExists { id: id.to_string() });
        }

        replace_dir(&self.library().skill_dir(id), &self.project().skill_dir(id))?;
        self.project_lock()?
            .set_entry(id, library_entry.clone())
            .write(&self.project().lock_path())?;

        tracing::info!(skill = %id, version = library_entry.version, "installed skill");
        Ok(SyncOutcome::new(id, SyncAction::Installed, Some(library_entry)))
    }

    /// Bring the project copy up to the library state.
    ///
    /// A skill absent from the project is installed.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the project copy has no lock entry
    /// - `NotFound` if the library has no entry or directory
    /// - `Conflict` (exit 2) if the project is `diverged` or `ahead`
    pub fn pull(&self, id: &str) -> Result<SyncOutcome> {
        let skill = SkillId::new(id)?;
        let id = skill.as_str();

        if !self.project().has_skill(id) {
            tracing::debug!(skill = %id, "not in project, installing");
            return self.install(id, false);
        }

        let project_lock = self.project_lock()?;
        let library_lock = self.library_lock()?;
        if project_lock.entry(id).is_none() {
            return Err(Error::invalid_state(
                id,
                "is not linked to the library; use `install --force` to replace it",
            ));
        }
        let Some(library_entry) = library_lock.entry(id).cloned() else {
            return Err(Error::not_found(id, "no lock entry in the library"));
        };
        if !self.library().has_skill(id) {
            return Err(Error::not_found(id, "no directory in the library"));
        }

        let status = self.status_with(&skill, &project_lock, &library_lock)?;
        match status.status {
            SyncStatus::Diverged => Err(Error::conflict(
                id,
                SyncStatus::Diverged,
                "both sides changed; run `resolve --strategy library|project` first",
            )),
            SyncStatus::Ahead => Err(Error::conflict(
                id,
                SyncStatus::Ahead,
                "the project has unpushed changes; push first",
            )),
            SyncStatus::Synced => {
                tracing::debug!(skill = %id, "already synced");
                Ok(SyncOutcome::new(id, SyncAction::Unchanged, status.project_entry))
            }
            SyncStatus::Behind => {
                replace_dir(&self.library().skill_dir(id), &self.project().skill_dir(id))?;
                project_lock
                    .set_entry(id, library_entry.clone())
                    .write(&self.project().lock_path())?;
                tracing::info!(skill = %id, version = library_entry.version, "pulled skill");
                Ok(SyncOutcome::new(id, SyncAction::Updated, Some(library_entry)))
            }
            SyncStatus::LocalOnly | SyncStatus::LibraryOnly => Err(Error::invalid_state(
                id,
                format!("is {} and cannot be pulled", status.status),
            )),
        }
    }

    /// Publish the project copy as the next library version.
    ///
    /// A skill with no entry in either root is published as version 1.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project has no copy
    /// - `InvalidState` if the project copy is unlinked but the library
    ///   already has an entry
    /// - `Conflict` (exit 2) if `diverged`, (exit 1) if `behind`
    pub fn push(&self, id: &str) -> Result<SyncOutcome> {
        let skill = SkillId::new(id)?;
        let id = skill.as_str();

        if !self.project().has_skill(id) {
            return Err(Error::not_found(id, "no directory in the project"));
        }

        let project_lock = self.project_lock()?;
        let library_lock = self.library_lock()?;
        let library_entry = library_lock.entry(id);

        if project_lock.entry(id).is_none() {
            if library_entry.is_some() {
                return Err(Error::invalid_state(
                    id,
                    "exists in the library but is not linked here; install first",
                ));
            }
        } else {
            let status = self.status_with(&skill, &project_lock, &library_lock)?;
            match status.status {
                SyncStatus::Diverged => {
                    return Err(Error::conflict(
                        id,
                        SyncStatus::Diverged,
                        "both sides changed; run `resolve --strategy library|project` first",
                    ));
                }
                SyncStatus::Behind => {
                    return Err(Error::conflict(
                        id,
                        SyncStatus::Behind,
                        "the library has a newer version; pull first",
                    ));
                }
                SyncStatus::Synced => {
                    tracing::debug!(skill = %id, "already synced");
                    return Ok(SyncOutcome::new(
                        id,
                        SyncAction::Unchanged,
                        status.project_entry,
                    ));
                }
                SyncStatus::Ahead | SyncStatus::LocalOnly | SyncStatus::LibraryOnly => {}
            }
        }

        let entry = self.publish(&skill, library_entry, project_lock, &library_lock)?;
        tracing::info!(skill = %id, version = entry.version, "pushed skill");
        Ok(SyncOutcome::new(id, SyncAction::Pushed, Some(entry)))
    }

    /// Copy the project copy into the library as `library.version + 1`, then
    /// record the same entry in both locks, library first.
    fn publish(
        &self,
        id: &SkillId,
        library_entry: Option<&LockEntry>,
        project_lock: LockFile,
        library_lock: &LockFile,
    ) -> Result<LockEntry> {
        let id = id.as_str();
        let next = library_entry.map_or(1, |e| e.version + 1);
        let project_dir = self.project().skill_dir(id);
        let hash = compute_dir_checksum(&project_dir)?;

        replace_dir(&project_dir, &self.library().skill_dir(id))?;

        let entry = LockEntry::new(next, hash);
        library_lock
            .clone()
            .set_entry(id, entry.clone())
            .write(&self.library().lock_path())?;
        project_lock
            .set_entry(id, entry.clone())
            .write(&self.project().lock_path())?;
        Ok(entry)
    }

    /// Settle a skill by choosing one side wholesale.
    ///
    /// # Errors
    ///
    /// - `NotFound` if either root lacks the directory, or for `library`
    ///   when the library has no lock entry
    /// - `Unsupported` for `merge`; nothing is modified
    pub fn resolve(&self, id: &str, strategy: ResolveStrategy) -> Result<SyncOutcome> {
        let skill = SkillId::new(id)?;
        let id = skill.as_str();

        if !self.project().has_skill(id) {
            return Err(Error::not_found(id, "no directory in the project"));
        }
        if !self.library().has_skill(id) {
            return Err(Error::not_found(id, "no directory in the library"));
        }

        let project_lock = self.project_lock()?;
        let library_lock = self.library_lock()?;

        let entry = match strategy {
            ResolveStrategy::Merge => {
                return Err(Error::Unsupported(
                    "merge strategy is not supported; use library or project".into(),
                ));
            }
            ResolveStrategy::Library => {
                let Some(library_entry) = library_lock.entry(id).cloned() else {
                    return Err(Error::not_found(id, "no lock entry in the library"));
                };
                replace_dir(&self.library().skill_dir(id), &self.project().skill_dir(id))?;
                project_lock
                    .set_entry(id, library_entry.clone())
                    .write(&self.project().lock_path())?;
                library_entry
            }
            ResolveStrategy::Project => {
                self.publish(&skill, library_lock.entry(id), project_lock, &library_lock)?
            }
        };

        tracing::info!(skill = %id, strategy = %strategy, version = entry.version, "resolved skill");
        Ok(SyncOutcome::new(id, SyncAction::Resolved, Some(entry)))
    }

    /// Remove a skill from the project: its harness bindings, the directory
    /// and the lock entry. Harness entries that differ from the skill are
    /// left in place. The library is not touched.
    pub fn uninstall(&self, id: &str) -> Result<SyncOutcome> {
        let skill = SkillId::new(id)?;
        let id = skill.as_str();

        if !self.project().has_skill(id) {
            return Err(Error::not_found(id, "no directory in the project"));
        }

        let materializer = self.materializer();
        for harness in Harness::ALL {
            materializer.unbind(harness, id)?;
        }
        remove_path(&self.project().skill_dir(id))?;

        let project_lock = self.project_lock()?;
        let removed = project_lock.entry(id).cloned();
        if removed.is_some() {
            project_lock
                .remove_entry(id)
                .write(&self.project().lock_path())?;
        }

        tracing::info!(skill = %id, "uninstalled skill");
        Ok(SyncOutcome::new(id, SyncAction::Uninstalled, removed))
    }
}
