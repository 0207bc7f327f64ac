//! Harness operations on the project root
//!
//! Registration lives in the project lock (`harnesses`, `harnessModes`).
//! When a command names no link mode it is taken from the registration,
//! then from the library settings, then defaults to symlink.

use skill_harness::{Harness, HarnessImportReport, HarnessReport, LinkMode};

use crate::{Result, Settings, SkillId};

use super::SyncEngine;

impl SyncEngine {
    /// Library settings, defaults when `config.toml` is absent.
    pub fn settings(&self) -> Result<Settings> {
        Settings::load(self.library())
    }

    /// Link mode for `harness` when the caller names none.
    pub fn harness_mode(&self, harness: Harness, requested: Option<LinkMode>) -> Result<LinkMode> {
        if let Some(mode) = requested {
            return Ok(mode);
        }
        if let Some(mode) = self.project_lock()?.harness_mode(harness) {
            return Ok(mode);
        }
        Ok(self.settings()?.default_mode)
    }

    /// Harnesses to sync when the caller names none: the project's
    /// registrations, else the library settings.
    pub fn registered_harnesses(&self) -> Result<Vec<Harness>> {
        let lock = self.project_lock()?;
        if !lock.harnesses().is_empty() {
            return Ok(lock.harnesses().to_vec());
        }
        Ok(self.settings()?.harnesses)
    }

    /// Record `harness` and its link mode in the project lock.
    pub fn enable_harness(&self, harness: Harness, mode: LinkMode) -> Result<()> {
        let path = self.project().lock_path();
        let lock = self.project_lock()?;
        if lock.harnesses().contains(&harness) && lock.harness_mode(harness) == Some(mode) {
            return Ok(());
        }
        lock.enable_harness(harness, mode).write(&path)?;
        tracing::debug!(harness = %harness, mode = %mode, "registered harness");
        Ok(())
    }

    /// Drop the registration of `harness` from the project lock.
    pub fn disable_harness(&self, harness: Harness) -> Result<()> {
        let path = self.project().lock_path();
        let lock = self.project_lock()?;
        if !lock.harnesses().contains(&harness) && lock.harness_mode(harness).is_none() {
            return Ok(());
        }
        lock.disable_harness(harness).write(&path)?;
        tracing::debug!(harness = %harness, "unregistered harness");
        Ok(())
    }

    /// Materialize the project's skills into `harness` and register it with
    /// the mode the run ended in, `copy` after a symlink fallback.
    pub fn sync_harness(
        &self,
        harness: Harness,
        mode: Option<LinkMode>,
        force: bool,
    ) -> Result<HarnessReport> {
        let mode = self.harness_mode(harness, mode)?;
        let report = self.materializer().sync(harness, mode, force)?;
        self.enable_harness(harness, report.mode)?;
        Ok(report)
    }

    /// Sync every registered harness in its registered mode.
    pub fn sync_registered_harnesses(&self, force: bool) -> Result<Vec<HarnessReport>> {
        let mut reports = Vec::new();
        for harness in self.registered_harnesses()? {
            reports.push(self.sync_harness(harness, None, force)?);
        }
        Ok(reports)
    }

    /// Compare the project's skills against `harness` without writing.
    pub fn harness_status(&self, harness: Harness, mode: Option<LinkMode>) -> Result<HarnessReport> {
        let mode = self.harness_mode(harness, mode)?;
        Ok(self.materializer().status(harness, mode)?)
    }

    /// Copy harness content into the project's canonical location.
    pub fn import_harness(
        &self,
        harness: Harness,
        mode: Option<LinkMode>,
    ) -> Result<HarnessImportReport> {
        let mode = self.harness_mode(harness, mode)?;
        Ok(self.materializer().import(harness, mode)?)
    }

    /// Remove one skill's entry from `harness`. Returns whether anything
    /// was removed.
    pub fn unlink_harness(&self, harness: Harness, id: &str) -> Result<bool> {
        let id = SkillId::new(id)?;
        Ok(self.materializer().unlink(harness, id.as_str())?)
    }

    /// Delete the harness directory and drop its registration.
    pub fn remove_harness(&self, harness: Harness) -> Result<bool> {
        let removed = self.materializer().remove_harness(harness)?;
        self.disable_harness(harness)?;
        Ok(removed)
    }
}
