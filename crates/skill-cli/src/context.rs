//! Root resolution for a CLI invocation

use std::path::PathBuf;

use skill_core::{Roots, SyncEngine, default_library_root};

use crate::error::{CliError, Result};

/// Library and project locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub library: PathBuf,
    pub project: PathBuf,
}

impl Context {
    /// Resolve roots: `--library` (or `SKILLS_LIBRARY`, handled by clap),
    /// else `~/.skills`; `--project`, else the current directory.
    pub fn resolve(library: Option<PathBuf>, project: Option<PathBuf>) -> Result<Self> {
        let library = match library {
            Some(path) => path,
            None => default_library_root().ok_or_else(|| {
                CliError::user("Could not determine the home directory; pass --library")
            })?,
        };
        let project = match project {
            Some(path) => path,
            None => std::env::current_dir()?,
        };
        tracing::debug!(library = %library.display(), project = %project.display(), "resolved roots");
        Ok(Self { library, project })
    }

    pub fn engine(&self) -> SyncEngine {
        SyncEngine::new(Roots::new(&self.library, &self.project))
    }
}
