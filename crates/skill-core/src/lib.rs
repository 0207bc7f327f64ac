//! Core synchronization layer for the skill library
//!
//! This crate keeps a user-wide library root and per-project roots
//! eventually consistent, implementing:
//!
//! - **Lock store**: a versioned `{version, hash}` record per skill in each root
//! - **Status resolver**: classifies a skill from its project hash and both lock entries
//! - **SyncEngine**: install, pull, push, resolve and uninstall orchestrators
//! - **Settings**: optional library-wide defaults for harness materialization
//!
//! # Architecture
//!
//! ```text
//!                  skills CLI
//!                      |
//!                 skill-core
//!                      |
//!            +---------+---------+
//!            |                   |
//!        skill-fs          skill-harness
//! ```
//!
//! # Example
//!
//! ```no_run
//! use skill_core::{Roots, SyncEngine};
//!
//! fn example() -> skill_core::Result<()> {
//!     let engine = SyncEngine::new(Roots::new("/home/me/.skills", "/work/app"));
//!     engine.install("code-review", false)?;
//!     let status = engine.status("code-review")?;
//!     println!("{}", status.status);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod lock;
pub mod status;
pub mod sync;

pub use config::{Roots, Settings, default_library_root};
pub use error::{Error, Result};
pub use id::SkillId;
pub use lock::{LockEntry, LockFile};
pub use status::{SyncStatus, resolve_status};
pub use sync::{ResolveStrategy, SkillStatus, SyncAction, SyncEngine, SyncOutcome};
