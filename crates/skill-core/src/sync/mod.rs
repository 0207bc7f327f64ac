//! SyncEngine for moving skills between the library and a project
//!
//! This module provides:
//! - **engine**: install, pull, push, resolve, uninstall and status
//! - **harness**: harness sync, import and registration on top of the project root
//! - **outcome**: result types shared by the CLI's plain and JSON output

mod engine;
mod harness;
mod outcome;

pub use engine::SyncEngine;
pub use outcome::{ResolveStrategy, SkillStatus, SyncAction, SyncOutcome};
