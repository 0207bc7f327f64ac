//! Harness materialization for skill synchronization.
//!
//! A harness is an external tool's directory convention (Claude Code,
//! Cursor, OpenCode). This crate projects the canonical skills of a project
//! root into those conventions, either as relative symbolic links or as full
//! copies, and reports drift between the two.
//!
//! The materializer only ever reads the project root's canonical content.
//! It never touches the library root or any lock file.

pub mod error;
pub mod harness;
pub mod materialize;
pub mod report;

pub use error::{Error, Result};
pub use harness::{Harness, Layout, LinkMode};
pub use materialize::{HarnessMaterializer, Linker};
pub use report::{BindingReport, BindingState, HarnessImportReport, HarnessReport};
