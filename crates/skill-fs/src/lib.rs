//! Filesystem layer for skill synchronization
//!
//! Provides the content hasher, the directory replicator, atomic writes,
//! relative symlink helpers and the on-disk layout of a skill root.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod link;
pub mod path;
pub mod replicate;

pub use checksum::{compute_dir_checksum, compute_dir_checksum_ignoring};
pub use config::ConfigStore;
pub use constants::SkillPath;
pub use error::{Error, Result};
pub use layout::RootLayout;
pub use path::{NormalizedPath, is_valid_skill_id};
