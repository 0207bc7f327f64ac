//! Shared test utilities for the skill-sync workspace.
//!
//! This crate provides standardised fixtures so every crate's tests build
//! library and project roots the same way. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`roots`]: [`TestRoots`] builder holding a library root and a project
//!   checkout side by side in one temporary directory

pub mod roots;

pub use roots::{TestRoots, write_skill};
