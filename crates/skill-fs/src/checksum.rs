//! SHA-256 checksum utilities
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used for every
//! synchronization decision: lock entries, status resolution and harness
//! drift detection all compare values produced here.
//!
//! Directory checksums are a pure function of the set of
//! `(relative path, content)` pairs below the directory. Relative paths are
//! normalized to `/` and sorted, and `\r\n` line endings are folded to `\n`
//! before hashing, so the same skill hashes identically on every platform.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Hash a single file as though it were the only file of a directory,
/// stored under `relative_name`.
///
/// A flat harness file (`.cursor/rules/alpha.md`) hashed as `SKILL.md`
/// compares equal to a canonical skill directory holding just that file.
pub fn compute_file_checksum_as(path: &Path, relative_name: &str) -> Result<String> {
    let content = fs::read(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    feed(&mut hasher, relative_name, &content);
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Compute the checksum of every file below `dir`.
pub fn compute_dir_checksum(dir: &Path) -> Result<String> {
    compute_dir_checksum_ignoring(dir, &BTreeSet::new())
}

/// Compute the checksum of every file below `dir`, skipping the given
/// `/`-separated relative paths.
///
/// Symbolic links to files are followed and hashed by content.
///
/// # Errors
///
/// Returns an I/O error if `dir` is not a directory or any file cannot be read.
pub fn compute_dir_checksum_ignoring(dir: &Path, ignore: &BTreeSet<String>) -> Result<String> {
    if !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| Error::InvalidPath {
                path: entry.path().to_path_buf(),
                message: format!("not below {}", dir.display()),
            })?;
        let relative = NormalizedPath::new(relative).as_str().to_string();
        if ignore.contains(&relative) {
            continue;
        }
        files.push((relative, entry.into_path()));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Sha256::new();
    for (relative, path) in &files {
        let content = fs::read(path).map_err(|e| Error::io(path, e))?;
        feed(&mut hasher, relative, &content);
    }
    tracing::debug!(dir = %dir.display(), files = files.len(), "hashed directory");

    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

fn feed(hasher: &mut Sha256, relative: &str, content: &[u8]) {
    hasher.update(relative.as_bytes());
    hasher.update(b"\n");
    hasher.update(normalize_line_endings(content));
}

/// Fold `\r\n` to `\n`. Lone `\r` bytes are kept.
pub fn normalize_line_endings(content: &[u8]) -> Cow<'_, [u8]> {
    if !content.windows(2).any(|pair| pair == b"\r\n") {
        return Cow::Borrowed(content);
    }

    let mut out = Vec::with_capacity(content.len());
    let mut iter = content.iter().peekable();
    while let Some(&byte) = iter.next() {
        if byte == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(byte);
    }
    Cow::Owned(out)
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = match err.into_io_error() {
        Some(io) => io,
        None => std::io::Error::other("filesystem loop while walking directory"),
    };
    Error::io(path, source)
}
