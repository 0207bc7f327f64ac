//! Directory replication
//!
//! Replaces one skill directory with a full copy of another. The copy is
//! staged in a hidden sibling directory and renamed into place, so a failed
//! copy leaves the destination untouched.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

/// Replace `dest` with a recursive copy of `src`.
///
/// Symbolic links inside `src` are followed and copied as regular files.
/// Whatever currently occupies `dest` (directory, file or link) is removed.
pub fn replace_dir(src: &Path, dest: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(Error::io(
            src,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source directory not found"),
        ));
    }
    if same_location(src, dest) {
        tracing::debug!(src = %src.display(), "source and destination are the same directory");
        return Ok(());
    }

    let staging = staging_path(dest)?;
    remove_path(&staging)?;

    if let Err(e) = copy_tree(src, &staging) {
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }

    remove_path(dest)?;
    fs::rename(&staging, dest).map_err(|e| Error::io(dest, e))?;

    tracing::debug!(src = %src.display(), dest = %dest.display(), "replicated directory");
    Ok(())
}

/// Replace the file at `dest` with a copy of `src`.
///
/// Any directory or link at `dest` is removed first.
pub fn copy_file_replacing(src: &Path, dest: &Path) -> Result<()> {
    let staging = staging_path(dest)?;
    fs::copy(src, &staging).map_err(|e| Error::io(src, e))?;
    if let Err(e) = remove_path(dest) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    fs::rename(&staging, dest).map_err(|e| Error::io(dest, e))?;
    Ok(())
}

/// Remove a file, link or directory tree. An absent path is not an error.
///
/// Links are removed themselves; their targets are never touched.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(path, e)),
    };

    let result = if metadata.file_type().is_symlink() {
        // Windows directory links must go through remove_dir
        fs::remove_file(path).or_else(|_| fs::remove_dir(path))
    } else if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| Error::io(path, e))
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop while copying"));
            Error::io(path, source)
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| Error::InvalidPath {
                path: entry.path().to_path_buf(),
                message: format!("not below {}", src.display()),
            })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
        }
    }
    Ok(())
}

fn staging_path(dest: &Path) -> Result<PathBuf> {
    let parent = dest.parent().ok_or_else(|| Error::InvalidPath {
        path: dest.to_path_buf(),
        message: "destination has no parent directory".into(),
    })?;
    let name = dest.file_name().ok_or_else(|| Error::InvalidPath {
        path: dest.to_path_buf(),
        message: "destination has no file name".into(),
    })?;
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    Ok(parent.join(format!(
        ".{}.tmp-{}",
        name.to_string_lossy(),
        std::process::id()
    )))
}

/// Whether `dest` already is `src`. A link at `dest` is never the same
/// location since replacing it leaves the link target alone.
fn same_location(src: &Path, dest: &Path) -> bool {
    let dest_is_link = fs::symlink_metadata(dest)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if dest_is_link {
        return false;
    }
    match (dunce::canonicalize(src), dunce::canonicalize(dest)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
