//! Relative symbolic links
//!
//! Harness bindings are relative links so a project checkout can be moved or
//! cloned elsewhere without breaking them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, NormalizedPath, Result};

/// Create a relative symbolic link at `link` pointing to `target`.
///
/// Parent directories of `link` are created. `link` must not exist.
pub fn create_relative_symlink(target: &Path, link: &Path) -> Result<()> {
    let relative = relative_target(target, link)?;
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    platform_symlink(&relative, target.is_dir(), link).map_err(|e| Error::io(link, e))?;
    tracing::debug!(link = %link.display(), target = %relative.display(), "created symlink");
    Ok(())
}

/// The path written into a link at `link` so that it resolves to `target`.
pub fn relative_target(target: &Path, link: &Path) -> Result<PathBuf> {
    let target_abs = absolute(target)?;
    let link_abs = absolute(link)?;
    let link_parent = link_abs.parent().ok_or_else(|| Error::InvalidPath {
        path: link.to_path_buf(),
        message: "link has no parent directory".into(),
    })?;

    NormalizedPath::new(&target_abs)
        .relative_to(&NormalizedPath::new(link_parent))
        .map(|p| p.to_native())
        .ok_or_else(|| Error::InvalidPath {
            path: target.to_path_buf(),
            message: format!("cannot be expressed relative to {}", link_parent.display()),
        })
}

/// Whether `path` itself is a symbolic link (dangling links included).
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Whether the link at `link` resolves to the same location as `target`.
pub fn points_to(link: &Path, target: &Path) -> bool {
    let Ok(dest) = fs::read_link(link) else {
        return false;
    };
    let resolved = match link.parent() {
        Some(parent) if dest.is_relative() => parent.join(dest),
        _ => dest,
    };
    match (dunce::canonicalize(&resolved), dunce::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether a failed link creation means the platform refuses symlinks,
/// as opposed to an ordinary I/O problem.
pub fn is_symlink_unsupported(err: &Error) -> bool {
    let Error::Io { source, .. } = err else {
        return false;
    };
    // ERROR_PRIVILEGE_NOT_HELD on Windows without developer mode
    matches!(
        source.kind(),
        std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::Unsupported
    ) || (cfg!(windows) && source.raw_os_error() == Some(1314))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::io(path, e))
}

#[cfg(unix)]
fn platform_symlink(target: &Path, _is_dir: bool, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn platform_symlink(target: &Path, is_dir: bool, link: &Path) -> std::io::Result<()> {
    use std::os::windows::fs as win_fs;
    if is_dir {
        win_fs::symlink_dir(target, link)
    } else {
        win_fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn platform_symlink(_target: &Path, _is_dir: bool, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
}
