//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static SKILL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_][a-z0-9_-]{0,49}$").expect("skill id pattern is valid")
});

/// Whether `name` is usable as a skill id and therefore as a single path
/// segment under `skills/`.
///
/// Ids are 1-50 characters of lowercase ASCII letters, digits, `_` and `-`,
/// and may not start with `-`.
pub fn is_valid_skill_id(name: &str) -> bool {
    SKILL_ID.is_match(name)
}

/// A path normalized to use forward slashes internally.
///
/// Hash inputs and symlink targets are built from this representation so
/// they do not depend on the platform's separator convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Get the extension of the last component, if present.
    pub fn extension(&self) -> Option<&str> {
        let name = self.inner.trim_end_matches('/').rsplit('/').next()?;
        let idx = name.rfind('.')?;
        if idx == 0 { None } else { Some(&name[idx + 1..]) }
    }

    /// Whether the path is anchored at a filesystem root or drive.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/') || self.inner.as_bytes().get(1) == Some(&b':')
    }

    fn drive(&self) -> Option<String> {
        match self.inner.as_bytes() {
            [letter, b':', ..] => Some((*letter as char).to_ascii_uppercase().to_string()),
            _ => None,
        }
    }

    /// Express `self` relative to the directory `base`.
    ///
    /// Both paths must be absolute or both relative. Returns `None` when
    /// they are rooted differently (e.g. different Windows drives).
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<NormalizedPath> {
        if self.is_absolute() != base.is_absolute() {
            return None;
        }

        let target: Vec<&str> = components(&self.inner);
        let from: Vec<&str> = components(&base.inner);
        if self.drive() != base.drive() {
            return None;
        }

        let common = target
            .iter()
            .zip(from.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = std::iter::repeat_n("..", from.len() - common).collect();
        parts.extend(&target[common..]);

        let inner = if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        };
        Some(Self { inner })
    }
}

fn components(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
