//! [`TestRoots`] builder for synchronization test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `files` (relative path, content) into `dir`, creating directories.
///
/// # Panics
/// Panics if any filesystem operation fails.
pub fn write_skill(dir: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(dir)
        .unwrap_or_else(|e| panic!("write_skill: failed to create {}: {e}", dir.display()));
    for (relative, content) in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_skill: failed to write {}: {e}", path.display()));
    }
}

/// A temporary directory holding a library root (`<tmp>/library`) and a
/// project checkout (`<tmp>/project`, whose root is `project/.skills`).
///
/// # Example
///
/// ```rust,no_run
/// use skill_test_utils::TestRoots;
///
/// let roots = TestRoots::new();
/// roots.write_library_skill("alpha", &[("SKILL.md", "# alpha\n")]);
/// roots.assert_exists("library/skills/alpha/SKILL.md");
/// ```
pub struct TestRoots {
    temp_dir: TempDir,
}

impl Default for TestRoots {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoots {
    /// Create the temporary directory with empty `library/` and `project/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("library")).unwrap();
        fs::create_dir_all(temp_dir.path().join("project")).unwrap();
        Self { temp_dir }
    }

    /// Root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn library_dir(&self) -> PathBuf {
        self.path().join("library")
    }

    /// The project checkout; harness directories live here.
    pub fn project_dir(&self) -> PathBuf {
        self.path().join("project")
    }

    /// The project's skill root, `project/.skills`.
    pub fn project_root(&self) -> PathBuf {
        self.project_dir().join(".skills")
    }

    pub fn library_skill_dir(&self, id: &str) -> PathBuf {
        self.library_dir().join("skills").join(id)
    }

    pub fn project_skill_dir(&self, id: &str) -> PathBuf {
        self.project_root().join("skills").join(id)
    }

    /// Write a skill directory into the library root (no lock entry).
    pub fn write_library_skill(&self, id: &str, files: &[(&str, &str)]) {
        write_skill(&self.library_skill_dir(id), files);
    }

    /// Write a skill directory into the project root (no lock entry).
    pub fn write_project_skill(&self, id: &str, files: &[(&str, &str)]) {
        write_skill(&self.project_skill_dir(id), files);
    }

    /// Read a file from a project skill.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_project_file(&self, id: &str, relative: &str) -> String {
        let path = self.project_skill_dir(id).join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Read a file from a library skill.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_library_file(&self, id: &str, relative: &str) -> String {
        let path = self.library_skill_dir(id).join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that `path` (relative to the temporary root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, path: &str) {
        let full_path = self.path().join(path);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the temporary root) does **not**
    /// exist, dangling links included.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, path: &str) {
        let full_path = self.path().join(path);
        assert!(
            fs::symlink_metadata(&full_path).is_err(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }
}
