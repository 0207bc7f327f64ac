//! Error types for skill-core

use crate::status::SyncStatus;

/// Result type for skill-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skill-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Skill directory or lock entry missing where the operation needs it
    #[error("Skill '{id}' not found: {message}")]
    NotFound { id: String, message: String },

    /// Install target already present in the project
    #[error("Skill '{id}' already exists in the project (use --force to overwrite)")]
    AlreadyExists { id: String },

    /// The roots disagree in a way the operation will not settle on its own
    #[error("Skill '{id}' is {status}: {hint}")]
    Conflict {
        id: String,
        status: SyncStatus,
        hint: String,
    },

    /// Roots are in a shape the operation does not accept
    #[error("Skill '{id}' {message}")]
    InvalidState { id: String, message: String },

    #[error("Invalid skill id '{id}': expected 1-50 characters of [a-z0-9_-], not starting with '-'")]
    InvalidSkillId { id: String },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from skill-fs
    #[error(transparent)]
    Fs(#[from] skill_fs::Error),

    /// Harness error from skill-harness
    #[error(transparent)]
    Harness(#[from] skill_harness::Error),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Conflicts that need an explicit `resolve` (or a push before pulling)
    /// exit with 2. A push refused because the library moved on exits with 1
    /// like any other failure, since a plain `pull` settles it.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Conflict {
                status: SyncStatus::Behind,
                ..
            } => 1,
            Error::Conflict { .. } => 2,
            _ => 1,
        }
    }

    pub(crate) fn not_found(id: &str, message: impl Into<String>) -> Self {
        Error::NotFound {
            id: id.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn conflict(id: &str, status: SyncStatus, hint: impl Into<String>) -> Self {
        Error::Conflict {
            id: id.to_string(),
            status,
            hint: hint.into(),
        }
    }

    pub(crate) fn invalid_state(id: &str, message: impl Into<String>) -> Self {
        Error::InvalidState {
            id: id.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyncStatus::Diverged, 2)]
    #[case(SyncStatus::Ahead, 2)]
    #[case(SyncStatus::Behind, 1)]
    fn conflict_exit_codes(#[case] status: SyncStatus, #[case] expected: i32) {
        let error = Error::conflict("alpha", status, "hint");
        assert_eq!(error.exit_code(), expected);
    }

    #[test]
    fn other_errors_exit_with_one() {
        assert_eq!(Error::not_found("alpha", "missing").exit_code(), 1);
        assert_eq!(Error::Unsupported("merge".into()).exit_code(), 1);
    }

    #[test]
    fn conflict_message_names_status() {
        let error = Error::conflict("alpha", SyncStatus::Diverged, "resolve first");
        assert_eq!(error.to_string(), "Skill 'alpha' is diverged: resolve first");
    }
}
