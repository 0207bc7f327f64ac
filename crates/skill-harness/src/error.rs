//! Error types for skill-harness

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] skill_fs::Error),

    #[error("Unknown harness '{name}' (expected one of: {known})")]
    UnknownHarness { name: String, known: String },

    #[error("Unknown link mode '{value}' (expected 'symlink' or 'copy')")]
    UnknownMode { value: String },
}
