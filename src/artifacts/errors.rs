//! Typed failure conditions surfaced by commands
//!
//! Commands return `anyhow::Result`, but the conditions a caller may want to
//! react to (or a test may want to assert on) are raised as `VitError` so they
//! stay downcastable and carry stable messages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitError {
    #[error("not a vit repository (or any of the parent directories): {}", .start.display())]
    RepositoryNotFound { start: std::path::PathBuf },

    #[error("object {oid} not found in the object database")]
    ObjectNotFound { oid: String },

    #[error("object {oid} is malformed and cannot be read")]
    ObjectCorrupt { oid: String },

    #[error("commit {0} is not part of the current history")]
    CommitNotFound(String),

    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    #[error("nothing staged to commit (the index is missing or empty)")]
    IndexMissing,
}
