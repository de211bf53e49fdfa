//! Command implementations
//!
//! Every command is an `impl Repository` block, split into two categories:
//!
//! - `plumbing`: low-level object access (hash-object, cat-file)
//! - `porcelain`: user-facing workflows (init, add, commit, status, diff, log,
//!   checkout)
//!
//! Plumbing commands expose the object store directly, while porcelain
//! commands compose the staging, reference and history machinery on top of it.

pub mod plumbing;
pub mod porcelain;
