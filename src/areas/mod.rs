//! On-disk areas of a repository
//!
//! This module contains the storage surfaces a repository is made of:
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area tracking the next tree to commit
//! - `ref_log`: Append-only history of reference updates
//! - `refs`: Reference management (branches and HEAD)
//! - `repository`: High-level repository handle tying the areas together
//! - `workspace`: Working directory file system operations

pub(crate) mod database;
pub(crate) mod index;
pub(crate) mod ref_log;
pub(crate) mod refs;
pub mod repository;
pub(crate) mod workspace;
