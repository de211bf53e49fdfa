//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands provide the high-level interface for the version
//! control workflow. Each one drives the staging area, the object database
//! and the reference layer through the `Repository` handle.
//!
//! ## Commands
//!
//! - `init`: initialize a new repository
//! - `add`: stage the working tree
//! - `commit`: record the staged tree as a new commit
//! - `status`: show staged and unstaged changes
//! - `diff`: show unstaged content changes
//! - `log`: show commit history
//! - `checkout`: move HEAD to a branch or a past commit

pub mod add;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod status;
