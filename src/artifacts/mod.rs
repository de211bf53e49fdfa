//! Data structures and algorithms
//!
//! This module contains the core vit types and algorithms:
//!
//! - `branch`: Branch names and revision parsing
//! - `checkout`: Working tree reconstruction for checkout
//! - `core`: Shared utilities (pager wrapper, etc.)
//! - `database`: Database entry types
//! - `diff`: Line diffing (LCS table)
//! - `errors`: Typed failure conditions surfaced by commands
//! - `index`: Index/staging area data structures
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, tree, commit)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod database;
pub mod diff;
pub mod errors;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;
