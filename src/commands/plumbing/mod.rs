//! Plumbing commands (low-level object access)
//!
//! Plumbing commands talk to the object database directly. They are useful
//! for inspecting what the porcelain commands wrote and for scripting.
//!
//! ## Commands
//!
//! - `hash-object`: compute a file's object key and optionally store it
//! - `cat-file`: print the stored text of an object

pub mod cat_file;
pub mod hash_object;
