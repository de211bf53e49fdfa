//! Object types and operations
//!
//! All tracked content is stored as objects identified by SHA-1 keys. There
//! are three types:
//!
//! - **Blob**: File content
//! - **Tree**: Directory listing (modes, kinds, object IDs and names)
//! - **Commit**: Snapshot with metadata (author, message, parent, tree)
//!
//! Objects serialize to plain text and are stored zlib-compressed. The key of
//! an object is the SHA-1 over its serialized text followed by the decimal
//! byte length of that text, so equal content always lands on the same key.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
