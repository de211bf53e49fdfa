//! Index file format
//!
//! The index (also called staging area) stores the set of files that will be
//! included in the next commit.
//!
//! ## File Format
//!
//! The index is a zlib-compressed text document. Each tracked file
//! contributes one record line:
//!
//! ```text
//! <mode> <sha> <stage> <path>
//! ```
//!
//! Records are sorted by path and joined with newlines, without a trailing
//! newline. There is no header and no checksum; the whole file is rewritten
//! on every staging operation.

pub mod entry_mode;
pub mod index_entry;
