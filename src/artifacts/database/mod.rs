//! Database entry types
//!
//! This module contains types used when reading objects from the database.
//! Database entries pair an object ID with the mode recorded on its tree
//! entry line.

pub mod database_entry;
