//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path relative to the repository root
//! - Content hash (object ID)
//! - Entry mode and merge stage
//!
//! ## Record Format
//!
//! Entries are stored as text records, one per line:
//!
//! ```text
//! <mode> <sha> <stage> <path>
//! ```
//!
//! The stage field is always 0; it is kept in the record so the format has
//! room for merge states without a version bump.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Index entry representing a tracked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub name: PathBuf,
    /// SHA-1 key of the file content
    pub oid: ObjectId,
    /// Entry mode (always a regular file for staged entries)
    pub mode: EntryMode,
    /// Merge stage (always 0)
    pub stage: u8,
}

impl IndexEntry {
    pub fn new(name: PathBuf, oid: ObjectId) -> Self {
        IndexEntry {
            name,
            oid,
            mode: EntryMode::Regular,
            stage: 0,
        }
    }

    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name"))
    }

    pub fn parent_dirs(&self) -> anyhow::Result<Vec<&Path>> {
        let mut dirs = Vec::new();
        let mut parent = self.name.parent();

        while let Some(new_parent) = parent {
            dirs.push(new_parent);
            parent = new_parent.parent();
        }
        dirs.reverse();

        // the first element is the empty root path
        Ok(dirs.get(1..).unwrap_or(&[]).to_vec())
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let name = self
            .name
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid entry name"))?;
        let record = format!(
            "{} {} {} {}",
            self.mode.as_str(),
            self.oid.as_ref(),
            self.stage,
            name
        );

        Ok(Bytes::from(record.into_bytes()))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let record = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let record = String::from_utf8(record)?;

        let mut fields = record.splitn(4, ' ');

        let mode = fields
            .next()
            .context("Invalid index record: missing mode field")?;
        let mode = EntryMode::try_from(mode)?;

        let oid = fields
            .next()
            .context("Invalid index record: missing object ID field")?;
        let oid = ObjectId::try_parse(oid.to_string())?;

        let stage = fields
            .next()
            .context("Invalid index record: missing stage field")?
            .parse::<u8>()
            .context("Invalid index record: malformed stage field")?;

        let name = fields
            .next()
            .context("Invalid index record: missing path field")?;

        Ok(IndexEntry {
            name: PathBuf::from(name),
            oid,
            mode,
            stage,
        })
    }
}
