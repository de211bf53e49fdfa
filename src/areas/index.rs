//! The staging area
//!
//! The index tracks which files go into the next commit. On disk it is a
//! single zlib-compressed text document with one record per tracked file:
//!
//! ```text
//! <mode> <sha> <stage> <path>
//! ```
//!
//! Records are sorted by path and the whole document is rewritten on every
//! update. There is no header and no trailing checksum; the document either
//! inflates to valid records or the index is rejected as corrupt.
//!
//! A repository without an index file simply has nothing staged, so loading
//! one behaves exactly like loading an empty document.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::Context;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug)]
pub struct Index {
    path: Box<Path>,
    entries: BTreeMap<Box<Path>, IndexEntry>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Load the index from disk, replacing any entries held in memory.
    ///
    /// A missing index file is not an error: the index is simply empty.
    /// A shared lock is held on the file while it is read.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut compressed = Vec::new();
        lock.deref_mut().read_to_end(&mut compressed)?;

        let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
        let mut document = String::new();
        decoder
            .read_to_string(&mut document)
            .context("The index file is corrupt and cannot be inflated")?;

        for record in document.lines() {
            let entry = IndexEntry::deserialize(Cursor::new(record.as_bytes()))?;
            self.entries
                .insert(entry.name.clone().into_boxed_path(), entry);
        }

        Ok(())
    }

    /// Replace every entry with the given set. The caller stages the whole
    /// workspace at once, so there is no per-path merge to do.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = IndexEntry>) {
        self.entries.clear();

        for entry in entries {
            self.entries
                .insert(entry.name.clone().into_boxed_path(), entry);
        }
    }

    /// Rewrite the index file from the in-memory entries.
    ///
    /// The document is rebuilt wholesale under an exclusive lock, so two
    /// writers cannot interleave records.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let records = self
            .entries
            .values()
            .map(|entry| {
                let record = entry.serialize()?;
                String::from_utf8(record.to_vec()).context("Index record is not valid UTF-8")
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let document = records.join("\n");

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(document.as_bytes())
            .context("Unable to compress the index document")?;
        let compressed = encoder
            .finish()
            .context("Unable to finish compressing the index document")?;

        lock.deref_mut().write_all(&compressed)?;

        Ok(())
    }
}
