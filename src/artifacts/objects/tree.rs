//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files
//! (blobs) and subdirectories (other trees), along with their names and
//! modes.
//!
//! ## Format
//!
//! One line per entry, sorted by name, with no trailing newline:
//!
//! ```text
//! <mode> <kind> <sha> <name>
//! ```
//!
//! where mode is `100644` for files and `040000` for directories, and kind is
//! `blob` or `tree`.
//!
//! ## Building
//!
//! `Tree` is the stored, readable form. `TreeBuilder` assembles the nested
//! structure from flat index entries and materializes `Tree` values bottom-up
//! so child keys are known before their parents are serialized.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

/// Tree object representing one directory level
///
/// Entries are kept sorted by name, which makes serialization deterministic:
/// the same set of files always produces the same tree key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    entries: BTreeMap<String, DatabaseEntry>,
}

impl Tree {
    pub fn new(entries: BTreeMap<String, DatabaseEntry>) -> Self {
        Tree { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.entries.into_iter()
    }

    pub fn get(&self, name: &str) -> Option<&DatabaseEntry> {
        self.entries.get(name)
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let lines = self
            .entries
            .iter()
            .map(|(name, entry)| {
                format!(
                    "{} {} {} {}",
                    entry.mode.as_str(),
                    entry.kind().as_str(),
                    entry.oid.as_ref(),
                    name
                )
            })
            .collect::<Vec<String>>();

        Ok(Bytes::from(lines.join("\n").into_bytes()))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut entries = BTreeMap::new();

        for line in content.lines() {
            let mut fields = line.splitn(4, ' ');

            let mode = fields
                .next()
                .context("Invalid tree object: missing mode field")?;
            let mode = EntryMode::try_from(mode)?;

            let kind = fields
                .next()
                .context("Invalid tree object: missing kind field")?;
            let kind = ObjectType::try_from(kind)?;

            let oid = fields
                .next()
                .context("Invalid tree object: missing object ID field")?;
            let oid = ObjectId::try_parse(oid.to_string())?;

            let name = fields
                .next()
                .context("Invalid tree object: missing name field")?;

            let expected_kind = if mode.is_directory() {
                ObjectType::Tree
            } else {
                ObjectType::Blob
            };
            anyhow::ensure!(
                kind == expected_kind,
                "Invalid tree object: kind {kind} does not match mode {mode}"
            );

            entries.insert(name.to_string(), DatabaseEntry::new(oid, mode));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, entry)| {
                format!(
                    "{} {} {} {}",
                    entry.mode.as_str(),
                    entry.kind().as_str(),
                    entry.oid.as_ref(),
                    name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Internal builder node
///
/// Can be:
/// - File: A blob reference taken from the index
/// - Directory: A nested builder
#[derive(Debug, Clone)]
enum BuilderEntry {
    File(IndexEntry),
    Directory(TreeBuilder),
}

/// Assembles the nested tree structure for a set of index entries
///
/// Index entries are flat paths; the builder splits them into one node per
/// directory level. Materializing a node resolves the keys of its child
/// directories first, so `traverse` can hand every level to the database
/// before the root key is computed.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    entries: BTreeMap<String, BuilderEntry>,
}

impl TreeBuilder {
    /// Build the nested structure from flat index entries
    ///
    /// # Arguments
    ///
    /// * `entries` - Iterator of index entries to include in the snapshot
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let parents = entry.parent_dirs()?;
            root.add_entry(parents, entry)?;
        }

        Ok(root)
    }

    /// Add an entry at the appropriate location, creating intermediate
    /// directory nodes as needed.
    fn add_entry(&mut self, parents: Vec<&Path>, entry: &IndexEntry) -> anyhow::Result<()> {
        if parents.is_empty() {
            self.entries.insert(
                entry.basename()?.to_string(),
                BuilderEntry::File(entry.clone()),
            );
        } else {
            let parent = parents[0]
                .file_name()
                .and_then(|s| s.to_str())
                .context("Invalid parent directory name")?;

            let node = self
                .entries
                .entry(parent.to_string())
                .or_insert_with(|| BuilderEntry::Directory(TreeBuilder::default()));
            let BuilderEntry::Directory(tree) = node else {
                anyhow::bail!("Path conflict: '{parent}' is both a file and a directory");
            };
            tree.add_entry(parents[1..].to_vec(), entry)?;
        }

        Ok(())
    }

    /// Materialize this node as a stored tree
    ///
    /// Child directories are materialized recursively so their keys can be
    /// embedded in this level's entry lines.
    pub fn to_tree(&self) -> anyhow::Result<Tree> {
        let mut entries = BTreeMap::new();

        for (name, node) in &self.entries {
            let record = match node {
                BuilderEntry::File(entry) => DatabaseEntry::new(entry.oid.clone(), entry.mode),
                BuilderEntry::Directory(builder) => {
                    DatabaseEntry::new(builder.object_id()?, EntryMode::Directory)
                }
            };
            entries.insert(name.clone(), record);
        }

        Ok(Tree::new(entries))
    }

    /// The key of the materialized tree for this node
    pub fn object_id(&self) -> anyhow::Result<ObjectId> {
        self.to_tree()?.object_id()
    }

    /// Traverse depth-first, calling a function on each materialized tree
    ///
    /// Visits children before parents (post-order), which is necessary for
    /// storing trees since child keys must exist before the parent refers to
    /// them.
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for node in self.entries.values() {
            if let BuilderEntry::Directory(builder) = node {
                builder.traverse(func)?;
            }
        }
        func(&self.to_tree()?)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn entry(path: &str, content: &[u8]) -> IndexEntry {
        IndexEntry::new(PathBuf::from(path), ObjectId::from_content(content))
    }

    #[test]
    fn serializes_one_sorted_line_per_entry() -> anyhow::Result<()> {
        let entries = [entry("b.txt", b"two"), entry("a.txt", b"one")];
        let tree = TreeBuilder::build(entries.iter())?.to_tree()?;
        let text = String::from_utf8(tree.serialize()?.to_vec())?;

        let expected = format!(
            "100644 blob {} a.txt\n100644 blob {} b.txt",
            ObjectId::from_content(b"one"),
            ObjectId::from_content(b"two"),
        );
        assert_eq!(text, expected);

        Ok(())
    }

    #[test]
    fn nested_entries_become_directory_lines() -> anyhow::Result<()> {
        let entries = [entry("a.txt", b"one"), entry("dir/b.txt", b"two")];
        let builder = TreeBuilder::build(entries.iter())?;
        let root = builder.to_tree()?;
        let text = String::from_utf8(root.serialize()?.to_vec())?;

        let subtree = TreeBuilder::build([entry("b.txt", b"two")].iter())?.to_tree()?;
        let expected = format!(
            "100644 blob {} a.txt\n040000 tree {} dir",
            ObjectId::from_content(b"one"),
            subtree.object_id()?,
        );
        assert_eq!(text, expected);

        Ok(())
    }

    #[test]
    fn traversal_visits_children_before_parents() -> anyhow::Result<()> {
        let entries = [entry("a/b/c.txt", b"three")];
        let builder = TreeBuilder::build(entries.iter())?;

        let visited = std::cell::RefCell::new(Vec::new());
        builder.traverse(&|tree: &Tree| {
            visited.borrow_mut().push(tree.display());
            Ok(())
        })?;

        let visited = visited.into_inner();
        assert_eq!(visited.len(), 3);
        // leaf-most level first, root last
        assert!(visited[0].contains("c.txt"));
        assert!(visited[2].contains(" a"));

        Ok(())
    }

    #[test]
    fn rejects_a_path_used_as_both_file_and_directory() {
        let entries = [entry("a", b"one"), entry("a/b.txt", b"two")];

        assert!(TreeBuilder::build(entries.iter()).is_err());
    }

    #[test]
    fn rejects_entry_kind_that_contradicts_mode() {
        let line = format!("100644 tree {} a.txt", ObjectId::from_content(b"x"));

        assert!(Tree::deserialize(Cursor::new(line.into_bytes())).is_err());
    }

    #[test]
    fn empty_tree_serializes_to_empty_text() -> anyhow::Result<()> {
        let tree = Tree::default();

        assert!(tree.serialize()?.is_empty());
        assert_eq!(Tree::deserialize(Cursor::new(Vec::new()))?, tree);

        Ok(())
    }

    proptest! {
        #[test]
        fn trees_round_trip_through_serialization(
            names in proptest::collection::btree_set("[a-zA-Z0-9][a-zA-Z0-9._ -]{0,19}", 1..8),
        ) {
            let entries = names
                .iter()
                .map(|name| entry(name, name.as_bytes()))
                .collect::<Vec<IndexEntry>>();
            let tree = TreeBuilder::build(entries.iter())
                .expect("flat entries never conflict")
                .to_tree()
                .expect("flat builders always materialize");

            let bytes = tree.serialize().expect("serializable tree");
            let parsed = Tree::deserialize(Cursor::new(bytes.to_vec())).expect("parsable tree");

            prop_assert_eq!(tree, parsed);
        }
    }
}
