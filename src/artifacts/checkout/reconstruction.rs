//! Working tree reconstruction
//!
//! Checkout rebuilds the whole working tree from a commit's tree object
//! instead of patching files in place. The tree is first materialized into a
//! staging directory inside the metadata directory, and only once every blob
//! has been written does the swap touch the real working tree. An error
//! half-way through leaves the working tree exactly as it was.

use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use fake::rand;
use std::collections::BTreeMap;
use std::path::Path;

/// Macro for debug logging that is enabled with the debug_checkout feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Materializing {}", path.display());
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "debug_checkout"))]
        {
            eprintln!($($arg)*);
        }
    };
}

/// Writes the files of a stored tree into a target directory.
#[derive(new)]
pub struct Reconstruction<'r> {
    database: &'r Database,
}

impl Reconstruction<'_> {
    /// Recursively materialize `tree_oid` under `target_dir`, which must
    /// already exist.
    pub fn materialize(&self, tree_oid: &ObjectId, target_dir: &Path) -> anyhow::Result<()> {
        let tree = self.database.parse_tree(tree_oid)?;

        for (name, entry) in tree.entries() {
            let entry_path = target_dir.join(name);
            debug_log!("materializing {:?} from {}", entry_path, entry.oid);

            if entry.is_tree() {
                std::fs::create_dir(&entry_path)
                    .with_context(|| format!("Failed to create directory {:?}", entry_path))?;
                self.materialize(&entry.oid, &entry_path)?;
            } else {
                let blob = self.database.parse_blob(&entry.oid)?;
                std::fs::write(&entry_path, blob.content())
                    .with_context(|| format!("Failed to write file {:?}", entry_path))?;
            }
        }

        Ok(())
    }
}

/// Replace the working tree and the index with the content of `tree_oid`.
///
/// The tree is staged under the metadata directory first, so a failed
/// reconstruction never leaves a half-populated working tree behind.
pub fn swap_working_tree(repository: &Repository, tree_oid: &ObjectId) -> anyhow::Result<()> {
    let staging_dir = repository
        .vit_path()
        .join(format!("checkout-tmp-{}", rand::random::<u32>()));
    std::fs::create_dir_all(&staging_dir)
        .with_context(|| format!("Failed to create staging directory {:?}", staging_dir))?;
    debug_log!("staging checkout of {} under {:?}", tree_oid, staging_dir);

    let reconstruction = Reconstruction::new(repository.database());
    if let Err(error) = reconstruction.materialize(tree_oid, &staging_dir) {
        // the real working tree has not been touched yet
        let _ = std::fs::remove_dir_all(&staging_dir);
        return Err(error);
    }

    repository.workspace().replace_with(&staging_dir)?;

    let mut flat_entries = BTreeMap::new();
    repository
        .database()
        .load_flat_tree(tree_oid, Path::new(""), &mut flat_entries)?;

    let mut index = repository.index_mut();
    index.replace_all(
        flat_entries
            .into_iter()
            .map(|(path, entry)| IndexEntry::new(path, entry.oid)),
    );
    index.write_updates()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::database::database_entry::DatabaseEntry;
    use crate::artifacts::index::entry_mode::EntryMode;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::object::Object;
    use crate::artifacts::objects::tree::Tree;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn store_blob(database: &Database, content: &str) -> anyhow::Result<ObjectId> {
        let blob = Blob::new(content.to_string());
        database.store(&blob)?;
        blob.object_id()
    }

    #[rstest]
    fn materializes_nested_trees_with_original_content() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let objects = dir.path().join("objects");
        std::fs::create_dir_all(&objects)?;
        let database = Database::new(objects.into_boxed_path());

        let inner_oid = store_blob(&database, "three")?;
        let subtree = Tree::new(BTreeMap::from([(
            "3.txt".to_string(),
            DatabaseEntry::new(inner_oid, EntryMode::Regular),
        )]));
        database.store(&subtree)?;

        let root_oid = store_blob(&database, "one")?;
        let root_tree = Tree::new(BTreeMap::from([
            (
                "1.txt".to_string(),
                DatabaseEntry::new(root_oid, EntryMode::Regular),
            ),
            (
                "sub".to_string(),
                DatabaseEntry::new(subtree.object_id()?, EntryMode::Directory),
            ),
        ]));
        database.store(&root_tree)?;

        let target = dir.path().join("target");
        std::fs::create_dir_all(&target)?;
        Reconstruction::new(&database).materialize(&root_tree.object_id()?, &target)?;

        assert_eq!(std::fs::read_to_string(target.join("1.txt"))?, "one");
        assert_eq!(std::fs::read_to_string(target.join("sub/3.txt"))?, "three");

        Ok(())
    }

    #[rstest]
    fn a_missing_blob_aborts_materialization() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let objects = dir.path().join("objects");
        std::fs::create_dir_all(&objects)?;
        let database = Database::new(objects.into_boxed_path());

        let tree = Tree::new(BTreeMap::from([(
            "ghost.txt".to_string(),
            DatabaseEntry::new(ObjectId::zero(), EntryMode::Regular),
        )]));
        database.store(&tree)?;

        let target = dir.path().join("target");
        std::fs::create_dir_all(&target)?;

        let result = Reconstruction::new(&database).materialize(&tree.object_id()?, &target);
        assert!(result.is_err());

        Ok(())
    }
}
