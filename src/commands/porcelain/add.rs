use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;

impl Repository {
    /// Stage every file in the working tree.
    ///
    /// Each file is stored as a blob and the index is replaced wholesale
    /// with the resulting entries, so files deleted from the working tree
    /// drop out of the index on the next add.
    pub fn add(&self) -> anyhow::Result<()> {
        let mut entries = Vec::new();

        for path in self.workspace().list_files()? {
            let blob = self.workspace().parse_blob(&path)?;
            let blob_oid = blob.object_id()?;

            self.database().store(&blob)?;
            entries.push(IndexEntry::new(path, blob_oid));
        }

        let mut index = self.index_mut();
        index.replace_all(entries);
        index.write_updates()?;

        Ok(())
    }
}
