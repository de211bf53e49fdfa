use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use derive_new::new;

/// Compares one staged entry against the working tree and the HEAD tree.
///
/// All comparisons go through content keys; nothing is cached between runs,
/// so a touched-but-unchanged file still reads as clean.
#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl Inspector<'_> {
    /// Whether the working file's content hashes to a different key than
    /// the one staged for it. The content is hashed in memory, never stored.
    pub fn is_content_changed(&self, index_entry: &IndexEntry) -> anyhow::Result<bool> {
        let blob = self.repository.workspace().parse_blob(&index_entry.name)?;
        let oid = blob.object_id()?;

        Ok(oid != index_entry.oid)
    }

    pub fn check_index_against_workspace(
        &self,
        index_entry: &IndexEntry,
        file_exists: bool,
    ) -> anyhow::Result<WorkspaceChangeType> {
        if !file_exists {
            return Ok(WorkspaceChangeType::Deleted);
        }

        if self.is_content_changed(index_entry)? {
            Ok(WorkspaceChangeType::Modified)
        } else {
            Ok(WorkspaceChangeType::None)
        }
    }

    pub fn check_index_against_head_tree(
        &self,
        index_entry: &IndexEntry,
        head_entry: Option<&DatabaseEntry>,
    ) -> IndexChangeType {
        match head_entry {
            Some(head_entry) if head_entry.oid != index_entry.oid => IndexChangeType::Modified,
            Some(_) => IndexChangeType::None,
            None => IndexChangeType::Added,
        }
    }
}
