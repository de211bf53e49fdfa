use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, new)]
pub struct DatabaseEntry {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

impl DatabaseEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_directory()
    }

    /// The object kind implied by the mode
    pub fn kind(&self) -> ObjectType {
        if self.is_tree() {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        }
    }
}
