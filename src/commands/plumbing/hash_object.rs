use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Compute the object key for a file's content and print it.
    ///
    /// With `write` set, the blob is also stored in the object database.
    pub fn hash_object(&self, object_path: &str, write: bool) -> anyhow::Result<()> {
        let object = self.workspace().parse_blob(Path::new(object_path))?;
        let object_id = object.object_id()?;

        write!(self.writer(), "{object_id}")?;

        if write {
            self.database().store(&object)?;
        }

        Ok(())
    }
}
