use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::errors::VitError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

// TODO: implement packfiles for better performance and storage efficiency
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<()> {
        let object_path = self.path.join(object.object_path()?);

        // a key already on disk holds the same content, so storing is idempotent
        if !object_path.exists() {
            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(())
    }

    /// Load the decompressed text of an object.
    ///
    /// A missing file maps to [`VitError::ObjectNotFound`]; a file that does
    /// not inflate to UTF-8 text maps to [`VitError::ObjectCorrupt`].
    pub fn load_text(&self, object_id: &ObjectId) -> anyhow::Result<String> {
        let object_path = self.path.join(object_id.to_path());

        let raw = match std::fs::read(&object_path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(VitError::ObjectNotFound {
                    oid: object_id.to_string(),
                }
                .into());
            }
            Err(source) => {
                return Err(source).context(format!(
                    "Unable to read object file {}",
                    object_path.display()
                ));
            }
        };

        let content = Self::decompress(raw.into()).map_err(|_| VitError::ObjectCorrupt {
            oid: object_id.to_string(),
        })?;

        String::from_utf8(content.to_vec()).map_err(|_| {
            VitError::ObjectCorrupt {
                oid: object_id.to_string(),
            }
            .into()
        })
    }

    pub fn parse_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        Blob::deserialize(self.object_reader(object_id)?)
    }

    pub fn parse_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        Tree::deserialize(self.object_reader(object_id)?)
    }

    pub fn parse_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        Commit::deserialize(self.object_reader(object_id)?)
    }

    /// Flatten the tree rooted at `tree_oid` into `entries`, keyed by the
    /// full path of each file relative to the workspace root.
    pub fn load_flat_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        entries: &mut BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<()> {
        let tree = self.parse_tree(tree_oid)?;

        for (name, entry) in tree.entries() {
            let entry_path = prefix.join(name);

            if entry.is_tree() {
                self.load_flat_tree(&entry.oid, &entry_path, entries)?;
            } else {
                entries.insert(entry_path, entry.clone());
            }
        }

        Ok(())
    }

    /// Find every object key that starts with the given hex prefix.
    ///
    /// The object directory is flat, so a single scan of its file names is
    /// enough; the bookkeeping subdirectories and in-flight temp files are
    /// skipped because they never parse as keys.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();

        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            let file_name_str = file_name.to_string_lossy();

            if file_name_str.starts_with(prefix) {
                if let Ok(oid) = ObjectId::try_parse(file_name_str.to_string()) {
                    matches.push(oid);
                }
            }
        }

        Ok(matches)
    }

    fn object_reader(&self, object_id: &ObjectId) -> anyhow::Result<Cursor<Bytes>> {
        let text = self.load_text(object_id)?;

        Ok(Cursor::new(Bytes::from(text)))
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename into place so a reader never observes a partially written object
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().to_path_buf().into_boxed_path())
    }

    #[rstest]
    fn stores_and_reloads_a_blob_under_its_key() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let database = database(&dir);
        let blob = Blob::new("hello database".to_string());

        database.store(&blob)?;

        let oid = blob.object_id()?;
        assert!(dir.path().join(oid.to_path()).is_file());
        assert_eq!(database.parse_blob(&oid)?, blob);

        Ok(())
    }

    #[rstest]
    fn object_files_hold_compressed_bytes_not_plain_text() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let database = database(&dir);
        let blob = Blob::new("compress me".to_string());

        database.store(&blob)?;

        let raw = std::fs::read(dir.path().join(blob.object_id()?.to_path()))?;
        assert_ne!(raw, b"compress me");
        assert_eq!(database.load_text(&blob.object_id()?)?, "compress me");

        Ok(())
    }

    #[rstest]
    fn missing_objects_surface_a_not_found_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let database = database(&dir);
        let oid = ObjectId::zero();

        let error = database.load_text(&oid).unwrap_err();

        match error.downcast_ref::<VitError>() {
            Some(VitError::ObjectNotFound { oid: missing }) => {
                assert_eq!(missing, &oid.to_string());
            }
            other => panic!("expected ObjectNotFound, got {:?}", other),
        }

        Ok(())
    }

    #[rstest]
    fn garbage_object_files_surface_a_corrupt_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let database = database(&dir);
        let oid = ObjectId::zero();

        std::fs::write(dir.path().join(oid.to_path()), b"not zlib at all")?;

        let error = database.load_text(&oid).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<VitError>(),
            Some(VitError::ObjectCorrupt { .. })
        ));

        Ok(())
    }

    #[rstest]
    fn prefix_search_skips_directories_and_temp_files() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let database = database(&dir);
        let blob = Blob::new("findable".to_string());
        database.store(&blob)?;

        std::fs::create_dir_all(dir.path().join("pack"))?;
        std::fs::create_dir_all(dir.path().join("info"))?;
        std::fs::write(dir.path().join("tmp-obj-1234"), b"leftover")?;

        let oid = blob.object_id()?;
        let matches = database.find_objects_by_prefix(&oid.to_short_oid())?;

        assert_eq!(matches, vec![oid]);

        Ok(())
    }
}
