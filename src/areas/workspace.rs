use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".vit", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        Ok(Blob::new(data))
    }

    // TODO: refactor to use iterator
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(WalkDir::new(self.path.as_ref())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
            .collect::<Vec<_>>())
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<PathBuf> {
        if !path.is_file() {
            return None;
        }

        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        if Self::is_ignored(relative) {
            None
        } else {
            Some(relative.to_path_buf())
        }
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<String> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content)
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    /// Swap the working tree for the contents of a fully staged directory.
    ///
    /// Everything except the metadata directory is deleted first, then the
    /// staged entries are moved into place. The staging directory must live
    /// on the same filesystem so entries can be renamed instead of copied.
    pub fn replace_with(&self, staging_dir: &Path) -> anyhow::Result<()> {
        self.clear()?;

        for entry in std::fs::read_dir(staging_dir)? {
            let entry = entry?;
            let target = self.path.join(entry.file_name());

            std::fs::rename(entry.path(), &target)
                .with_context(|| format!("Failed to move staged entry into place: {:?}", target))?;
        }
        std::fs::remove_dir_all(staging_dir)?;

        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        for entry in std::fs::read_dir(self.path.as_ref())? {
            let entry = entry?;
            let name = entry.file_name();

            if IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()) {
                continue;
            }

            let path = entry.path();
            if entry.file_type()?.is_dir() {
                std::fs::remove_dir_all(&path)
                    .with_context(|| format!("Failed to remove directory: {:?}", path))?;
            } else {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove file: {:?}", path))?;
            }
        }

        Ok(())
    }
}
