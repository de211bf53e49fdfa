use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::ref_log::RefLog;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::errors::VitError;
use std::cell::{Ref, RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Name of the metadata directory holding every area but the working tree
pub const VIT_DIR: &str = ".vit";

/// Handle over one repository: the working tree plus the areas stored under
/// its metadata directory. Every command runs against a `Repository`; there
/// is no global state.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    ref_log: RefLog,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open the repository rooted exactly at `path`, creating the directory
    /// if needed. This is the entry point for `init`; every other command
    /// goes through [`Repository::discover`].
    pub fn open(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        Ok(Self::from_root(path, writer))
    }

    /// Find the repository containing `start` by walking up the directory
    /// tree until a metadata directory appears.
    pub fn discover(start: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let start = Path::new(start).canonicalize()?;

        let root = start
            .ancestors()
            .find(|candidate| candidate.join(VIT_DIR).is_dir())
            .ok_or_else(|| VitError::RepositoryNotFound {
                start: start.clone(),
            })?;

        Ok(Self::from_root(root.to_path_buf(), writer))
    }

    fn from_root(path: PathBuf, writer: Box<dyn std::io::Write>) -> Self {
        let vit_path = path.join(VIT_DIR);

        let index = Index::new(vit_path.join("index").into_boxed_path());
        let database = Database::new(vit_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(vit_path.clone().into_boxed_path());
        let ref_log = RefLog::new(vit_path.join("logs").into_boxed_path());

        Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
            ref_log,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn vit_path(&self) -> Box<Path> {
        self.path.join(VIT_DIR).into_boxed_path()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> Ref<'_, Index> {
        self.index.borrow()
    }

    pub fn index_mut(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn ref_log(&self) -> &RefLog {
        &self.ref_log
    }
}
