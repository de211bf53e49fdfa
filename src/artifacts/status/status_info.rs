use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::inspector::Inspector;
use bitflags::bitflags;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub type ChangeSet = BTreeMap<PathBuf, FileChangeType>;
pub type FileSet = BTreeSet<PathBuf>;
pub type HeadTree = BTreeMap<PathBuf, DatabaseEntry>;

bitflags! {
    /// Which kinds of differences a status run found.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const HAS_STAGED = 0b001;
        const HAS_UNSTAGED = 0b010;
        const HAS_UNTRACKED = 0b100;
    }
}

/// Everything one status run learned, split per area so callers can render
/// sections independently.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub(crate) untracked_files: FileSet,
    pub(crate) changed_files: BTreeMap<PathBuf, FileChange>,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) index_changeset: ChangeSet,
}

impl StatusInfo {
    pub fn flags(&self) -> StatusFlags {
        let mut flags = StatusFlags::empty();

        if !self.index_changeset.is_empty() {
            flags |= StatusFlags::HAS_STAGED;
        }
        if !self.workspace_changeset.is_empty() {
            flags |= StatusFlags::HAS_UNSTAGED;
        }
        if !self.untracked_files.is_empty() {
            flags |= StatusFlags::HAS_UNTRACKED;
        }

        flags
    }

    pub fn is_clean(&self) -> bool {
        self.flags().is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    /// Reconcile the three areas: working tree vs index (unstaged), index
    /// vs HEAD tree (staged), and files the index has never seen
    /// (untracked).
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let inspector = Inspector::new(self.repository);

        let untracked_files = self.scan_workspace(index)?;
        let head_tree = self.load_head_tree()?;

        let mut changed_files = self.check_index_entries(&head_tree, index, &inspector)?;
        self.collect_deleted_head_files(&head_tree, index, &mut changed_files);

        let workspace_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Workspace(change.workspace_change.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();
        let index_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Index(change.index_change.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();

        Ok(StatusInfo {
            untracked_files,
            changed_files,
            workspace_changeset,
            index_changeset,
        })
    }

    fn scan_workspace(&self, index: &Index) -> anyhow::Result<FileSet> {
        let mut untracked_files = BTreeSet::new();

        for path in self.repository.workspace().list_files()? {
            if !index.is_tracked(&path) {
                untracked_files.insert(path);
            }
        }

        Ok(untracked_files)
    }

    fn load_head_tree(&self) -> anyhow::Result<HeadTree> {
        let mut head_tree = BTreeMap::new();

        // an unborn branch has no HEAD tree, so everything staged is new
        if let Some(head_oid) = self.repository.refs().read_head()? {
            let commit = self.repository.database().parse_commit(&head_oid)?;
            self.repository.database().load_flat_tree(
                commit.tree_oid(),
                Path::new(""),
                &mut head_tree,
            )?;
        }

        Ok(head_tree)
    }

    fn check_index_entries(
        &self,
        head_tree: &HeadTree,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<BTreeMap<PathBuf, FileChange>> {
        let mut changed_files = BTreeMap::<PathBuf, FileChange>::new();

        for entry in index.entries() {
            let file_exists = self.repository.workspace().file_exists(&entry.name);
            let workspace_status = inspector.check_index_against_workspace(entry, file_exists)?;
            if workspace_status != WorkspaceChangeType::None {
                changed_files
                    .entry(entry.name.clone())
                    .or_default()
                    .workspace_change = workspace_status;
            }

            let index_status =
                inspector.check_index_against_head_tree(entry, head_tree.get(&entry.name));
            if index_status != IndexChangeType::None {
                changed_files
                    .entry(entry.name.clone())
                    .or_default()
                    .index_change = index_status;
            }
        }

        Ok(changed_files)
    }

    fn collect_deleted_head_files(
        &self,
        head_tree: &HeadTree,
        index: &Index,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        head_tree.iter().for_each(|(path, _)| {
            if !index.is_tracked(path) {
                changed_files.entry(path.clone()).or_default().index_change =
                    IndexChangeType::Deleted;
            }
        });
    }
}
