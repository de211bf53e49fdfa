//! References: branches and HEAD
//!
//! A reference is a human-readable name for a commit. Branch refs live under
//! `refs/heads/` and hold a bare 40-character key. HEAD is special: it holds
//! either `ref: refs/heads/<branch>` (the attached state) or a bare key (the
//! detached state). Ref files carry no trailing newline.
//!
//! A branch ref file is only materialized by the first commit made on that
//! branch, so a freshly initialized repository has an "unborn" default
//! branch: HEAD names it but no ref file exists yet.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::collections::HashMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Branch a new repository starts on
pub const DEFAULT_BRANCH_NAME: &str = "main";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.vit`)
    path: Box<Path>,
}

/// Where HEAD currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD is a symbolic ref to a branch, which may not have a ref file yet
    Branch(BranchName),
    /// HEAD holds a commit key directly
    Detached(ObjectId),
}

impl Refs {
    /// Parse the HEAD file into its attached or detached state.
    pub fn head_state(&self) -> anyhow::Result<HeadState> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref_match {
            Some(symref_match) => {
                let sym_ref_name = SymRefName::new(symref_match[1].to_string());
                let branch_name = BranchName::try_parse_sym_ref_name(&sym_ref_name)?;
                Ok(HeadState::Branch(branch_name))
            }
            None => Ok(HeadState::Detached(ObjectId::try_parse(
                content.to_string(),
            )?)),
        }
    }

    /// The commit HEAD resolves to, or None while the current branch is
    /// still unborn.
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.head_state()? {
            HeadState::Branch(branch_name) => self.read_branch(&branch_name),
            HeadState::Detached(oid) => Ok(Some(oid)),
        }
    }

    /// Resolve a ref spelling to a commit key. `HEAD` follows the head
    /// chain; anything else is looked up under `refs/heads`.
    pub fn read_ref(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        if branch_name.as_ref() == HEAD_REF_NAME {
            return self.read_head();
        }

        self.read_branch(branch_name)
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(branch_name.as_ref());

        Self::read_ref_file(&branch_path)
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.heads_path().join(branch_name.as_ref()).is_file()
    }

    /// Advance the current ref to a new commit.
    ///
    /// On a branch this moves the branch ref file, creating it when the
    /// branch is unborn. Detached, HEAD itself moves.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.head_state()? {
            HeadState::Branch(branch_name) => {
                let branch_path = self
                    .heads_path()
                    .join(branch_name.as_ref())
                    .into_boxed_path();
                self.update_ref_file(branch_path, oid.to_string())
            }
            HeadState::Detached(_) => self.update_ref_file(self.head_path(), oid.to_string()),
        }
    }

    pub fn set_head_to_branch(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            self.head_path(),
            format!("ref: {}", branch_name.to_ref_path()),
        )
    }

    pub fn set_head_detached(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(self.head_path(), oid.to_string())
    }

    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    /// Group every ref by the commit it points at, for log decorations.
    pub fn reverse_refs(&self) -> anyhow::Result<HashMap<ObjectId, Vec<SymRefName>>> {
        Ok(self
            .list_all_refs()?
            .into_iter()
            .fold(HashMap::new(), |mut acc, sym_ref| {
                if let Ok(Some(oid)) = self.read_sym_ref(&sym_ref) {
                    acc.entry(oid).or_insert_with(Vec::new).push(sym_ref);
                }
                acc
            }))
    }

    fn read_sym_ref(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        if sym_ref_name.is_head() {
            return self.read_head();
        }

        let branch_name = BranchName::try_parse_sym_ref_name(sym_ref_name)?;
        self.read_branch(&branch_name)
    }

    fn list_all_refs(&self) -> anyhow::Result<Vec<SymRefName>> {
        Ok(self
            .list_refs(self.refs_path().as_ref())?
            .into_iter()
            .chain(std::iter::once(SymRefName::new(HEAD_REF_NAME.to_string())))
            .collect::<Vec<_>>())
    }

    fn list_refs(&self, path: &Path) -> anyhow::Result<Vec<SymRefName>> {
        Ok(WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                if entry.path().is_file() {
                    let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                    Some(SymRefName::new(relative_path.to_string_lossy().to_string()))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>())
    }

    fn read_ref_file(path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::proptest;
    use rstest::rstest;

    fn refs_at(dir: &TempDir) -> anyhow::Result<Refs> {
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        std::fs::create_dir_all(refs.heads_path())?;
        std::fs::write(dir.path().join("HEAD"), "ref: refs/heads/main")?;
        Ok(refs)
    }

    fn main_branch() -> BranchName {
        BranchName::try_parse(DEFAULT_BRANCH_NAME.to_string()).unwrap()
    }

    #[rstest]
    fn head_starts_attached_to_an_unborn_branch() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let refs = refs_at(&dir)?;

        assert_eq!(refs.head_state()?, HeadState::Branch(main_branch()));
        assert_eq!(refs.read_head()?, None);

        Ok(())
    }

    #[rstest]
    fn the_first_head_update_materializes_the_branch_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let refs = refs_at(&dir)?;
        let oid = ObjectId::from_content(b"first commit");

        refs.update_head(&oid)?;

        let on_disk = std::fs::read_to_string(dir.path().join("refs/heads/main"))?;
        assert_eq!(on_disk, oid.to_string());
        assert_eq!(refs.read_head()?, Some(oid));
        assert!(refs.branch_exists(&main_branch()));

        Ok(())
    }

    #[rstest]
    fn detaching_head_stores_the_key_in_head_itself() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let refs = refs_at(&dir)?;
        let branch_tip = ObjectId::from_content(b"tip");
        let detached_target = ObjectId::from_content(b"elsewhere");

        refs.update_head(&branch_tip)?;
        refs.set_head_detached(&detached_target)?;

        assert_eq!(
            refs.head_state()?,
            HeadState::Detached(detached_target.clone())
        );
        assert_eq!(refs.read_head()?, Some(detached_target));
        // the branch file is untouched by detaching
        assert_eq!(refs.read_branch(&main_branch())?, Some(branch_tip));

        Ok(())
    }

    #[rstest]
    fn a_detached_update_moves_head_not_the_branch() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let refs = refs_at(&dir)?;
        let branch_tip = ObjectId::from_content(b"tip");
        let next = ObjectId::from_content(b"next");

        refs.update_head(&branch_tip)?;
        refs.set_head_detached(&branch_tip)?;
        refs.update_head(&next)?;

        assert_eq!(refs.head_state()?, HeadState::Detached(next));
        assert_eq!(refs.read_branch(&main_branch())?, Some(branch_tip));

        Ok(())
    }

    #[rstest]
    fn reverse_refs_groups_head_and_branch_on_the_same_commit() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let refs = refs_at(&dir)?;
        let oid = ObjectId::from_content(b"shared tip");

        refs.update_head(&oid)?;

        let reverse = refs.reverse_refs()?;
        let mut names = reverse[&oid]
            .iter()
            .map(|sym_ref| sym_ref.as_ref_path().to_string())
            .collect::<Vec<_>>();
        names.sort();

        assert_eq!(names, vec!["HEAD", "refs/heads/main"]);

        Ok(())
    }

    proptest! {
        #[test]
        fn branch_names_survive_the_ref_path_round_trip(
            name in "[a-zA-Z0-9_-]{1,20}(/[a-zA-Z0-9_-]{1,20}){0,2}"
        ) {
            let branch_name = BranchName::try_parse(name.clone()).unwrap();
            let sym_ref = SymRefName::new(branch_name.to_ref_path());

            assert_eq!(BranchName::try_parse_sym_ref_name(&sym_ref).unwrap(), branch_name);
            assert_eq!(sym_ref.to_short_name(), name);
        }

        #[test]
        fn names_with_invalid_segments_never_become_refs(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            separator in r"(\.\.|@\{|\*|~|\^|:)"
        ) {
            let name = format!("{prefix}{separator}{suffix}");
            assert!(BranchName::try_parse(name).is_err());
        }
    }
}
