use crate::areas::refs::{HeadState, HEAD_REF_NAME};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::reconstruction::swap_working_tree;
use crate::artifacts::errors::VitError;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;

const DETACHMENT_NOTICE: &str = r#"You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and any commits you make in this state move HEAD
directly instead of a branch.

Positions visited in this state are recorded only in the HEAD log. To get
back onto a branch, switch to it again with:

  vit checkout -b <branch-name>
"#;

impl Repository {
    /// Move HEAD to a commit from the current history, detaching it.
    ///
    /// The target may be a full hash, a unique hash prefix, or a revision
    /// alias such as `HEAD` or `@`, and must be reachable from the current
    /// HEAD. The working tree and the index are rebuilt from the target
    /// commit's tree.
    pub fn checkout_commit(&self, target: &str) -> anyhow::Result<()> {
        let revision = Revision::try_parse(target)?;
        let target_oid = revision
            .resolve(self)?
            .ok_or_else(|| VitError::CommitNotFound(target.to_string()))?;

        let head_state = self.refs().head_state()?;

        if let HeadState::Detached(current_oid) = &head_state {
            if current_oid == &target_oid {
                self.print_head_position("HEAD is now at", &target_oid)?;
                return Ok(());
            }
        }

        let history = RevList::new(self, Revision::try_parse(HEAD_REF_NAME)?);
        if !history.contains(&target_oid)? {
            return Err(VitError::CommitNotFound(target.to_string()).into());
        }

        let commit = self.database().parse_commit(&target_oid)?;
        swap_working_tree(self, commit.tree_oid())?;
        self.refs().set_head_detached(&target_oid)?;

        match &head_state {
            HeadState::Detached(previous_oid) => {
                self.print_head_position("Previous HEAD position was", previous_oid)?;
            }
            HeadState::Branch(_) => {
                eprintln!("Note: switching to '{target}'.\n\n{DETACHMENT_NOTICE}");
            }
        }
        self.print_head_position("HEAD is now at", &target_oid)?;

        Ok(())
    }

    /// Switch HEAD to an existing branch, rebuilding the working tree from
    /// the branch's commit.
    pub fn checkout_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;

        if !self.refs().branch_exists(&branch_name) {
            return Err(VitError::BranchNotFound(name.to_string()).into());
        }

        if let HeadState::Branch(current_branch) = self.refs().head_state()? {
            if current_branch == branch_name {
                eprintln!("Already on '{name}'");
                return Ok(());
            }
        }

        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .with_context(|| format!("branch '{name}' does not point at a commit"))?;

        let commit = self.database().parse_commit(&target_oid)?;
        swap_working_tree(self, commit.tree_oid())?;
        self.refs().set_head_to_branch(&branch_name)?;

        eprintln!("Switched to branch '{name}'");

        Ok(())
    }

    fn print_head_position(&self, label: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self.database().parse_commit(oid)?;
        eprintln!("{} {} {}", label, oid.to_short_oid(), commit.short_message());

        Ok(())
    }
}
