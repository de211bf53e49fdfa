use crate::areas::refs::{HeadState, HEAD_REF_NAME};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::SymRefName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::collections::HashMap;
use std::io::Write;

impl Repository {
    /// Print the commit history from HEAD down to the root commit, newest
    /// first, one medium-format block per commit.
    pub fn log(&self) -> anyhow::Result<()> {
        if self.refs().read_head()?.is_none() {
            let position = match self.refs().head_state()? {
                HeadState::Branch(branch_name) => format!("branch '{branch_name}'"),
                HeadState::Detached(_) => HEAD_REF_NAME.to_string(),
            };
            anyhow::bail!("the current {position} does not have any commits yet");
        }

        let reverse_refs = self.refs().reverse_refs()?;
        let head_state = self.refs().head_state()?;

        let rev_list = RevList::new(self, Revision::try_parse(HEAD_REF_NAME)?);
        for (commit_oid, commit) in rev_list.into_iter()? {
            self.show_commit_medium(&commit_oid, &commit, &reverse_refs, &head_state)?;
        }

        Ok(())
    }

    fn show_commit_medium(
        &self,
        commit_oid: &ObjectId,
        commit: &Commit,
        reverse_refs: &HashMap<ObjectId, Vec<SymRefName>>,
        head_state: &HeadState,
    ) -> anyhow::Result<()> {
        let decoration = Self::commit_decoration(commit_oid, reverse_refs, head_state);

        writeln!(
            self.writer(),
            "{}{}",
            format!("commit {commit_oid}").yellow(),
            decoration
        )?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;

        for line in commit.message().lines() {
            writeln!(self.writer(), "    {line}")?;
        }
        writeln!(self.writer())?;

        Ok(())
    }

    /// Render the ` (HEAD -> branch)` / ` (branch)` / ` (HEAD)` suffix for a
    /// commit that refs point at.
    fn commit_decoration(
        commit_oid: &ObjectId,
        reverse_refs: &HashMap<ObjectId, Vec<SymRefName>>,
        head_state: &HeadState,
    ) -> String {
        let Some(ref_names) = reverse_refs.get(commit_oid) else {
            return String::new();
        };

        let (head_refs, branch_refs): (Vec<&SymRefName>, Vec<&SymRefName>) =
            ref_names.iter().partition(|name| name.is_head());

        let attached_branch = match head_state {
            HeadState::Branch(branch_name) => Some(branch_name.as_ref()),
            HeadState::Detached(_) => None,
        };

        let mut decorations = Vec::new();

        if let Some(head) = head_refs.first() {
            let decoration = match attached_branch {
                // HEAD and the branch it points at render as one arrow
                Some(branch) => {
                    let branch_text = branch.green().bold();
                    head.to_colored_name(format!("{} -> {}", head.to_short_name(), branch_text))
                }
                None => head.to_colored_name(head.to_short_name().to_string()),
            };
            decorations.push(decoration.to_string());
        }

        for branch in branch_refs {
            if attached_branch == Some(branch.to_short_name()) {
                continue;
            }
            decorations.push(
                branch
                    .to_colored_name(branch.to_short_name().to_string())
                    .to_string(),
            );
        }

        if decorations.is_empty() {
            String::new()
        } else {
            format!(" ({})", decorations.join(", "))
        }
    }
}
