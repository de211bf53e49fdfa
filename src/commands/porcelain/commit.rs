use crate::areas::ref_log::LogRecord;
use crate::areas::repository::Repository;
use crate::artifacts::errors::VitError;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::{Tree, TreeBuilder};
use std::io::Write;

impl Repository {
    /// Record the staged index as a new commit on the current branch.
    ///
    /// The index is the single source of truth for the commit content: the
    /// working tree is never consulted. Trees are stored bottom-up before
    /// the commit object, and the ref and log updates happen only after
    /// every object write succeeded.
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index_mut();
        index.rehydrate()?;

        if index.is_empty() {
            return Err(VitError::IndexMissing.into());
        }

        let tree_builder = TreeBuilder::build(index.entries())?;
        let store_tree = &|tree: &Tree| self.database().store(tree);
        tree_builder.traverse(store_tree)?;
        let tree_oid = tree_builder.object_id()?;

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let author = Author::load_from_env();
        let commit = Commit::new(parent, tree_oid, author, message.trim().to_string());
        let commit_oid = commit.object_id()?;
        self.database().store(&commit)?;

        // resolved before the ref moves, so the log lands in the branch log
        // HEAD pointed at when the commit started
        let head_state = self.refs().head_state()?;
        self.refs().update_head(&commit_oid)?;

        let record = LogRecord::new(commit.parent(), &commit_oid, commit.author(), commit.message());
        self.ref_log().append(&record, &head_state)?;

        write!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
