use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// Walk of the commit chain, newest first, from a resolved revision down to
/// the root commit.
#[derive(Clone, new)]
pub struct RevList<'r> {
    repository: &'r Repository,
    start_revision: Revision,
}

impl<'r> RevList<'r> {
    pub fn into_iter(self) -> anyhow::Result<RevListIntoIter<'r>> {
        Ok(RevListIntoIter {
            repository: self.repository,
            current_commit_oid: self.start_revision.resolve(self.repository)?,
        })
    }

    /// Whether `target` is reachable by following parents from the start
    /// revision.
    pub fn contains(self, target: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.into_iter()?.any(|(oid, _)| &oid == target))
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    repository: &'r Repository,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = (ObjectId, Commit);

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.repository.database().parse_commit(&commit_oid) {
            Ok(commit) => {
                // a root commit has no parent, which ends the walk
                self.current_commit_oid = commit.parent().cloned();
                Some((commit_oid, commit))
            }
            // an unreadable commit ends the walk
            Err(_) => None,
        }
    }
}
