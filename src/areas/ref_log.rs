//! Append-only logs of reference updates
//!
//! Every commit appends one line to `logs/HEAD` and, while HEAD is attached,
//! the same line to `logs/refs/heads/<branch>`:
//!
//! ```text
//! <parent> <new> <author signature> commit[ (initial)]: <message first line>
//! ```
//!
//! A root commit records forty zeros in the parent column. The logs are
//! never rewritten, only appended to, so they survive checkouts that move
//! HEAD backwards.

use crate::areas::refs::HeadState;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, new)]
pub struct RefLog {
    /// Path to the logs directory (typically `.vit/logs`)
    path: Box<Path>,
}

/// One reference update, ready to be rendered as a log line.
#[derive(Debug, new)]
pub struct LogRecord<'record> {
    parent: Option<&'record ObjectId>,
    oid: &'record ObjectId,
    author: &'record Author,
    message: &'record str,
}

impl LogRecord<'_> {
    fn to_line(&self) -> String {
        let parent = self.parent.cloned().unwrap_or_else(ObjectId::zero);
        let initial = if self.parent.is_none() {
            " (initial)"
        } else {
            ""
        };
        let first_line = self.message.lines().next().unwrap_or_default();

        format!(
            "{} {} {} commit{}: {}\n",
            parent,
            self.oid,
            self.author.display(),
            initial,
            first_line
        )
    }
}

impl RefLog {
    /// Append a record to `logs/HEAD`, and to the current branch log when
    /// HEAD is attached.
    pub fn append(&self, record: &LogRecord, head_state: &HeadState) -> anyhow::Result<()> {
        let line = record.to_line();

        self.append_line(&self.head_log_path(), &line)?;

        if let HeadState::Branch(branch_name) = head_state {
            self.append_line(&self.branch_log_path(branch_name), &line)?;
        }

        Ok(())
    }

    fn append_line(&self, path: &Path, line: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for log file at {:?}",
                path
            )
        })?)?;

        let mut log_file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("failed to open log file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut log_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(line.as_bytes())?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn head_log_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn branch_log_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.path
            .join("refs/heads")
            .join(branch_name.as_ref())
            .into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn author() -> Author {
        let timestamp = chrono::FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 4, 12, 0, 0)
            .unwrap();
        Author::new_with_timestamp(
            "Logger".to_string(),
            "logger@example.com".to_string(),
            timestamp,
        )
    }

    fn main_state() -> HeadState {
        HeadState::Branch(BranchName::try_parse("main".to_string()).unwrap())
    }

    #[rstest]
    fn a_root_commit_logs_forty_zeros_and_the_initial_marker(author: Author) -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let ref_log = RefLog::new(dir.path().join("logs").into_boxed_path());
        let oid = ObjectId::from_content(b"root");

        let record = LogRecord::new(None, &oid, &author, "first commit\n\nwith body");
        ref_log.append(&record, &main_state())?;

        let expected = format!(
            "{} {} {} commit (initial): first commit\n",
            ObjectId::zero(),
            oid,
            author.display()
        );
        assert_eq!(std::fs::read_to_string(dir.path().join("logs/HEAD"))?, expected);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("logs/refs/heads/main"))?,
            expected
        );

        Ok(())
    }

    #[rstest]
    fn later_commits_append_without_rewriting_earlier_lines(author: Author) -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let ref_log = RefLog::new(dir.path().join("logs").into_boxed_path());
        let first = ObjectId::from_content(b"root");
        let second = ObjectId::from_content(b"child");

        ref_log.append(&LogRecord::new(None, &first, &author, "first"), &main_state())?;
        ref_log.append(
            &LogRecord::new(Some(&first), &second, &author, "second"),
            &main_state(),
        )?;

        let head_log = std::fs::read_to_string(dir.path().join("logs/HEAD"))?;
        let lines = head_log.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("commit (initial): first"));
        assert!(lines[1].starts_with(&format!("{first} {second}")));
        assert!(lines[1].contains("commit: second"));

        Ok(())
    }

    #[rstest]
    fn detached_commits_log_to_head_only(author: Author) -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let ref_log = RefLog::new(dir.path().join("logs").into_boxed_path());
        let parent = ObjectId::from_content(b"tip");
        let oid = ObjectId::from_content(b"experiment");

        let record = LogRecord::new(Some(&parent), &oid, &author, "detached work");
        ref_log.append(&record, &HeadState::Detached(parent.clone()))?;

        assert!(dir.path().join("logs/HEAD").is_file());
        assert!(!dir.path().join("logs/refs/heads/main").exists());

        Ok(())
    }
}
