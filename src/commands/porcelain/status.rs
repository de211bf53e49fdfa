use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::LABEL_WIDTH;
use crate::artifacts::status::status_info::{Status, StatusFlags, StatusInfo};
use std::io::Write;

impl Repository {
    /// Report the state of the working tree and the index against HEAD.
    ///
    /// The porcelain format prints one machine-readable `XY <path>` record
    /// per change; the long format groups changes into the staged, unstaged
    /// and untracked sections.
    pub fn status(&self, porcelain: bool) -> anyhow::Result<()> {
        let mut index = self.index_mut();
        index.rehydrate()?;

        let status_info = Status::new(self).initialize(&index)?;

        if porcelain {
            self.print_porcelain_status(&status_info)
        } else {
            self.print_long_status(&status_info)
        }
    }

    fn print_porcelain_status(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        for (file, change) in &status_info.changed_files {
            writeln!(self.writer(), "{} {}", String::from(change), file.display())?;
        }

        for file in &status_info.untracked_files {
            writeln!(self.writer(), "?? {}", file.display())?;
        }

        Ok(())
    }

    fn print_long_status(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        let flags = status_info.flags();

        if flags.is_empty() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        if flags.contains(StatusFlags::HAS_STAGED) {
            writeln!(self.writer(), "Changes to be committed:")?;
            for (file, change_type) in &status_info.index_changeset {
                writeln!(self.writer(), "{}{}", change_type, file.display())?;
            }
            writeln!(self.writer())?;
        }

        if flags.contains(StatusFlags::HAS_UNSTAGED) {
            writeln!(self.writer(), "Changes not staged for commit:")?;
            for (file, change_type) in &status_info.workspace_changeset {
                writeln!(self.writer(), "{}{}", change_type, file.display())?;
            }
            writeln!(self.writer())?;
        }

        if flags.contains(StatusFlags::HAS_UNTRACKED) {
            writeln!(self.writer(), "Untracked files:")?;
            for file in &status_info.untracked_files {
                writeln!(
                    self.writer(),
                    "{:>width$}{}",
                    "",
                    file.display(),
                    width = LABEL_WIDTH
                )?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }
}
