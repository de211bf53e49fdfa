use crate::areas::repository::Repository;
use crate::artifacts::diff::lcs::LcsDiff;
use crate::artifacts::status::inspector::Inspector;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Show unstaged changes as line diffs against the staged blobs.
    ///
    /// Only index entries whose working-tree content differs are rendered; a
    /// file deleted from the working tree diffs against the empty document.
    pub fn diff(&self) -> anyhow::Result<()> {
        let mut index = self.index_mut();
        index.rehydrate()?;

        let inspector = Inspector::new(self);

        for entry in index.entries() {
            if !self.workspace().file_exists(&entry.name) {
                let before = self.database().parse_blob(&entry.oid)?;
                self.print_file_diff(&entry.name, before.content(), "")?;
                continue;
            }

            if inspector.is_content_changed(entry)? {
                let before = self.database().parse_blob(&entry.oid)?;
                let after = self.workspace().read_file(&entry.name)?;
                self.print_file_diff(&entry.name, before.content(), &after)?;
            }
        }

        Ok(())
    }

    fn print_file_diff(&self, path: &Path, before: &str, after: &str) -> anyhow::Result<()> {
        let header = format!(
            "diff --vit a/{} b/{}",
            path.display(),
            path.display()
        );
        writeln!(self.writer(), "{}", header.bold())?;

        let before_lines: Vec<String> = before.lines().map(String::from).collect();
        let after_lines: Vec<String> = after.lines().map(String::from).collect();

        let rendered = LcsDiff::new(&before_lines, &after_lines).format_diff();
        if !rendered.is_empty() {
            writeln!(self.writer(), "{rendered}")?;
        }

        Ok(())
    }
}
