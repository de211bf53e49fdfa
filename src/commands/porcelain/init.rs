use crate::areas::refs::DEFAULT_BRANCH_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_DESCRIPTION: &str = "Default description";

impl Repository {
    /// Lay out the metadata directory and point HEAD at the default branch.
    ///
    /// The default branch starts unborn: no ref file and no index file exist
    /// until the first add/commit create them. Running against an existing
    /// repository only backfills missing directories.
    pub fn init(&self) -> anyhow::Result<()> {
        let vit_path = self.vit_path();
        let reinitialized = vit_path.join("HEAD").exists();

        fs::create_dir_all(self.database().objects_path().join("pack"))
            .context("Failed to create the objects/pack directory")?;

        fs::create_dir_all(self.database().objects_path().join("info"))
            .context("Failed to create the objects/info directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create the refs/heads directory")?;

        fs::create_dir_all(self.ref_log().path().join("refs/heads"))
            .context("Failed to create the logs/refs/heads directory")?;

        fs::create_dir_all(vit_path.join("hooks")).context("Failed to create the hooks directory")?;

        fs::create_dir_all(vit_path.join("info")).context("Failed to create the info directory")?;

        if !reinitialized {
            fs::write(vit_path.join("description"), DEFAULT_DESCRIPTION)
                .context("Failed to create the description file")?;

            fs::write(vit_path.join("config"), b"").context("Failed to create the config file")?;

            let default_branch = BranchName::try_parse(DEFAULT_BRANCH_NAME.to_string())?;
            self.refs()
                .set_head_to_branch(&default_branch)
                .context("Failed to create the initial HEAD reference")?;
        }

        let verb = if reinitialized {
            "Reinitialized existing"
        } else {
            "Initialized empty"
        };
        write!(
            self.writer(),
            "{} Vit repository in {}",
            verb,
            self.path().display()
        )?;

        Ok(())
    }
}
