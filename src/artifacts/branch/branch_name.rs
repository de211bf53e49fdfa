use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use anyhow::Context;
use colored::{ColoredString, Colorize};
use derive_new::new;

const REF_PREFIX: &str = "refs/heads/";

/// Name of a symbolic ref as stored on disk, e.g. `HEAD` or
/// `refs/heads/main`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn is_head(&self) -> bool {
        self.0 == "HEAD"
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }

    /// The display name without the `refs/heads/` prefix
    pub fn to_short_name(&self) -> &str {
        self.0.strip_prefix(REF_PREFIX).unwrap_or(&self.0)
    }

    /// Style a decoration label the way log output expects: cyan for HEAD,
    /// green for branches.
    pub fn to_colored_name(&self, text: String) -> ColoredString {
        if self.is_head() {
            text.as_str().bold().cyan()
        } else {
            text.as_str().bold().green()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("branch name cannot be empty");
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            anyhow::bail!("invalid branch name: {}", name);
        } else {
            Ok(Self(name))
        }
    }

    pub fn try_parse_sym_ref_name(sym_ref_name: &SymRefName) -> anyhow::Result<Self> {
        if !sym_ref_name.0.starts_with(REF_PREFIX) {
            anyhow::bail!(
                "symbolic ref name must start with '{}', got '{}'",
                REF_PREFIX,
                sym_ref_name.0
            );
        }

        let sym_ref_name = sym_ref_name.0.trim_start_matches(REF_PREFIX);
        Self::try_parse(sym_ref_name.to_string())
    }

    pub fn is_default_branch(&self) -> bool {
        self.0 == "main"
    }

    /// The on-disk ref path for this branch
    pub fn to_ref_path(&self) -> String {
        format!("{REF_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
