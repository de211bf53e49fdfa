//! Tree and index entry modes
//!
//! Only two modes exist: regular files (`100644`) and directories (`040000`).
//! Executable bits and symlinks are not represented.

/// Mode recorded on index and tree entries
#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum EntryMode {
    #[default]
    Regular,
    Directory,
}

impl EntryMode {
    pub fn as_str(&self) -> &str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Directory => "040000",
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "100644" => Ok(EntryMode::Regular),
            "040000" => Ok(EntryMode::Directory),
            _ => Err(anyhow::anyhow!("Invalid entry mode: {value}")),
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
