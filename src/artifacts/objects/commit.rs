//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! History is linear: every commit has at most one parent. A commit contains:
//! - A tree object ID (directory snapshot)
//! - An optional parent commit ID
//! - Author and committer signatures
//! - Commit message
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <zone>
//! commiter <name> <email> <timestamp> <zone>
//!
//! <commit message>
//! ```
//!
//! The parent line is omitted for root commits, and there is no trailing
//! newline after the message. The committer label is spelled `commiter` on
//! the wire.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::BufRead;

/// All signatures are recorded in this fixed zone so commit keys stay stable
/// across machines.
const SIGNATURE_UTC_OFFSET_HOURS: i32 = -3;

fn signature_offset() -> chrono::FixedOffset {
    chrono::FixedOffset::east_opt(SIGNATURE_UTC_OFFSET_HOURS * 3600)
        .expect("constant UTC offset is in range")
}

/// Author or committer signature
///
/// Contains name, email, and timestamp with zone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a new signature with the current timestamp
    ///
    /// # Arguments
    ///
    /// * `name` - Author's name
    /// * `email` - Author's email address
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Utc::now().with_timezone(&signature_offset()),
        }
    }

    /// Create a new signature with a specific timestamp
    ///
    /// The instant is preserved but rendered in the fixed signature zone.
    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp: timestamp.with_timezone(&signature_offset()),
        }
    }

    /// Format name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Format the complete signature including timestamp
    ///
    /// # Returns
    ///
    /// String in format "Name <email> timestamp zone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load the signature from environment variables
    ///
    /// Reads VIT_AUTHOR_NAME, VIT_AUTHOR_EMAIL, and optionally
    /// VIT_AUTHOR_DATE. Missing name or email fall back to built-in defaults,
    /// a missing date falls back to the current time.
    pub fn load_from_env() -> Self {
        let name = std::env::var("VIT_AUTHOR_NAME").unwrap_or_else(|_| "vit".to_string());
        let email =
            std::env::var("VIT_AUTHOR_EMAIL").unwrap_or_else(|_| "vit@localhost".to_string());
        let timestamp = std::env::var("VIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Author::new_with_timestamp(name, email, ts),
            None => Author::new(name, email),
        }
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 -0300"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    /// Get the timestamp
    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

fn parse_zone_offset(value: &str) -> anyhow::Result<chrono::FixedOffset> {
    anyhow::ensure!(value.len() == 5, "Invalid zone offset: {value}");

    let (sign, digits) = value.split_at(1);
    let hours: i32 = digits[..2]
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid zone offset: {value}"))?;
    let minutes: i32 = digits[2..]
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid zone offset: {value}"))?;
    let seconds = hours * 3600 + minutes * 60;

    let offset = match sign {
        "+" => chrono::FixedOffset::east_opt(seconds),
        "-" => chrono::FixedOffset::west_opt(seconds),
        _ => None,
    };

    offset.with_context(|| format!("Invalid zone offset: {value}"))
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp zone"
        // Split from right to get zone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format"));
        }

        let zone = parse_zone_offset(parts[0])?;
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let name_email_part = parts[2]; // "name <email>"

        // Extract email from within angle brackets
        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<'"))?;
        let email_end = name_email_part
            .find('>')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?
            .with_timezone(&zone);

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Commit object
///
/// Represents a snapshot of the repository with metadata.
/// Contains references to:
/// - The tree representing the state of files
/// - The parent commit, if any
/// - Author and committer signatures
/// - Commit message
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit ID (None for a root commit)
    parent: Option<ObjectId>,
    /// Tree object ID representing the directory snapshot
    tree_oid: ObjectId,
    /// Author who wrote the changes
    author: Author,
    /// Committer who recorded the commit
    committer: Author,
    /// Commit message
    message: String,
}

impl Commit {
    /// Create a new commit
    ///
    /// # Arguments
    ///
    /// * `parent` - Parent commit ID (None for a root commit)
    /// * `tree_oid` - Tree object representing the snapshot
    /// * `author` - Author (also recorded as committer)
    /// * `message` - Commit message
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    /// Get the full commit message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the tree object ID
    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.author.timestamp()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        object_content.push(format!("tree {}", self.tree_oid.as_ref()));
        if let Some(parent) = &self.parent {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!("author {}", self.author.display()));
        // the wire label carries a single t
        object_content.push(format!("commiter {}", self.committer.display()));
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");

        Ok(Bytes::from(object_content.into_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.lines();

        let tree_line = lines
            .next()
            .context("Invalid commit object: missing tree line")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("Invalid commit object: invalid tree line")?
            .to_string();
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        let parent = match next_line.strip_prefix("parent ") {
            Some(parent_oid) => {
                next_line = lines
                    .next()
                    .context("Invalid commit object: missing author line")?;

                Some(ObjectId::try_parse(parent_oid.to_string())?)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .context("Invalid commit object: invalid author line")?;
        let author = Author::try_from(author)?;

        let committer_line = lines
            .next()
            .context("Invalid commit object: missing committer line")?;
        let committer = committer_line
            .strip_prefix("commiter ")
            .context("Invalid commit object: invalid committer line")?;
        let committer = Author::try_from(committer)?;

        // skip the blank separator line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Commit {
            parent,
            tree_oid,
            author,
            committer,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid.as_ref()));
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("commiter {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
