use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::errors::VitError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;

/// A revision expression that identifies a commit.
///
/// Supported forms:
/// - Branch names and `HEAD`: `main`, `topic/nested`, `HEAD`
/// - Aliases: `@` (resolves to `HEAD`)
/// - Full keys: 40-character hexadecimal strings
/// - Abbreviated keys: 4-40 character hexadecimal prefixes
/// - Parent notation: `<revision>^` (e.g., `main^`, `HEAD^`)
/// - Ancestor notation: `<revision>~<n>` (e.g., `main~3`, `HEAD~2`)
///
/// # Resolution Strategy
///
/// Hex-looking strings are initially parsed as `Ref` variants. During
/// resolution, refs win: only when no ref with that name exists and the
/// string looks like a key (4-40 hex characters) is it resolved against the
/// object database, by exact match first and unique prefix second.
#[derive(Debug, Clone)]
pub enum Revision {
    /// A branch, `HEAD`, or a key spelled out in hex
    Ref(BranchName),
    /// The Nth ancestor of a revision (e.g., HEAD~3)
    Ancestor(Box<Revision>, usize),
    /// The parent of a revision (e.g., HEAD^)
    Parent(Box<Revision>),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_re = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        if let Some(caps) = parent_re.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            return Ok(Revision::Parent(Box::new(base_revision)));
        }

        let ancestor_re = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;
        if let Some(caps) = ancestor_re.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            let base_revision = Self::try_parse(&caps[1])?;

            return Ok(Revision::Ancestor(Box::new(base_revision), generations));
        }

        let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
        let branch_name = BranchName::try_parse(resolved_name.to_string())?;
        Ok(Revision::Ref(branch_name))
    }

    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        match self {
            Revision::Ref(branch_name) => {
                let name_str = branch_name.as_ref();

                // refs shadow keys of the same spelling
                match repository.refs().read_ref(branch_name)? {
                    Some(oid) => Ok(Some(oid)),
                    None if Self::looks_like_oid(name_str) => {
                        Ok(Some(Self::resolve_oid(name_str, repository)?))
                    }
                    None => Err(VitError::CommitNotFound(name_str.to_string()).into()),
                }
            }
            Revision::Parent(base_revision) => {
                Self::resolve_commit_parent(base_revision.resolve(repository)?, repository)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(oid, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_commit_parent(
        oid: Option<ObjectId>,
        repository: &Repository,
    ) -> anyhow::Result<Option<ObjectId>> {
        match oid {
            Some(oid) => {
                let commit = repository.database().parse_commit(&oid)?;

                Ok(commit.parent().cloned())
            }
            None => Ok(None),
        }
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        // full key: exact lookup
        if oid_str.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(oid_str.to_string())?;
            Self::validate_oid_is_commit(&oid, repository)?;

            return Ok(oid);
        }

        let matches = repository.database().find_objects_by_prefix(oid_str)?;

        match matches.len() {
            0 => Err(VitError::CommitNotFound(oid_str.to_string()).into()),
            1 => {
                let oid = &matches[0];
                Self::validate_oid_is_commit(oid, repository)?;

                Ok(oid.clone())
            }
            _ => {
                // keep only commits as candidates before declaring ambiguity
                let commit_matches: Vec<&ObjectId> = matches
                    .iter()
                    .filter(|oid| repository.database().parse_commit(oid).is_ok())
                    .collect();

                match commit_matches.len() {
                    0 => Err(VitError::CommitNotFound(oid_str.to_string()).into()),
                    1 => Ok(commit_matches[0].clone()),
                    _ => {
                        let mut error_msg =
                            format!("short SHA1 {oid_str} is ambiguous\nhint: The candidates are:");
                        for oid in &commit_matches {
                            error_msg.push_str(&format!("\nhint:   {} commit", oid.to_short_oid()));
                        }

                        Err(anyhow::anyhow!(error_msg))
                    }
                }
            }
        }
    }

    fn validate_oid_is_commit(oid: &ObjectId, repository: &Repository) -> anyhow::Result<()> {
        repository
            .database()
            .parse_commit(oid)
            .with_context(|| format!("object {} is not a commit", oid.to_short_oid()))?;

        Ok(())
    }

    fn looks_like_oid(s: &str) -> bool {
        // at least 4 characters, the minimum prefix length
        s.len() >= 4 && s.len() <= OBJECT_ID_LENGTH && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}
