//! Object identifier (SHA-1 key)
//!
//! Object IDs are 40-character hexadecimal strings. The key of an object is
//! not the hash of its content alone: the hasher is fed the serialized text
//! followed by the decimal byte length of that text rendered as a string.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: First 7 characters (e.g., "abc123")
//!
//! ## Storage
//!
//! Objects are stored flat as `objects/<40-hex-key>`, without fan-out
//! subdirectories.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Object identifier (SHA-1 key)
///
/// A 40-character hexadecimal string that uniquely identifies an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id))
    }

    /// Derive the key for a serialized object
    ///
    /// Hashes the content bytes followed by the decimal byte length, so the
    /// same text always produces the same key.
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);
        hasher.update(content.len().to_string().as_bytes());

        let oid = hasher.finalize();
        Self(format!("{oid:x}"))
    }

    /// The all-zeros ID used as the parent marker of a root commit in log
    /// records
    pub fn zero() -> Self {
        Self("0".repeat(OBJECT_ID_LENGTH))
    }

    /// Convert to the file name the object is stored under
    ///
    /// Storage is flat: the full 40-character key is the file name.
    pub fn to_path(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Get abbreviated form of the object ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn rejects_ids_with_wrong_length() {
        assert!(ObjectId::try_parse("abc123".to_string()).is_err());
        assert!(ObjectId::try_parse("a".repeat(41)).is_err());
    }

    #[test]
    fn rejects_ids_with_non_hex_characters() {
        assert!(ObjectId::try_parse("g".repeat(40)).is_err());
    }

    #[test]
    fn key_depends_on_content_length_suffix() {
        // same leading bytes, different lengths, must never collide
        let a = ObjectId::from_content(b"one");
        let b = ObjectId::from_content(b"one ");

        assert_ne!(a, b);
    }

    #[test]
    fn key_is_stable_for_equal_content() {
        let a = ObjectId::from_content(b"hello world");
        let b = ObjectId::from_content(b"hello world");

        assert_eq!(a, b);
    }

    #[test]
    fn zero_id_is_forty_zeros() {
        assert_eq!(ObjectId::zero().as_ref(), "0".repeat(40));
    }

    #[test]
    fn storage_path_is_the_flat_key() {
        let oid = ObjectId::from_content(b"content");

        assert_eq!(oid.to_path(), PathBuf::from(oid.as_ref()));
    }

    proptest! {
        #[test]
        fn derived_keys_always_parse(content in proptest::collection::vec(any::<u8>(), 0..256)) {
            let oid = ObjectId::from_content(&content);

            prop_assert!(ObjectId::try_parse(oid.as_ref().to_string()).is_ok());
            prop_assert_eq!(oid.to_short_oid().len(), 7);
        }
    }
}
