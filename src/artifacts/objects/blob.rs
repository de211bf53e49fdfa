//! Blob object
//!
//! Blobs store file content. They contain only the raw file data, without any
//! metadata like filename or mode (those are stored in trees).
//!
//! ## Format
//!
//! The serialized form is the content itself. No header is prepended; the
//! object kind is recovered from shape when reading typed objects back.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Blob object representing file content
///
/// Blobs are the fundamental unit of file storage. Each unique file content
/// is stored once, identified by its SHA-1 key.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// File content as a string
    content: String,
}

impl Blob {
    /// Get the file content as a string
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(self.content.clone().into_bytes()))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        self.content.to_string()
    }
}
