use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::errors::VitError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::io::Write;

impl Repository {
    /// Print the stored text of an object.
    ///
    /// Accepts a full hash (any object kind), a unique hash prefix, or a
    /// revision such as `HEAD`, `@` or a branch name.
    pub fn cat_file(&self, object_ref: &str) -> anyhow::Result<()> {
        let oid = self.resolve_object_ref(object_ref)?;
        let text = self.database().load_text(&oid)?;

        write!(self.writer(), "{text}")?;

        Ok(())
    }

    fn resolve_object_ref(&self, object_ref: &str) -> anyhow::Result<ObjectId> {
        if object_ref.len() == OBJECT_ID_LENGTH {
            return ObjectId::try_parse(object_ref.to_string());
        }

        // hex prefixes match any object kind, unlike revisions, which must
        // name a commit
        if object_ref.len() >= 4 && object_ref.chars().all(|c| c.is_ascii_hexdigit()) {
            let mut matches = self.database().find_objects_by_prefix(object_ref)?;

            return match matches.len() {
                0 => Err(VitError::ObjectNotFound {
                    oid: object_ref.to_string(),
                }
                .into()),
                1 => Ok(matches.swap_remove(0)),
                _ => Err(anyhow::anyhow!(
                    "prefix {} is ambiguous between {} objects",
                    object_ref,
                    matches.len()
                )),
            };
        }

        match Revision::try_parse(object_ref)?.resolve(self)? {
            Some(oid) => Ok(oid),
            None => Err(VitError::ObjectNotFound {
                oid: object_ref.to_string(),
            }
            .into()),
        }
    }
}
