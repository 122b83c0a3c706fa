//! Decode context: tagged fields visible to later switches.

use indexmap::IndexMap;

use crate::{errors::DecodeError, field::Field};

/// Tagged fields decoded so far, in decoding order.
///
/// One context lives for one top-level decode. Nested structs and switch branches
/// share it; each dynamic array element gets a fresh one.
#[derive(Debug, Clone, Default)]
pub struct Context {
    tagged: IndexMap<String, Field>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.tagged.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tagged.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tagged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tagged.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.tagged.values()
    }

    /// Makes `field` visible under its identifier. An identifier registers once.
    pub(crate) fn register(&mut self, field: &Field) -> Result<(), DecodeError> {
        if self.tagged.contains_key(field.id()) {
            return Err(DecodeError::DuplicateTag {
                id: field.id().to_string(),
            });
        }

        self.tagged.insert(field.id().to_string(), field.clone());
        Ok(())
    }
}
