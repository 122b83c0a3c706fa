//! Helper fields: the extension point for new field kinds.
//!
//! A [Helper] turns the bits of a field into a [Value]. Specifications select a
//! helper by name ([crate::spec::Spec::helper]); the name must be registered in
//! the [Registry] of the [crate::Decoder] doing the work. Two helpers are
//! built in: [Ascii] and [RawData].
//!
//! ## Example
//!
//! ```
//! use binstruct::{Decoder, Error, Helper, HelperSpec, Spec, Value, bits};
//!
//! /// Task status stored on 3 bits.
//! struct Status;
//!
//! impl Helper for Status {
//!     fn name(&self) -> &str {
//!         "STATUS"
//!     }
//!
//!     fn is_valid_spec(&self, spec: &HelperSpec) -> bool {
//!         spec.bit_width <= 64
//!     }
//!
//!     fn decode_data(&self, spec: &HelperSpec, raw: &[u8]) -> Result<Value, Error> {
//!         let label = match bits::read_bits_at(raw, 0, spec.bit_width)? {
//!             0 => "todo",
//!             1 => "in progress",
//!             2 => "done",
//!             value => {
//!                 return Err(Error::OutOfRange {
//!                     id: spec.id.clone(),
//!                     value: value.to_string(),
//!                 });
//!             }
//!         };
//!         Ok(Value::Text(label.to_string()))
//!     }
//! }
//!
//! let decoder = Decoder::new().with_helper(Status);
//! let decoded = decoder.decode(&[0x5F], &[Spec::helper("status", 3, "STATUS")]).unwrap();
//! assert_eq!(decoded["status"].value().as_str(), Some("done"));
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::{
    errors::{Error, SpecError},
    field::Value,
    hex,
    spec::{ASCII, RAW_DATA},
};

/// Identifier, width and tag of a helper field, as read from its specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperSpec {
    pub id: String,
    pub bit_width: usize,
    pub tagged: bool,
}

/// Decoder for a user-defined field kind.
pub trait Helper: Send + Sync {
    /// Name specifications use to select this helper.
    fn name(&self) -> &str;

    /// Reads identifier, width and tag from a specification.
    fn decode_spec(&self, id: &str, bit_width: usize, tagged: bool) -> Result<HelperSpec, SpecError> {
        Ok(HelperSpec {
            id: id.to_string(),
            bit_width,
            tagged,
        })
    }

    /// Whether this helper can decode a field shaped like `spec`.
    fn is_valid_spec(&self, spec: &HelperSpec) -> bool;

    /// Decodes the field's bits, left-aligned with the last byte zero-padded.
    fn decode_data(&self, spec: &HelperSpec, bits: &[u8]) -> Result<Value, Error>;
}

/// One character per byte. The width must be a multiple of 8.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii;

impl Helper for Ascii {
    fn name(&self) -> &str {
        ASCII
    }

    fn is_valid_spec(&self, spec: &HelperSpec) -> bool {
        spec.bit_width % 8 == 0
    }

    fn decode_data(&self, _spec: &HelperSpec, bits: &[u8]) -> Result<Value, Error> {
        Ok(Value::Text(bits.iter().map(|&byte| char::from(byte)).collect()))
    }
}

/// Uppercase hexadecimal of the bits, padded to whole bytes. Any width.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawData;

impl Helper for RawData {
    fn name(&self) -> &str {
        RAW_DATA
    }

    fn is_valid_spec(&self, _spec: &HelperSpec) -> bool {
        true
    }

    fn decode_data(&self, _spec: &HelperSpec, bits: &[u8]) -> Result<Value, Error> {
        Ok(Value::Hex(hex::encode_upper(bits)))
    }
}

/// Helpers available to a decoder, by name.
pub struct Registry {
    helpers: IndexMap<String, Box<dyn Helper>>,
}

impl Registry {
    /// A registry with no helpers at all.
    pub fn empty() -> Self {
        Registry {
            helpers: IndexMap::new(),
        }
    }

    /// A registry holding [Ascii] and [RawData].
    pub fn new() -> Self {
        let mut registry = Registry::empty();
        registry.register(Ascii);
        registry.register(RawData);
        registry
    }

    /// Adds `helper`, returning the helper previously registered under the same name.
    pub fn register(&mut self, helper: impl Helper + 'static) -> Option<Box<dyn Helper>> {
        self.helpers
            .insert(helper.name().to_string(), Box::new(helper))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Helper> {
        self.helpers.get(name).map(|helper| helper.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }

    /// Looks up `name` and checks the field against the helper's validity predicate.
    pub(crate) fn resolve(
        &self,
        id: &str,
        bit_width: usize,
        tagged: bool,
        name: &str,
    ) -> Result<(&dyn Helper, HelperSpec), SpecError> {
        let helper = self.get(name).ok_or_else(|| SpecError::UnknownHelper {
            id: id.to_string(),
            helper: name.to_string(),
        })?;

        let spec = helper.decode_spec(id, bit_width, tagged)?;
        if !helper.is_valid_spec(&spec) {
            return Err(SpecError::HelperRejected {
                id: id.to_string(),
                helper: name.to_string(),
                width: bit_width,
            });
        }

        Ok((helper, spec))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
