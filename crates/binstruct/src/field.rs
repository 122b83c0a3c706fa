//! Decoded fields: the result of applying a [crate::spec::Spec] to a bit range.

use std::{fmt, ops::Index};

use indexmap::IndexMap;

use crate::{
    bits,
    errors::BitsError,
    hex,
    spec::{ArrayMode, Key},
};

/// Ordered children of a decoded struct, keyed by identifier.
pub type Fields = IndexMap<String, Field>;

/// Kind of a decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Placeholder,
    Boolean,
    Integer,
    /// Decoded by the helper with this name.
    Helper(String),
    Struct,
    DynArray,
    /// Length or size header of a dynamic array, counted in `unit`-bit units.
    ArrayHeader { mode: ArrayMode, unit: usize },
}

/// Decoded value of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Placeholders carry no value.
    None,
    Bool(bool),
    UInt(u64),
    /// One character per byte.
    Text(String),
    /// Uppercase hexadecimal, two digits per byte.
    Hex(String),
    Struct(Fields),
    Array(ArrayValue),
}

/// Value of a dynamic array: its header and its elements in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayValue {
    pub header: Box<Field>,
    pub elements: Vec<Field>,
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(value) => Some(*value),
            _ => None,
        }
    }

    /// Text of an ASCII or raw-data value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) | Value::Hex(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&Fields> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Switch key matching this value, if it is a scalar.
    pub fn to_key(&self) -> Option<Key> {
        match self {
            Value::Bool(value) => Some(Key::Bool(*value)),
            Value::UInt(value) => Some(Key::UInt(*value)),
            Value::Text(value) | Value::Hex(value) => Some(Key::Text(value.clone())),
            Value::None | Value::Struct(_) | Value::Array(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("(none)"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::UInt(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value:?}"),
            Value::Hex(value) => write!(f, "0x{value}"),
            Value::Struct(fields) => write!(f, "struct of {} fields", fields.len()),
            Value::Array(array) => write!(f, "array of {} elements", array.elements.len()),
        }
    }
}

/// A decoded field. Immutable once the decode that produced it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    id: String,
    kind: FieldKind,
    bit_width: usize,
    value: Value,
    tagged: bool,
    raw_data: Vec<u8>,
}

impl Field {
    pub(crate) fn new(
        id: impl Into<String>,
        kind: FieldKind,
        bit_width: usize,
        value: Value,
        tagged: bool,
    ) -> Self {
        Field {
            id: id.into(),
            kind,
            bit_width,
            value,
            tagged,
            raw_data: Vec::new(),
        }
    }

    /// Copies the bits this field consumed, starting at `offset` of `data`.
    pub(crate) fn capture_raw(mut self, data: &[u8], offset: usize) -> Result<Self, BitsError> {
        if self.bit_width > 0 {
            self.raw_data = bits::extract(data, offset, self.bit_width)?;
        }
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Number of bits consumed, exactly as specified even when not a multiple of 8.
    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    /// Consumed bits, left-aligned, with the last byte zero-padded.
    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    /// [Field::raw_data] as uppercase hexadecimal.
    pub fn raw_hex(&self) -> String {
        hex::encode_upper(&self.raw_data)
    }

    /// Child of a struct field.
    pub fn get(&self, id: &str) -> Option<&Field> {
        self.value.as_fields()?.get(id)
    }

    /// Elements of a dynamic array field.
    pub fn elements(&self) -> Option<&[Field]> {
        self.value
            .as_array()
            .map(|array| array.elements.as_slice())
    }

    /// Header of a dynamic array field.
    pub fn header(&self) -> Option<&Field> {
        self.value.as_array().map(|array| array.header.as_ref())
    }
}

impl Index<&str> for Field {
    type Output = Field;

    /// # Panics
    ///
    /// If this is not a struct or it has no child named `id`.
    fn index(&self, id: &str) -> &Field {
        self.get(id)
            .unwrap_or_else(|| panic!("field `{}` has no child `{id}`", self.id))
    }
}
