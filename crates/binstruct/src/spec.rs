//! Specification tree describing the layout of binary data.
//!
//! A [Spec] is untyped: it can describe things that make no sense (a 65-bit integer,
//! a tagged placeholder, an array with a 12-bit unit). [crate::classify::classify]
//! sorts a node into its field kind and rejects those before any data is read.
//!
//! ## Example
//!
//! ```
//! use binstruct::spec::{ASCII, ArrayMode, Spec};
//!
//! let spec = vec![
//!     Spec::field("kind", 2).tagged(),
//!     Spec::switch("kind", [
//!         (0u64, Spec::field("as-int", 16)),
//!         (1u64, Spec::helper("as-str", 16, ASCII)),
//!     ]),
//!     Spec::dyn_array("items", ArrayMode::NbElts, 8).of_helper(ASCII),
//! ];
//! assert_eq!(spec[0].id(), Some("kind"));
//! ```

use std::fmt;

use indexmap::IndexMap;

/// Name of the built-in helper decoding one character per byte.
pub const ASCII: &str = "ASCII";
/// Name of the built-in helper rendering the bits as uppercase hexadecimal.
pub const RAW_DATA: &str = "RAW_DATA";
/// Largest width decoded as a plain integer.
pub const MAX_INTEGER_WIDTH: usize = 64;
/// Allowed widths of a dynamic array header unit.
pub const UNIT_WIDTHS: [usize; 4] = [8, 16, 32, 64];

/// Declarative description of one field, independent of any data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    /// Placeholder, boolean, integer or helper field, depending on `width` and `helper`.
    Field {
        id: String,
        width: Option<usize>,
        /// Name of a registered [crate::helper::Helper].
        helper: Option<String>,
        tagged: bool,
    },
    /// Ordered group of child fields.
    Struct { id: String, children: Vec<Spec> },
    /// Alternative chosen by the value of a previously tagged field.
    Switch {
        target: String,
        branches: IndexMap<Key, Spec>,
    },
    /// Length or size prefixed repetition of an element.
    DynArray {
        id: String,
        mode: ArrayMode,
        /// Width of the header, and of the default element.
        unit: usize,
        element: Option<ArrayElement>,
    },
}

impl Spec {
    /// A field that consumes no bits.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Spec::Field {
            id: id.into(),
            width: None,
            helper: None,
            tagged: false,
        }
    }

    /// A boolean (width 1), an integer (2 to 64) or a placeholder (0).
    pub fn field(id: impl Into<String>, width: usize) -> Self {
        Spec::Field {
            id: id.into(),
            width: Some(width),
            helper: None,
            tagged: false,
        }
    }

    /// A field decoded by the registered helper named `helper`.
    pub fn helper(id: impl Into<String>, width: usize, helper: impl Into<String>) -> Self {
        Spec::Field {
            id: id.into(),
            width: Some(width),
            helper: Some(helper.into()),
            tagged: false,
        }
    }

    pub fn structure(id: impl Into<String>, children: impl IntoIterator<Item = Spec>) -> Self {
        Spec::Struct {
            id: id.into(),
            children: children.into_iter().collect(),
        }
    }

    pub fn switch<K: Into<Key>>(
        target: impl Into<String>,
        branches: impl IntoIterator<Item = (K, Spec)>,
    ) -> Self {
        Spec::Switch {
            target: target.into(),
            branches: branches
                .into_iter()
                .map(|(key, spec)| (key.into(), spec))
                .collect(),
        }
    }

    /// An array whose elements default to plain integers of `unit` bits.
    pub fn dyn_array(id: impl Into<String>, mode: ArrayMode, unit: usize) -> Self {
        Spec::DynArray {
            id: id.into(),
            mode,
            unit,
            element: None,
        }
    }

    /// Marks the field as tagged so later switches can read its value.
    ///
    /// Structs, switches and arrays cannot be tagged; they are returned unchanged.
    pub fn tagged(mut self) -> Self {
        if let Spec::Field { tagged, .. } = &mut self {
            *tagged = true;
        }
        self
    }

    /// Decodes each array element with the named helper applied to the unit width.
    pub fn of_helper(self, helper: impl Into<String>) -> Self {
        self.with_element(ArrayElement::Helper(helper.into()))
    }

    /// Decodes each array element as a struct of `children`.
    pub fn of_struct(self, children: impl IntoIterator<Item = Spec>) -> Self {
        self.with_element(ArrayElement::Struct(children.into_iter().collect()))
    }

    fn with_element(mut self, new_element: ArrayElement) -> Self {
        if let Spec::DynArray { element, .. } = &mut self {
            *element = Some(new_element);
        }
        self
    }

    /// Identifier of the node. Switches have none: they resolve to their branch.
    pub fn id(&self) -> Option<&str> {
        match self {
            Spec::Field { id, .. } | Spec::Struct { id, .. } | Spec::DynArray { id, .. } => {
                Some(id.as_str())
            }
            Spec::Switch { .. } => None,
        }
    }

    /// Label used in error messages: the identifier, or the target of a switch.
    pub(crate) fn label(&self) -> &str {
        match self {
            Spec::Switch { target, .. } => target.as_str(),
            _ => self.id().unwrap_or_default(),
        }
    }
}

/// Header mode of a dynamic array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayMode {
    /// Header holds the number of elements.
    NbElts,
    /// Header holds the size in units, not counting the header itself.
    SizeExcl,
    /// Header holds the size in units, counting the header itself.
    SizeIncl,
}

impl ArrayMode {
    /// Identifier given to the decoded header field.
    pub fn header_id(self) -> &'static str {
        match self {
            ArrayMode::NbElts => "length",
            ArrayMode::SizeExcl | ArrayMode::SizeIncl => "size",
        }
    }
}

impl fmt::Display for ArrayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArrayMode::NbElts => "NB_ELTS",
            ArrayMode::SizeExcl => "SIZE_EXCL",
            ArrayMode::SizeIncl => "SIZE_INCL",
        })
    }
}

/// Element layout of a dynamic array, when it is not a plain integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayElement {
    /// Named helper applied to the unit width.
    Helper(String),
    /// Struct of the given children; its width is independent of the unit.
    Struct(Vec<Spec>),
}

/// Identifier given to every decoded array element.
pub const ELEMENT_ID: &str = "child";

/// Builds the specification each element of an array is decoded with.
pub(crate) fn element_spec(unit: usize, element: Option<&ArrayElement>) -> Spec {
    match element {
        None => Spec::field(ELEMENT_ID, unit),
        Some(ArrayElement::Helper(helper)) => Spec::helper(ELEMENT_ID, unit, helper.clone()),
        Some(ArrayElement::Struct(children)) => Spec::structure(ELEMENT_ID, children.clone()),
    }
}

/// Value a switch branch is selected by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bool(bool),
    UInt(u64),
    Text(String),
}

impl Key {
    /// Booleans and the integers 0 and 1 select each other's branches.
    pub(crate) fn alias(&self) -> Option<Key> {
        match self {
            Key::Bool(value) => Some(Key::UInt(u64::from(*value))),
            Key::UInt(value @ (0 | 1)) => Some(Key::Bool(*value == 1)),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(value) => write!(f, "{value}"),
            Key::UInt(value) => write!(f, "{value}"),
            Key::Text(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Bool(value)
    }
}

impl From<u8> for Key {
    fn from(value: u8) -> Self {
        Key::UInt(value.into())
    }
}

impl From<u16> for Key {
    fn from(value: u16) -> Self {
        Key::UInt(value.into())
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::UInt(value.into())
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Key::UInt(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::SpecDef> for Spec {
    fn from(value: crate::serde::SpecDef) -> Self {
        match value {
            crate::serde::SpecDef::Field {
                id,
                width,
                helper,
                tagged,
            } => Spec::Field {
                id,
                width,
                helper,
                tagged,
            },
            crate::serde::SpecDef::Struct { id, fields } => {
                Spec::structure(id, fields.into_iter().map(Into::into))
            }
            crate::serde::SpecDef::Switch { target, branches } => Spec::switch(
                target,
                branches
                    .into_iter()
                    .map(|branch| (Key::from(branch.value), Spec::from(branch.spec))),
            ),
            crate::serde::SpecDef::DynArray {
                id,
                mode,
                unit,
                element,
            } => Spec::DynArray {
                id,
                mode: mode.into(),
                unit,
                element: element.map(Into::into),
            },
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::KeyDef> for Key {
    fn from(value: crate::serde::KeyDef) -> Self {
        match value {
            crate::serde::KeyDef::Bool(value) => Key::Bool(value),
            crate::serde::KeyDef::UInt(value) => Key::UInt(value),
            crate::serde::KeyDef::Text(value) => Key::Text(value),
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::ArrayModeDef> for ArrayMode {
    fn from(value: crate::serde::ArrayModeDef) -> Self {
        match value {
            crate::serde::ArrayModeDef::NbElts => ArrayMode::NbElts,
            crate::serde::ArrayModeDef::SizeExcl => ArrayMode::SizeExcl,
            crate::serde::ArrayModeDef::SizeIncl => ArrayMode::SizeIncl,
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::ElementDef> for ArrayElement {
    fn from(value: crate::serde::ElementDef) -> Self {
        match value {
            crate::serde::ElementDef::Helper(helper) => ArrayElement::Helper(helper),
            crate::serde::ElementDef::Struct(fields) => {
                ArrayElement::Struct(fields.into_iter().map(Into::into).collect())
            }
        }
    }
}
