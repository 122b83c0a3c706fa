//! JSON-deserializable specification.
//!
//! These types describe the same trees as [crate::spec::Spec], in a shape meant to
//! be read from JSON (for example a layout file shipped with an application) and
//! then converted with `From`.
//!
//! ```json
//! {
//!   "fields": [
//!     { "type": "Field", "id": "kind", "width": 2, "tagged": true },
//!     { "type": "Switch", "target": "kind", "branches": [
//!         { "value": 0, "spec": { "type": "Field", "id": "as-int", "width": 16 } },
//!         { "value": 1, "spec": { "type": "Field", "id": "as-str", "width": 16, "helper": "ASCII" } }
//!     ] },
//!     { "type": "DynArray", "id": "items", "mode": "NB_ELTS", "unit": 8, "element": "ASCII" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::spec::Spec;

/// Top-level specification: the ordered list of fields.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RootDef {
    pub fields: Vec<SpecDef>,
}

impl RootDef {
    pub fn into_specs(self) -> Vec<Spec> {
        self.fields.into_iter().map(Spec::from).collect()
    }
}

/// One node of the specification tree.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum SpecDef {
    /// Placeholder, boolean, integer or helper field.
    Field {
        id: String,
        /// Missing or zero for a placeholder.
        #[serde(default)]
        width: Option<usize>,
        /// Registered helper name, such as `"ASCII"` or `"RAW_DATA"`.
        #[serde(default)]
        helper: Option<String>,
        #[serde(default)]
        tagged: bool,
    },
    Struct {
        id: String,
        fields: Vec<SpecDef>,
    },
    Switch {
        target: String,
        /// Branches in declaration order.
        branches: Vec<BranchDef>,
    },
    DynArray {
        id: String,
        mode: ArrayModeDef,
        unit: usize,
        #[serde(default)]
        element: Option<ElementDef>,
    },
}

/// Switch branch selected when the target's value equals `value`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BranchDef {
    pub value: KeyDef,
    pub spec: SpecDef,
}

/// Switch key: a JSON boolean, unsigned integer or string.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum KeyDef {
    Bool(bool),
    UInt(u64),
    Text(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub enum ArrayModeDef {
    #[serde(rename = "NB_ELTS")]
    NbElts,
    #[serde(rename = "SIZE_EXCL")]
    SizeExcl,
    #[serde(rename = "SIZE_INCL")]
    SizeIncl,
}

/// Array element: a helper name, or the children of a struct.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum ElementDef {
    Helper(String),
    Struct(Vec<SpecDef>),
}
