//! # binstruct
//!
//! A library for decoding bit-level binary data described by declarative, nested
//! specifications.
//!
//! Describe the data as an ordered list of fields (placeholders, booleans, integers
//! of up to 64 bits, helper-decoded fields, nested structs, switches on previously
//! tagged fields, and length or size prefixed arrays), then decode byte slices or
//! hexadecimal text into a tree of [Field]s. Fields need not be byte aligned.
//!
//! ## Example
//!
//! ```
//! use binstruct::{Spec, Structure, Value, ASCII};
//!
//! let decoded = Structure::from_hex("DA4341464544454341", &[
//!     Spec::field("a", 3),
//!     Spec::field("b", 4),
//!     Spec::field("c", 1),
//!     Spec::helper("d", 64, ASCII),
//! ])
//! .unwrap();
//!
//! assert_eq!(decoded["a"].value(), &Value::UInt(6));
//! assert_eq!(decoded["b"].value(), &Value::UInt(13));
//! assert_eq!(decoded["c"].value(), &Value::Bool(false));
//! assert_eq!(decoded["d"].value().as_str(), Some("CAFEDECA"));
//! assert_eq!(decoded.statistics().decoded(), "9 bytes + 0 bits");
//! ```

mod array;
pub mod bits;
pub mod classify;
pub mod context;
pub mod errors;
pub mod factory;
pub mod field;
pub mod helper;
pub mod hex;
mod primitive;
mod record;
#[cfg(feature = "serde")]
pub mod serde;
pub mod spec;
pub mod structure;

pub use classify::{SpecKind, classify};
pub use context::Context;
pub use errors::{BitsError, DecodeError, Error, Result, SpecError};
pub use factory::Decoder;
pub use field::{ArrayValue, Field, FieldKind, Fields, Value};
pub use helper::{Ascii, Helper, HelperSpec, RawData, Registry};
pub use spec::{ASCII, ArrayElement, ArrayMode, Key, RAW_DATA, Spec};
pub use structure::{Statistics, Structure};
