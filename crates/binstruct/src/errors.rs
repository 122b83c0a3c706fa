//! Error types for specification classification, decoding and bit extraction.

use thiserror::Error;

use crate::spec::Key;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced when classifying a [crate::spec::Spec].
///
/// Nested specifications report the path to the failing node through
/// [SpecError::InvalidChild], [SpecError::InvalidBranch] and [SpecError::InvalidElement].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Bit width is zero where bits are required, or above 64 without a helper.
    #[error("field `{id}`: invalid bit width {width}")]
    InvalidWidth { id: String, width: usize },
    /// Helper name is not present in the decoder's registry.
    #[error("field `{id}`: helper `{helper}` is not registered")]
    UnknownHelper { id: String, helper: String },
    /// Helper's validity check rejected the field.
    #[error("field `{id}`: helper `{helper}` rejects a width of {width} bits")]
    HelperRejected {
        id: String,
        helper: String,
        width: usize,
    },
    /// Array header unit is not one of 8, 16, 32 or 64 bits.
    #[error("array `{id}`: unit width must be 8, 16, 32 or 64, got {width}")]
    InvalidUnitWidth { id: String, width: usize },
    /// A child of a struct is invalid.
    #[error("in struct `{parent}`: {source}")]
    InvalidChild {
        parent: String,
        source: Box<SpecError>,
    },
    /// A branch of a switch is invalid.
    #[error("in switch on `{target}`, branch {key}: {source}")]
    InvalidBranch {
        target: String,
        key: Key,
        source: Box<SpecError>,
    },
    /// The element specification of an array is invalid.
    #[error("in elements of array `{array}`: {source}")]
    InvalidElement {
        array: String,
        source: Box<SpecError>,
    },
}

/// Errors produced when a valid specification cannot be satisfied by the data or the context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The start offset must address a bit of the first supplied byte.
    #[error("field `{id}`: start offset {offset} is outside the first byte")]
    OffsetOutOfByte { id: String, offset: usize },
    /// A switch was reached with no decode context.
    #[error("switch on `{target}`: no decode context available")]
    MissingContext { target: String },
    /// The switch target has not been decoded and tagged yet.
    #[error("switch on `{target}`: no tagged field with this identifier")]
    UnknownTarget { target: String },
    /// The switch target's value has no branch.
    #[error("switch on `{target}`: no branch for value {value}")]
    UnmatchedBranch { target: String, value: String },
    /// A tagged identifier was registered twice in the same context.
    #[error("tagged field `{id}` is already registered in this context")]
    DuplicateTag { id: String },
    /// Two siblings of a struct resolved to the same identifier.
    #[error("struct `{parent}` already holds a field named `{id}`")]
    DuplicateField { parent: String, id: String },
    /// The last element of a size-bounded array ends past the bound.
    #[error("array `{id}`: elements end at bit {end}, past the bound at bit {bound}")]
    ArrayOverrun { id: String, end: usize, bound: usize },
    /// Array elements take zero bits, so a size bound is never reached and a
    /// count above one would only repeat empty elements.
    #[error("array `{id}`: elements take zero bits")]
    StalledArray { id: String },
    /// A one-bit read produced something other than 0 or 1.
    #[error("field `{id}`: invalid boolean bit {value}")]
    InvalidBoolean { id: String, value: u64 },
}

/// Errors produced by the bit arithmetic and hexadecimal helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitsError {
    /// Requested bit range is beyond the end of the data.
    #[error("bits {offset}..{end} requested but the buffer holds {available} bits")]
    InputSize {
        offset: usize,
        end: usize,
        available: usize,
    },
    /// More than 64 bits were requested in a single integer read.
    #[error("cannot read {0} bits into a 64-bit integer")]
    TooManyBitsRead(usize),
    /// Shift amount of a 64-bit shift is outside `0..=64`.
    #[error("shift amount {0} is outside 0..=64")]
    InvalidShift(u32),
    /// Hexadecimal input has an odd number of digits.
    #[error("hexadecimal input has odd length {0}")]
    OddHexLength(usize),
    /// A character outside `0-9`, `a-f` and `A-F` in hexadecimal input.
    #[error("invalid hexadecimal digit {digit:?} at position {position}")]
    InvalidHexDigit { digit: char, position: usize },
}

/// Any error surfaced by a decode. Every kind aborts the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Raised by helper extensions when a decoded value is outside their domain.
    #[error("field `{id}`: value {value} is out of range")]
    OutOfRange { id: String, value: String },
    #[error(transparent)]
    Bits(#[from] BitsError),
}
