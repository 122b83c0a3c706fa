//! Leaf fields: placeholders, booleans, integers and helper fields.

use crate::{
    bits,
    errors::{DecodeError, Result},
    field::{Field, FieldKind, Value},
    helper::{Helper, HelperSpec},
};

pub(crate) fn placeholder(id: &str) -> Field {
    Field::new(id, FieldKind::Placeholder, 0, Value::None, false)
}

pub(crate) fn boolean(id: &str, tagged: bool, data: &[u8], offset: usize) -> Result<Field> {
    let value = match bits::read_bits_at(data, offset, 1)? {
        0 => false,
        1 => true,
        value => {
            return Err(DecodeError::InvalidBoolean {
                id: id.to_string(),
                value,
            }
            .into());
        }
    };

    Ok(Field::new(id, FieldKind::Boolean, 1, Value::Bool(value), tagged))
}

/// Unsigned big-endian integer of `width` bits, MSB first.
pub(crate) fn integer(
    id: &str,
    width: usize,
    tagged: bool,
    data: &[u8],
    offset: usize,
) -> Result<Field> {
    let value = bits::read_bits_at(data, offset, width)?;
    Ok(Field::new(id, FieldKind::Integer, width, Value::UInt(value), tagged))
}

/// Hands the field's bits, left-aligned, to `helper`.
pub(crate) fn helper(
    helper: &dyn Helper,
    spec: HelperSpec,
    data: &[u8],
    offset: usize,
) -> Result<Field> {
    let raw = bits::extract(data, offset, spec.bit_width)?;
    let value = helper.decode_data(&spec, &raw)?;

    Ok(Field::new(
        spec.id,
        FieldKind::Helper(helper.name().to_string()),
        spec.bit_width,
        value,
        spec.tagged,
    ))
}
