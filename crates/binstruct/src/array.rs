//! Dynamic arrays: a length or size header followed by repeated elements.

use tracing::debug;

use crate::{
    bits,
    errors::{DecodeError, Result},
    factory::Decoder,
    field::{ArrayValue, Field, FieldKind, Value},
    spec::{self, ArrayElement, ArrayMode},
};

/// Decodes the header, then elements until the count or the size bound is reached.
///
/// The header is a `unit`-bit integer. Each element is decoded with no context, so
/// switches inside elements can only target fields of the same element.
pub(crate) fn decode(
    decoder: &Decoder,
    id: &str,
    mode: ArrayMode,
    unit: usize,
    element: Option<&ArrayElement>,
    data: &[u8],
    offset: usize,
) -> Result<Field> {
    let count = bits::read_bits_at(data, offset, unit)?;
    let header = Field::new(
        mode.header_id(),
        FieldKind::ArrayHeader { mode, unit },
        unit,
        Value::UInt(count),
        false,
    )
    .capture_raw(data, offset)?;

    let element_spec = spec::element_spec(unit, element);
    let mut elements = Vec::new();
    let mut cursor = offset + unit;
    let next = |cursor: usize| {
        let (byte_index, bit_in_byte) = bits::bit_address(cursor);
        decoder.decode_field(&element_spec, bits::tail(data, byte_index), bit_in_byte, None)
    };

    match mode {
        ArrayMode::NbElts => {
            for _ in 0..count {
                let item = next(cursor)?;
                // Elements get a fresh context, so one empty element means all are empty.
                if item.bit_width() == 0 && count > 1 {
                    return Err(DecodeError::StalledArray { id: id.to_string() }.into());
                }
                cursor += item.bit_width();
                elements.push(item);
            }
        }
        ArrayMode::SizeExcl | ArrayMode::SizeIncl => {
            let units = match mode {
                ArrayMode::SizeExcl => u128::from(count) + 1,
                _ => u128::from(count),
            };
            let bound = usize::try_from(offset as u128 + units * unit as u128)
                .unwrap_or(usize::MAX);

            while cursor < bound {
                let item = next(cursor)?;
                if item.bit_width() == 0 {
                    return Err(DecodeError::StalledArray { id: id.to_string() }.into());
                }
                cursor += item.bit_width();
                elements.push(item);
            }

            if cursor != bound {
                return Err(DecodeError::ArrayOverrun {
                    id: id.to_string(),
                    end: cursor,
                    bound,
                }
                .into());
            }
        }
    }

    debug!(
        id,
        mode = %mode,
        header = count,
        elements = elements.len(),
        bit_width = cursor - offset,
        "decoded dynamic array"
    );

    Ok(Field::new(
        id,
        FieldKind::DynArray,
        cursor - offset,
        Value::Array(ArrayValue {
            header: Box::new(header),
            elements,
        }),
        false,
    ))
}
