//! Struct fields: ordered children decoded back to back.

use crate::{
    bits,
    context::Context,
    errors::{DecodeError, Result},
    factory::Decoder,
    field::{Field, FieldKind, Fields, Value},
    spec::Spec,
};

/// Decodes `children` one after the other, starting at bit `offset` of `data`.
///
/// Each child receives `data` sliced to the byte holding its first bit. Tagged
/// children are registered in `context`, or in a fresh one when none is given, so
/// that later siblings and nested structs can switch on them.
pub(crate) fn decode(
    decoder: &Decoder,
    id: &str,
    children: &[Spec],
    data: &[u8],
    offset: usize,
    context: Option<&mut Context>,
) -> Result<Field> {
    let mut local = Context::new();
    let context = match context {
        Some(context) => context,
        None => &mut local,
    };

    let mut fields = Fields::with_capacity(children.len());
    let mut cursor = offset;
    for child in children {
        let (byte_index, bit_in_byte) = bits::bit_address(cursor);
        let field = decoder.decode_field(
            child,
            bits::tail(data, byte_index),
            bit_in_byte,
            Some(&mut *context),
        )?;

        if field.is_tagged() {
            context.register(&field)?;
        }
        if fields.contains_key(field.id()) {
            return Err(DecodeError::DuplicateField {
                parent: id.to_string(),
                id: field.id().to_string(),
            }
            .into());
        }

        cursor += field.bit_width();
        fields.insert(field.id().to_string(), field);
    }

    Ok(Field::new(
        id,
        FieldKind::Struct,
        cursor - offset,
        Value::Struct(fields),
        false,
    ))
}
