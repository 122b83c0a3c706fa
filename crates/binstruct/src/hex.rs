//! Hexadecimal input and output for byte buffers.

use crate::errors::BitsError;

/// Parses an even-length hexadecimal string (either case) into bytes.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, BitsError> {
    if input.len() % 2 != 0 {
        return Err(BitsError::OddHexLength(input.len()));
    }

    let mut out = Vec::with_capacity(input.len() / 2);
    let mut high = None;
    for (position, digit) in input.char_indices() {
        let nibble = digit
            .to_digit(16)
            .ok_or(BitsError::InvalidHexDigit { digit, position })? as u8;
        match high.take() {
            None => high = Some(nibble),
            Some(high) => out.push(high << 4 | nibble),
        }
    }

    Ok(out)
}

/// Renders bytes as uppercase hexadecimal, two digits per byte.
pub fn encode_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02X}")).collect()
}
