//! Bit addressing and cross-byte extraction over byte slices.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte.
//! A linear bit *offset* and a *bitwise address* `(byte_index, bit_in_byte)` are
//! interchangeable through [bit_address] and [to_offset].

use crate::errors::BitsError;

/// Converts a linear bit offset into its `(byte_index, bit_in_byte)` address.
pub fn bit_address(offset: usize) -> (usize, usize) {
    (offset / 8, offset % 8)
}

/// Converts a `(byte_index, bit_in_byte)` address back into a linear bit offset.
pub fn to_offset(byte_index: usize, bit_in_byte: usize) -> usize {
    byte_index * 8 + bit_in_byte
}

/// Returns the bytes of `data` starting at `byte_index`, or an empty slice past the end.
pub fn tail(data: &[u8], byte_index: usize) -> &[u8] {
    data.get(byte_index..).unwrap_or(&[])
}

/// Reads a single bit at `bit_pos` (0 = MSB of first byte). Returns 0 or 1.
pub fn read_bit_at(data: &[u8], bit_pos: usize) -> Result<u8, BitsError> {
    let available = data.len() * 8;
    if bit_pos >= available {
        return Err(BitsError::InputSize {
            offset: bit_pos,
            end: bit_pos + 1,
            available,
        });
    }

    let (byte_index, bit_index) = bit_address(bit_pos);

    Ok((data[byte_index] >> (7 - bit_index)) & 1)
}

/// Reads `n` bits starting at `bit_pos` as an unsigned value (max 64 bits). MSB-first.
pub fn read_bits_at(data: &[u8], bit_pos: usize, n: usize) -> Result<u64, BitsError> {
    if n > 64 {
        return Err(BitsError::TooManyBitsRead(n));
    }

    check_range(data, bit_pos, n)?;

    let mut value = 0u64;
    for pos in bit_pos..bit_pos + n {
        value = (value << 1) | read_bit_at(data, pos)? as u64;
    }

    Ok(value)
}

/// Logical left shift of a 64-bit word.
///
/// Returns `(discarded, retained)`: the bits shifted out, moved down to the low end of
/// the word, and the shifted word itself. `shift` must be in `0..=64`.
pub fn left_shift_64(word: u64, shift: u32) -> Result<(u64, u64), BitsError> {
    match shift {
        0 => Ok((0, word)),
        1..=63 => Ok((word >> (64 - shift), word << shift)),
        64 => Ok((word, 0)),
        _ => Err(BitsError::InvalidShift(shift)),
    }
}

/// Left-shifts a whole byte buffer by `shift` bits.
///
/// Bits leaving a byte enter the low end of the previous one; bits leaving the first
/// byte are lost. The buffer is processed as right-padded 64-bit words so that each
/// word needs a single shift.
pub fn cross_byte_left_shift(data: &[u8], shift: u32) -> Result<Vec<u8>, BitsError> {
    let shifted = data
        .chunks(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            left_shift_64(u64::from_be_bytes(word), shift)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = Vec::with_capacity(shifted.len() * 8);
    for (i, &(_, retained)) in shifted.iter().enumerate() {
        let carry = shifted.get(i + 1).map_or(0, |&(discarded, _)| discarded);
        out.extend_from_slice(&(retained | carry).to_be_bytes());
    }
    out.truncate(data.len());

    Ok(out)
}

/// Extracts `width` bits of `data` starting at `offset`.
///
/// The bit at `offset` becomes the MSB of the first returned byte. When `width` is not
/// a multiple of 8 the low bits of the last returned byte are zero.
pub fn extract(data: &[u8], offset: usize, width: usize) -> Result<Vec<u8>, BitsError> {
    check_range(data, offset, width)?;
    if width == 0 {
        return Ok(Vec::new());
    }

    let (start_byte, start_bit) = bit_address(offset);
    let (end_byte, _) = bit_address(offset + width - 1);
    let mut out = cross_byte_left_shift(&data[start_byte..=end_byte], start_bit as u32)?;

    let (last_byte, last_bit) = bit_address(width - 1);
    out.truncate(last_byte + 1);
    out[last_byte] &= 0xFFu8 << (7 - last_bit);

    Ok(out)
}

fn check_range(data: &[u8], offset: usize, width: usize) -> Result<(), BitsError> {
    let available = data.len() * 8;
    match offset.checked_add(width) {
        Some(end) if end <= available => Ok(()),
        end => Err(BitsError::InputSize {
            offset,
            end: end.unwrap_or(usize::MAX),
            available,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_address() {
        assert_eq!(bit_address(0), (0, 0));
        assert_eq!(bit_address(7), (0, 7));
        assert_eq!(bit_address(8), (1, 0));
        assert_eq!(bit_address(15), (1, 7));
    }

    #[test]
    fn test_to_offset() {
        assert_eq!(to_offset(0, 0), 0);
        assert_eq!(to_offset(0, 7), 7);
        assert_eq!(to_offset(1, 0), 8);
        assert_eq!(to_offset(1, 7), 15);
    }

    #[test]
    fn test_tail_past_end() {
        assert_eq!(tail(&[1, 2], 1), &[2]);
        assert!(tail(&[1, 2], 5).is_empty());
    }

    #[test]
    fn test_read_bit_at() {
        let data = [0b1000_0001];
        assert_eq!(read_bit_at(&data, 0).unwrap(), 1);
        assert_eq!(read_bit_at(&data, 1).unwrap(), 0);
        assert_eq!(read_bit_at(&data, 7).unwrap(), 1);
    }

    #[test]
    fn test_read_bits_at() {
        let data = [0xCA];
        assert_eq!(read_bits_at(&data, 0, 3).unwrap(), 6);
        assert_eq!(read_bits_at(&data, 0, 8).unwrap(), 0xCA);
    }

    #[test]
    fn test_read_bits_out_of_bounds() {
        let data = [0b11111111];
        assert_eq!(
            read_bits_at(&data, 0, 9).unwrap_err(),
            BitsError::InputSize {
                offset: 0,
                end: 9,
                available: 8
            }
        );
    }

    #[test]
    fn test_read_bits_more_than_64() {
        let data = [0xFF; 9];
        assert_eq!(
            read_bits_at(&data, 0, 65).unwrap_err(),
            BitsError::TooManyBitsRead(65)
        );
    }

    #[test]
    fn test_left_shift_64() {
        let all = u64::MAX;
        assert_eq!(left_shift_64(all, 0).unwrap(), (0, all));
        assert_eq!(left_shift_64(all, 1).unwrap(), (0x1, 0xFFFF_FFFF_FFFF_FFFE));
        assert_eq!(left_shift_64(all, 4).unwrap(), (0xF, 0xFFFF_FFFF_FFFF_FFF0));
        assert_eq!(
            left_shift_64(all, 60).unwrap(),
            (0x0FFF_FFFF_FFFF_FFFF, 0xF000_0000_0000_0000)
        );
        assert_eq!(
            left_shift_64(all, 63).unwrap(),
            (0x7FFF_FFFF_FFFF_FFFF, 0x8000_0000_0000_0000)
        );
        assert_eq!(left_shift_64(all, 64).unwrap(), (all, 0));
    }

    #[test]
    fn test_left_shift_64_invalid() {
        assert_eq!(
            left_shift_64(u64::MAX, 65).unwrap_err(),
            BitsError::InvalidShift(65)
        );
    }

    #[test]
    fn test_cross_byte_left_shift() {
        assert!(cross_byte_left_shift(&[], 1).unwrap().is_empty());
        assert_eq!(cross_byte_left_shift(&[0xC3], 1).unwrap(), vec![0x86]);
        assert_eq!(
            cross_byte_left_shift(&[0xC3, 0xC3, 0xC3], 1).unwrap(),
            vec![0x87, 0x87, 0x86]
        );
    }

    #[test]
    fn test_cross_byte_left_shift_across_words() {
        for len in [8usize, 9, 15, 16, 17] {
            let data = vec![0xC3; len];
            let mut expected = vec![0x87; len];
            expected[len - 1] = 0x86;
            assert_eq!(cross_byte_left_shift(&data, 1).unwrap(), expected, "len {len}");
        }
    }

    #[test]
    fn test_extract() {
        let data = [0xCA, 0xFE, 0xDE, 0xCA];
        let cases: [(usize, usize, &[u8]); 8] = [
            (0, 8, &[0xCA]),
            (3, 8, &[0x57]),
            (8, 8, &[0xFE]),
            (10, 8, &[0xFB]),
            (0, 13, &[0xCA, 0xF8]),
            (3, 13, &[0x57, 0xF0]),
            (8, 13, &[0xFE, 0xD8]),
            (10, 13, &[0xFB, 0x78]),
        ];

        for (offset, width, expected) in cases {
            assert_eq!(
                extract(&data, offset, width).unwrap(),
                expected,
                "offset {offset}, width {width}"
            );
        }
    }

    #[test]
    fn test_extract_pads_last_byte() {
        let data = [0x43, 0x41, 0x46];
        assert_eq!(extract(&data, 0, 22).unwrap(), vec![0x43, 0x41, 0x44]);
    }

    #[test]
    fn test_extract_out_of_bounds() {
        let data = [0xCA, 0xFE];
        assert_eq!(
            extract(&data, 9, 8).unwrap_err(),
            BitsError::InputSize {
                offset: 9,
                end: 17,
                available: 16
            }
        );
    }

    #[test]
    fn test_extract_zero_width() {
        assert!(extract(&[0xCA], 3, 0).unwrap().is_empty());
    }
}
