//! Top-level decode result.

use std::{fmt, ops::Index};

use tracing::debug;

use crate::{
    bits,
    errors::Result,
    factory::Decoder,
    field::Field,
    hex,
    spec::Spec,
};

/// Identifier of the struct wrapping the top-level fields.
pub const ROOT_ID: &str = "root";

/// Data decoded against a top-level specification.
///
/// Decoding starts at bit 0 with an empty context. Data left past the last field is
/// kept, not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    data: Vec<u8>,
    decoded: Field,
    remaining: Vec<u8>,
    statistics: Statistics,
}

impl Structure {
    /// Decodes `data` with the built-in helpers only.
    pub fn decode(data: &[u8], spec: &[Spec]) -> Result<Self> {
        Decoder::new().decode(data, spec)
    }

    /// Decodes hexadecimal text with the built-in helpers only.
    pub fn from_hex(data: &str, spec: &[Spec]) -> Result<Self> {
        Structure::decode(&hex::decode_hex(data)?, spec)
    }

    pub(crate) fn decode_with(decoder: &Decoder, data: &[u8], spec: &[Spec]) -> Result<Self> {
        let root = Spec::structure(ROOT_ID, spec.to_vec());
        let decoded = decoder.decode_field(&root, data, 0, None)?;

        let decoded_bits = decoded.bit_width();
        let statistics = Statistics {
            decoded_bits,
            remaining_bits: data.len() * 8 - decoded_bits,
        };
        // Starts at the byte holding the first undecoded bit.
        let remaining = bits::tail(data, decoded_bits / 8).to_vec();

        debug!(
            fields = spec.len(),
            decoded = %statistics.decoded(),
            remaining = %statistics.remaining(),
            "decoded structure"
        );

        Ok(Structure {
            data: data.to_vec(),
            decoded,
            remaining,
            statistics,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The root struct holding the top-level fields.
    pub fn decoded(&self) -> &Field {
        &self.decoded
    }

    pub fn remaining(&self) -> &[u8] {
        &self.remaining
    }

    pub fn remaining_hex(&self) -> String {
        hex::encode_upper(&self.remaining)
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Top-level field named `id`.
    pub fn get(&self, id: &str) -> Option<&Field> {
        self.decoded.get(id)
    }
}

impl Index<&str> for Structure {
    type Output = Field;

    /// # Panics
    ///
    /// If there is no top-level field named `id`.
    fn index(&self, id: &str) -> &Field {
        &self.decoded[id]
    }
}

/// Decoded and remaining bit counts of a [Structure].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub decoded_bits: usize,
    pub remaining_bits: usize,
}

impl Statistics {
    /// Decoded bits as `"<N> bytes + <M> bits"`.
    pub fn decoded(&self) -> String {
        bytes_and_bits(self.decoded_bits)
    }

    /// Remaining bits as `"<N> bytes + <M> bits"`.
    pub fn remaining(&self) -> String {
        bytes_and_bits(self.remaining_bits)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decoded: {}, remaining: {}", self.decoded(), self.remaining())
    }
}

fn bytes_and_bits(bit_count: usize) -> String {
    let (byte_count, bit_count) = bits::bit_address(bit_count);
    format!("{byte_count} bytes + {bit_count} bits")
}
