use std::{fmt, str::FromStr};

use serde::{Serialize, Deserialize};

use crate::{CodecError, Result};

/// An owned sequence of bits.
///
/// Codewords and the encoded stream are both `BitString`s. The textual form is a string of
/// `'0'` and `'1'` characters, which is also how code tables are persisted.
#[derive(Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { bits: Vec::with_capacity(capacity) }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline(always)]
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Appends `other` bit by bit, in its original order.
    pub fn append(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Appends `other` last bit first.
    pub fn append_reversed(&mut self, other: &BitString) {
        self.bits.extend(other.bits.iter().rev());
    }

    pub fn reversed(&self) -> BitString {
        self.iter().rev().collect()
    }

    /// Number of leading `1` bits.
    pub fn leading_ones(&self) -> usize {
        self.bits.iter().take_while(|&&b| b).count()
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self { bits: iter.into_iter().collect() }
    }
}

impl FromStr for BitString {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CodecError::InvalidBit(other)),
            })
            .collect()
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in self.bits.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({})", self)
    }
}

/// Packs bits into bytes, most significant bit first.
pub struct BinaryWriterBuilder {
    os: Vec<u8>,
    pub written_bits: usize,
    current: u8,
    free: usize,
}

impl Default for BinaryWriterBuilder {
    fn default() -> Self {
        BinaryWriterBuilder {
            os: Vec::default(),
            written_bits: 0,
            current: 0,
            free: 8,
        }
    }
}

impl BinaryWriterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flushes the partially filled byte, if any. The unused low bits stay zero.
    pub fn build(mut self) -> Box<[u8]> {
        if self.free != 8 {
            self.os.push(self.current);
        }

        self.os.into_boxed_slice()
    }

    /// The number of zero bits `build` will append to reach a byte boundary.
    #[inline(always)]
    pub fn padding(&self) -> usize {
        self.free % 8
    }

    #[inline(always)]
    pub fn push_bit(&mut self, bit: bool) {
        self.free -= 1;
        if bit {
            self.current |= 1 << self.free;
        }

        if self.free == 0 {
            self.os.push(self.current);
            self.free = 8;
            self.current = 0;
        }

        self.written_bits += 1;
    }

    pub fn push_bits(&mut self, bits: &BitString) -> usize {
        for bit in bits.iter() {
            self.push_bit(bit);
        }
        bits.len()
    }
}

/// Number of zero bits needed to pad `bit_len` bits to a byte boundary.
#[inline(always)]
pub fn padding_len(bit_len: usize) -> usize {
    (8 - bit_len % 8) % 8
}

/// Right-pads `bits` with zeros to a multiple of 8 and packs them into `ceil(len / 8)` bytes.
///
/// No length is recorded: unpacking needs the original bit length from elsewhere.
pub fn pack(bits: &BitString) -> Vec<u8> {
    let mut writer = BinaryWriterBuilder::new();
    writer.push_bits(bits);
    debug_assert_eq!(writer.padding(), padding_len(bits.len()));
    writer.build().into_vec()
}

/// Reads bits back out of packed bytes, most significant bit first.
#[derive(Clone, Debug)]
pub struct BinaryReader<'a> {
    is: &'a [u8],
    pub read_bits: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(input_stream: &'a [u8]) -> Self {
        BinaryReader {
            is: input_stream,
            read_bits: 0,
        }
    }

    #[inline(always)]
    pub fn available(&self) -> usize {
        (self.is.len() << 3) - self.read_bits
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.is.get(self.read_bits >> 3)?;
        let bit = (byte >> (7 - (self.read_bits & 7))) & 1 == 1;
        self.read_bits += 1;
        Some(bit)
    }

    pub fn read_bits(&mut self, len: usize) -> Result<BitString> {
        let available = self.available();
        if len > available {
            return Err(CodecError::Truncated { bits: len, available });
        }

        let mut bits = BitString::with_capacity(len);
        for _ in 0..len {
            let bit = self.read_bit().ok_or(CodecError::Truncated { bits: len, available })?;
            bits.push(bit);
        }
        Ok(bits)
    }
}

/// Recovers the first `bit_len` bits of a packed byte slice.
pub fn unpack(bytes: &[u8], bit_len: usize) -> Result<BitString> {
    BinaryReader::new(bytes).read_bits(bit_len)
}

#[cfg(test)]
mod tests;
