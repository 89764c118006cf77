//! Packed bit strings.
//!
//! [`BitString`] stores bits in `u64` words. Bit `i` lives in word `i / 64`
//! at position `i % 64`. Multi-bit fields are written and read most
//! significant bit first, so the textual form reads like a binary numeral.

use super::CodecError;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

const WORD_BITS: usize = 64;

/// A fixed-length sequence of bits packed into machine words.
///
/// # Examples
///
/// ```
/// use u_evolve::codec::BitString;
///
/// let mut bits: BitString = "0110".parse().unwrap();
/// bits.swap(0, 1);
/// assert_eq!(bits.to_string(), "1010");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString {
    words: Vec<u64>,
    len: usize,
}

impl BitString {
    /// Creates a bit string of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bit string holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "bit index {index} out of range for length {}", self.len);
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Sets the bit at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize, bit: bool) {
        assert!(index < self.len, "bit index {index} out of range for length {}", self.len);
        let mask = 1u64 << (index % WORD_BITS);
        if bit {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    /// Swaps the bits at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        let (a, b) = (self.get(i), self.get(j));
        if a != b {
            self.set(i, b);
            self.set(j, a);
        }
    }

    /// Writes the low `width` bits of `value` starting at `offset`,
    /// most significant bit first.
    pub fn write_field(&mut self, offset: usize, width: usize, value: u64) {
        for k in 0..width {
            let bit = (value >> (width - 1 - k)) & 1 == 1;
            self.set(offset + k, bit);
        }
    }

    /// Reads `width` bits starting at `offset` as an unsigned integer,
    /// most significant bit first.
    pub fn read_field(&self, offset: usize, width: usize) -> u64 {
        (0..width).fold(0u64, |acc, k| (acc << 1) | u64::from(self.get(offset + k)))
    }

    /// Exchanges the bits in `range` between `self` and `other`.
    ///
    /// # Panics
    /// Panics if the two bit strings differ in length or the range exceeds it.
    pub fn exchange_segment(&mut self, other: &mut BitString, range: Range<usize>) {
        assert_eq!(self.len, other.len, "bit strings must have equal length");
        assert!(
            range.start <= range.end && range.end <= self.len,
            "segment {range:?} out of range for length {}",
            self.len
        );

        if range.is_empty() {
            return;
        }

        let first = range.start / WORD_BITS;
        let last = (range.end - 1) / WORD_BITS;
        for w in first..=last {
            let base = w * WORD_BITS;
            let lo = range.start.max(base) - base;
            let hi = range.end.min(base + WORD_BITS) - base;
            let mask = if hi - lo == WORD_BITS {
                u64::MAX
            } else {
                ((1u64 << (hi - lo)) - 1) << lo
            };
            let diff = (self.words[w] ^ other.words[w]) & mask;
            self.words[w] ^= diff;
            other.words[w] ^= diff;
        }
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let bits: Vec<bool> = iter.into_iter().collect();
        let mut out = BitString::zeros(bits.len());
        for (i, bit) in bits.into_iter().enumerate() {
            out.set(i, bit);
        }
        out
    }
}

impl FromStr for BitString {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
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
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
