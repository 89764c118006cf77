//! Binary genome codec for real-valued decision vectors.
//!
//! Each coordinate is quantized to a fixed number of decimal digits and
//! stored in a fixed-width sign-magnitude field:
//!
//! ```text
//! | sign (1 bit) | magnitude (width - 1 bits, MSB first) |
//! ```
//!
//! The magnitude is `round(|v| * 10^decimals)`. With the default width of
//! 17 bits and 4 decimals, coordinates in `[-6.5535, 6.5535]` are encodable.
//!
//! # Key Types
//!
//! - [`BinaryCodec`]: encode/decode between `&[f64]` and [`BitString`]
//! - [`BitString`]: word-packed bit storage used as the continuous genome

mod bits;

pub use bits::BitString;

/// Default field width in bits, sign included.
pub const DEFAULT_WIDTH: usize = 17;

/// Default number of decimal digits kept by quantization.
pub const DEFAULT_DECIMALS: u32 = 4;

const MAX_DECIMALS: u32 = 12;

/// Codec construction and conversion errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Codec dimensionality must be at least 1")]
    InvalidDimension,
    #[error("Field width must be between 2 and 64 bits, got {0}")]
    InvalidWidth(usize),
    #[error("Decimal precision must be at most {MAX_DECIMALS}, got {0}")]
    InvalidDecimals(u32),
    #[error("Expected a point with {expected} coordinates, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Expected a bit string of {expected} bits, got {found}")]
    BitLength { expected: usize, found: usize },
    #[error("Coordinate {index} is not finite")]
    NonFinite { index: usize },
    #[error("Coordinate {index} = {value} exceeds the encodable magnitude {max}")]
    OutOfRange { index: usize, value: f64, max: f64 },
    #[error("Invalid bit character {0:?}")]
    InvalidBit(char),
}

/// Fixed-width sign-magnitude codec for points of dimension `n_dim`.
///
/// # Examples
///
/// ```
/// use u_evolve::codec::BinaryCodec;
///
/// let codec = BinaryCodec::new(2, 17).unwrap();
/// let bits = codec.encode(&[1.5, -0.25]).unwrap();
/// assert_eq!(bits.len(), 34);
/// assert_eq!(codec.decode(&bits).unwrap(), vec![1.5, -0.25]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryCodec {
    n_dim: usize,
    width: usize,
    decimals: u32,
}

impl BinaryCodec {
    /// Creates a codec for `n_dim` coordinates of `width` bits each.
    pub fn new(n_dim: usize, width: usize) -> Result<Self, CodecError> {
        if n_dim == 0 {
            return Err(CodecError::InvalidDimension);
        }
        if !(2..=64).contains(&width) {
            return Err(CodecError::InvalidWidth(width));
        }
        Ok(Self {
            n_dim,
            width,
            decimals: DEFAULT_DECIMALS,
        })
    }

    /// Changes the number of decimal digits kept by quantization.
    pub fn with_decimals(mut self, decimals: u32) -> Result<Self, CodecError> {
        if decimals > MAX_DECIMALS {
            return Err(CodecError::InvalidDecimals(decimals));
        }
        self.decimals = decimals;
        Ok(self)
    }

    /// Number of coordinates per point.
    pub fn n_dim(&self) -> usize {
        self.n_dim
    }

    /// Bits per coordinate, sign included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Decimal digits kept by quantization.
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Total genome length in bits.
    pub fn bit_len(&self) -> usize {
        self.n_dim * self.width
    }

    /// Quantization step, `10^-decimals`.
    pub fn step(&self) -> f64 {
        1.0 / self.scale()
    }

    /// Largest absolute value that can be encoded.
    pub fn max_magnitude(&self) -> f64 {
        self.max_code() as f64 / self.scale()
    }

    /// Rounds `value` to the codec's precision.
    pub fn quantize(&self, value: f64) -> f64 {
        (value * self.scale()).round() / self.scale()
    }

    /// Encodes a point into a bit string.
    ///
    /// Fails if the point has the wrong dimensionality, contains a
    /// non-finite value, or a coordinate whose quantized magnitude does not
    /// fit into `width - 1` bits.
    pub fn encode(&self, point: &[f64]) -> Result<BitString, CodecError> {
        if point.len() != self.n_dim {
            return Err(CodecError::DimensionMismatch {
                expected: self.n_dim,
                found: point.len(),
            });
        }

        // Exclusive bound 2^(width - 1), exact in f64 for every width.
        let code_limit = 2f64.powi(self.width as i32 - 1);
        let mut bits = BitString::zeros(self.bit_len());
        for (index, &value) in point.iter().enumerate() {
            if !value.is_finite() {
                return Err(CodecError::NonFinite { index });
            }
            let code = (value.abs() * self.scale()).round();
            if code >= code_limit {
                return Err(CodecError::OutOfRange {
                    index,
                    value,
                    max: self.max_magnitude(),
                });
            }
            let code = code as u64;
            // Zero always carries sign bit 0.
            let sign = u64::from(value < 0.0 && code != 0);
            let field = (sign << (self.width - 1)) | code;
            bits.write_field(index * self.width, self.width, field);
        }
        Ok(bits)
    }

    /// Decodes a bit string back into a point.
    pub fn decode(&self, bits: &BitString) -> Result<Vec<f64>, CodecError> {
        if bits.len() != self.bit_len() {
            return Err(CodecError::BitLength {
                expected: self.bit_len(),
                found: bits.len(),
            });
        }

        let field_len = bits.len() / self.n_dim;
        let max_code = self.max_code();
        let point = (0..self.n_dim)
            .map(|i| {
                let field = bits.read_field(i * field_len, field_len);
                let magnitude = (field & max_code) as f64 / self.scale();
                if (field >> (field_len - 1)) & 1 == 1 {
                    -magnitude
                } else {
                    magnitude
                }
            })
            .collect();
        Ok(point)
    }

    fn scale(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }

    fn max_code(&self) -> u64 {
        (1u64 << (self.width - 1)) - 1
    }
}

impl Default for BinaryCodec {
    /// Two coordinates, 17-bit fields, 4 decimals.
    fn default() -> Self {
        Self {
            n_dim: 2,
            width: DEFAULT_WIDTH,
            decimals: DEFAULT_DECIMALS,
        }
    }
}
