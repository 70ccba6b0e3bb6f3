//! ABI type definitions

use std::fmt;

use strata_primitives::{H160, U256};

/// Contract ABI token, ready for packing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20-byte account id)
    Address(H160),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
}

/// Signed 256-bit integer as sign and magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I256 {
    /// Absolute value
    pub abs: U256,
    /// Sign (true if negative)
    pub negative: bool,
}

impl I256 {
    /// Create a new I256
    pub fn new(abs: U256, negative: bool) -> Self {
        Self { abs, negative }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self {
            abs: U256::from(value.unsigned_abs()),
            negative: value < 0,
        }
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value fits a signed integer of `bits` width
    pub fn fits_signed(&self, bits: usize) -> bool {
        if bits >= 256 && !self.negative {
            return self.abs.bits() < 256;
        }
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    /// 32-byte two's complement representation
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.abs.to_big_endian(&mut bytes);
        if self.negative && !self.abs.is_zero() {
            for b in bytes.iter_mut() {
                *b = !*b;
            }
            let mut carry = 1u16;
            for b in bytes.iter_mut().rev() {
                let sum = (*b as u16) + carry;
                *b = sum as u8;
                carry = sum >> 8;
            }
        }
        bytes
    }

    /// Parse a 32-byte two's complement word
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        let negative = bytes[0] & 0x80 != 0;
        if !negative {
            return Self::new(U256::from_big_endian(bytes), false);
        }
        let mut flipped = [0u8; 32];
        for (dst, src) in flipped.iter_mut().zip(bytes.iter()) {
            *dst = !*src;
        }
        let abs = U256::from_big_endian(&flipped) + U256::one();
        Self::new(abs, true)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative && !self.abs.is_zero() {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// Resolved ABI type descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array (`T[]`)
    Array(Box<ParamType>),
    /// Fixed-size array (`T[N]`)
    FixedArray(Box<ParamType>, usize),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// Element type of an array or slice
    pub fn element(&self) -> Option<&ParamType> {
        match self {
            ParamType::Array(inner) | ParamType::FixedArray(inner, _) => Some(inner),
            _ => None,
        }
    }
}

/// Canonical descriptor text, as used in method signatures
impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::String => write!(f, "string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_type_is_dynamic() {
        assert!(!ParamType::Address.is_dynamic());
        assert!(!ParamType::Uint(256).is_dynamic());
        assert!(!ParamType::FixedArray(Box::new(ParamType::Address), 4).is_dynamic());

        assert!(ParamType::Bytes.is_dynamic());
        assert!(ParamType::String.is_dynamic());
        assert!(ParamType::Array(Box::new(ParamType::Uint(256))).is_dynamic());
        assert!(ParamType::FixedArray(Box::new(ParamType::String), 2).is_dynamic());
    }

    #[test]
    fn test_param_type_display() {
        assert_eq!(ParamType::Uint(256).to_string(), "uint256");
        assert_eq!(
            ParamType::FixedArray(Box::new(ParamType::Address), 4).to_string(),
            "address[4]"
        );
        assert_eq!(
            ParamType::Array(Box::new(ParamType::FixedBytes(32))).to_string(),
            "bytes32[]"
        );
    }

    #[test]
    fn test_i256_from_i128() {
        let negative = I256::from_i128(-100);
        assert!(negative.negative);
        assert_eq!(negative.abs, U256::from(100));
        assert!(I256::from_i128(0).is_zero());
    }

    #[test]
    fn test_i256_twos_complement() {
        assert_eq!(I256::from_i128(-1).to_be_bytes(), [0xff; 32]);
        let back = I256::from_be_bytes(&I256::from_i128(-129).to_be_bytes());
        assert_eq!(back, I256::from_i128(-129));
        assert_eq!(I256::from_i128(42).to_be_bytes()[31], 42);
    }

    #[test]
    fn test_i256_fits_signed() {
        assert!(I256::from_i128(127).fits_signed(8));
        assert!(!I256::from_i128(128).fits_signed(8));
        assert!(I256::from_i128(-128).fits_signed(8));
        assert!(!I256::from_i128(-129).fits_signed(8));
        assert!(!I256::new(U256::MAX, false).fits_signed(256));
        assert!(I256::new(U256::one() << 255, true).fits_signed(256));
    }

    #[test]
    fn test_i256_display() {
        assert_eq!(I256::from_i128(-5).to_string(), "-5");
        assert_eq!(I256::from_i128(5).to_string(), "5");
    }
}
