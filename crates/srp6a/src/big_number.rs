// BigNumber - unsigned big-integer wrapper around num-bigint
// Carries the wire codec every protocol value goes through

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{RngCore, thread_rng};

/// BigNumber wraps num-bigint's BigUint for cryptographic operations.
///
/// Wire encodings are minimal unsigned big-endian byte strings: no leading
/// zero bytes, and the integer zero encodes to the empty string. Negative
/// values cannot be represented and never occur in the protocol.
#[derive(Debug, Clone)]
pub struct BigNumber {
    bn: BigUint,
}

impl Default for BigNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl BigNumber {
    /// Create a new BigNumber initialized to zero
    pub fn new() -> Self {
        BigNumber { bn: BigUint::zero() }
    }

    /// Create from a u32 value
    pub fn from_u32(val: u32) -> Self {
        BigNumber { bn: BigUint::from(val) }
    }

    /// Decode an unsigned big-endian byte string; empty input is zero
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        BigNumber { bn: BigUint::from_bytes_be(bytes) }
    }

    /// Parse a hex string. Surrounding whitespace and an optional 0x/0X
    /// prefix are tolerated; anything else that is not plain hex is None.
    pub fn from_hex_str(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let hex = hex.strip_prefix("0X").unwrap_or(hex);
        if hex.is_empty() {
            return None;
        }
        BigUint::parse_bytes(hex.as_bytes(), 16).map(|bn| BigNumber { bn })
    }

    /// Interpret `nbytes` random bytes as an integer
    pub fn random(nbytes: usize) -> Self {
        let mut buf = vec![0u8; nbytes];
        thread_rng().fill_bytes(&mut buf);
        Self::from_bytes_be(&buf)
    }

    /// Random integer of `nbytes` bytes with the top bit forced, so the
    /// minimal encoding is exactly `nbytes` long. `nbytes` must be nonzero.
    pub fn random_of_length(nbytes: usize) -> Self {
        let r = Self::random(nbytes);
        BigNumber { bn: r.bn | (BigUint::one() << (nbytes * 8 - 1)) }
    }

    /// Check if the number is zero
    pub fn is_zero(&self) -> bool {
        self.bn.is_zero()
    }

    /// Modular exponentiation: self^exp mod modulus
    pub fn mod_exp(&self, exp: &BigNumber, modulus: &BigNumber) -> BigNumber {
        BigNumber {
            bn: self.bn.modpow(&exp.bn, &modulus.bn),
        }
    }

    /// Modular subtraction: (self - rhs) mod modulus, well defined even
    /// when rhs exceeds self
    pub fn mod_sub(&self, rhs: &BigNumber, modulus: &BigNumber) -> BigNumber {
        let a = &self.bn % &modulus.bn;
        let b = &rhs.bn % &modulus.bn;
        BigNumber {
            bn: (a + &modulus.bn - b) % &modulus.bn,
        }
    }

    /// Number of bytes in the minimal encoding
    pub fn num_bytes(&self) -> usize {
        let bits = self.bn.bits() as usize;
        bits.div_ceil(8)
    }

    /// Minimal big-endian encoding; zero encodes to the empty vector
    pub fn to_bytes_be(&self) -> Vec<u8> {
        if self.bn.is_zero() {
            Vec::new()
        } else {
            self.bn.to_bytes_be()
        }
    }

    /// Uppercase hex string, "0" for zero
    pub fn to_hex_str(&self) -> String {
        if self.bn.is_zero() {
            return "0".to_string();
        }
        format!("{:X}", self.bn)
    }
}

// Arithmetic operator implementations

impl std::ops::Add for &BigNumber {
    type Output = BigNumber;
    fn add(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn + &rhs.bn,
        }
    }
}

impl std::ops::Mul for &BigNumber {
    type Output = BigNumber;
    fn mul(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn * &rhs.bn,
        }
    }
}

impl std::ops::Rem for &BigNumber {
    type Output = BigNumber;
    fn rem(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn % &rhs.bn,
        }
    }
}

impl PartialEq for BigNumber {
    fn eq(&self, other: &Self) -> bool {
        self.bn == other.bn
    }
}

impl Eq for BigNumber {}
