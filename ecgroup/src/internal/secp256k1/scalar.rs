//! Scalar arithmetic modulo the secp256k1 group order.

use core::ops::{Add, Mul, Neg, Sub};

use ctfield::{FieldElement, FieldParams};
use hex_literal::hex;
use once_cell::sync::Lazy;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

/// n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141.
pub const ORDER: [u8; 32] =
    hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

pub(crate) static SCALAR_FIELD: Lazy<FieldParams> = Lazy::new(|| FieldParams::new(&ORDER));

/// A scalar in [0, n), Montgomery form internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar(pub(crate) FieldElement);

impl Scalar {
    pub fn zero() -> Self {
        Self(SCALAR_FIELD.zero())
    }

    pub fn one() -> Self {
        Self(SCALAR_FIELD.one())
    }

    pub fn from_u64(value: u64) -> Self {
        Self(SCALAR_FIELD.from_u64(value))
    }

    /// Decodes a canonical 32-byte big-endian scalar; fails for values >= n.
    pub fn from_bytes(bytes: &[u8]) -> CtOption<Self> {
        let decoded = SCALAR_FIELD.decode(bytes);
        let is_some = decoded.is_some();
        CtOption::new(Self(decoded.unwrap_or_else(|| SCALAR_FIELD.zero())), is_some)
    }

    pub fn to_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0.encode());
        out
    }

    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    pub fn invert(&self) -> CtOption<Self> {
        let inverted = self.0.invert();
        let is_some = inverted.is_some();
        CtOption::new(Self(inverted.unwrap_or_else(|| SCALAR_FIELD.zero())), is_some)
    }

    /// Modular exponentiation with a fixed 256-bit scan.
    pub fn pow(&self, exponent: &Self) -> Self {
        Self(self.0.pow_be_bytes(&exponent.to_bytes()))
    }

    pub fn negate(&self) -> Self {
        Self(self.0.negate())
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(FieldElement::conditional_select(&a.0, &b.0, choice))
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;
    fn add(self, rhs: &Scalar) -> Scalar {
        Scalar(self.0.add(rhs.0))
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;
    fn sub(self, rhs: &Scalar) -> Scalar {
        Scalar(self.0.sub(rhs.0))
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;
    fn mul(self, rhs: &Scalar) -> Scalar {
        Scalar(self.0.mul(rhs.0))
    }
}

impl Neg for &Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        self.negate()
    }
}
