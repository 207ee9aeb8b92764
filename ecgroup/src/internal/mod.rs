//! Per-curve back-ends and the tagged representations dispatched over them.

pub(crate) mod edwards;
pub(crate) mod nist;
pub(crate) mod ristretto;
pub(crate) mod secp256k1;

pub(crate) use nist::{p256_backend, p384_backend, p521_backend};

use elliptic_curve::group::Group as _;
use elliptic_curve::{Field, PrimeField};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::error::Error;
use crate::group::Group;

/// Constant-time exponentiation over any multiplicative scalar type, used
/// by the back-ends whose native scalar API has no `pow`.
pub(crate) fn pow_ct<S>(base: &S, one: S, exponent_be: &[u8]) -> S
where
    S: Copy + ConditionallySelectable + core::ops::Mul<S, Output = S>,
{
    let mut acc = one;
    for byte in exponent_be {
        for bit_index in (0..8).rev() {
            acc = acc * acc;
            let multiplied = acc * *base;
            let bit = Choice::from((byte >> bit_index) & 1);
            acc = S::conditional_select(&acc, &multiplied, bit);
        }
    }
    acc
}

/// Constant-time `a <= b` over equal-length big-endian encodings.
pub(crate) fn le_bytes_be(a: &[u8], b: &[u8]) -> Choice {
    debug_assert_eq!(a.len(), b.len());
    // b - a underflows exactly when a > b.
    let mut borrow = 0u16;
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        let diff = (*y as u16).wrapping_sub(*x as u16).wrapping_sub(borrow);
        borrow = (diff >> 15) & 1;
    }
    Choice::from((borrow ^ 1) as u8)
}

/// The scalar of one of the supported groups.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ScalarRepr {
    Ristretto255(curve25519_dalek::scalar::Scalar),
    Edwards25519(curve25519_dalek::scalar::Scalar),
    P256(p256::Scalar),
    P384(p384::Scalar),
    P521(p521::Scalar),
    Secp256k1(secp256k1::Scalar),
}

impl ScalarRepr {
    pub(crate) fn zero(group: Group) -> Self {
        use curve25519_dalek::scalar::Scalar as DalekScalar;
        match group {
            Group::Ristretto255Sha512 => Self::Ristretto255(DalekScalar::ZERO),
            Group::Edwards25519Sha512 => Self::Edwards25519(DalekScalar::ZERO),
            Group::P256Sha256 => Self::P256(p256::Scalar::ZERO),
            Group::P384Sha384 => Self::P384(p384::Scalar::ZERO),
            Group::P521Sha512 => Self::P521(p521::Scalar::ZERO),
            Group::Secp256k1Sha256 => Self::Secp256k1(secp256k1::Scalar::zero()),
        }
    }

    pub(crate) fn one(group: Group) -> Self {
        use curve25519_dalek::scalar::Scalar as DalekScalar;
        match group {
            Group::Ristretto255Sha512 => Self::Ristretto255(DalekScalar::ONE),
            Group::Edwards25519Sha512 => Self::Edwards25519(DalekScalar::ONE),
            Group::P256Sha256 => Self::P256(p256::Scalar::ONE),
            Group::P384Sha384 => Self::P384(p384::Scalar::ONE),
            Group::P521Sha512 => Self::P521(p521::Scalar::ONE),
            Group::Secp256k1Sha256 => Self::Secp256k1(secp256k1::Scalar::one()),
        }
    }

    pub(crate) fn from_u64(group: Group, value: u64) -> Self {
        use curve25519_dalek::scalar::Scalar as DalekScalar;
        match group {
            Group::Ristretto255Sha512 => Self::Ristretto255(DalekScalar::from(value)),
            Group::Edwards25519Sha512 => Self::Edwards25519(DalekScalar::from(value)),
            Group::P256Sha256 => Self::P256(p256::Scalar::from(value)),
            Group::P384Sha384 => Self::P384(p384::Scalar::from(value)),
            Group::P521Sha512 => Self::P521(p521::Scalar::from(value)),
            Group::Secp256k1Sha256 => Self::Secp256k1(secp256k1::Scalar::from_u64(value)),
        }
    }

    pub(crate) fn random(group: Group) -> Self {
        match group {
            Group::Ristretto255Sha512 => Self::Ristretto255(ristretto::random_scalar()),
            Group::Edwards25519Sha512 => Self::Edwards25519(edwards::random_scalar()),
            Group::P256Sha256 => Self::P256(p256_backend::random_scalar()),
            Group::P384Sha384 => Self::P384(p384_backend::random_scalar()),
            Group::P521Sha512 => Self::P521(p521_backend::random_scalar()),
            Group::Secp256k1Sha256 => Self::Secp256k1(secp256k1::random_scalar()),
        }
    }

    pub(crate) fn decode(group: Group, bytes: &[u8]) -> Result<Self, Error> {
        match group {
            Group::Ristretto255Sha512 => ristretto::decode_scalar(bytes).map(Self::Ristretto255),
            Group::Edwards25519Sha512 => edwards::decode_scalar(bytes).map(Self::Edwards25519),
            Group::P256Sha256 => p256_backend::decode_scalar(bytes).map(Self::P256),
            Group::P384Sha384 => p384_backend::decode_scalar(bytes).map(Self::P384),
            Group::P521Sha512 => p521_backend::decode_scalar(bytes).map(Self::P521),
            Group::Secp256k1Sha256 => {
                if bytes.len() != 32 {
                    return Err(Error::InvalidScalarLength);
                }
                Option::<secp256k1::Scalar>::from(secp256k1::Scalar::from_bytes(bytes))
                    .map(Self::Secp256k1)
                    .ok_or(Error::ScalarTooBig)
            }
        }
    }

    pub(crate) fn hash(group: Group, input: &[u8], dst: &[u8]) -> Result<Self, Error> {
        match group {
            Group::Ristretto255Sha512 => {
                ristretto::hash_to_scalar(input, dst).map(Self::Ristretto255)
            }
            Group::Edwards25519Sha512 => edwards::hash_to_scalar(input, dst).map(Self::Edwards25519),
            Group::P256Sha256 => p256_backend::hash_to_scalar(input, dst).map(Self::P256),
            Group::P384Sha384 => p384_backend::hash_to_scalar(input, dst).map(Self::P384),
            Group::P521Sha512 => p521_backend::hash_to_scalar(input, dst).map(Self::P521),
            Group::Secp256k1Sha256 => secp256k1::hash_to_scalar(input, dst).map(Self::Secp256k1),
        }
    }

    pub(crate) fn add(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Ristretto255(a), Self::Ristretto255(b)) => Self::Ristretto255(a + b),
            (Self::Edwards25519(a), Self::Edwards25519(b)) => Self::Edwards25519(a + b),
            (Self::P256(a), Self::P256(b)) => Self::P256(a + b),
            (Self::P384(a), Self::P384(b)) => Self::P384(a + b),
            (Self::P521(a), Self::P521(b)) => Self::P521(a + b),
            (Self::Secp256k1(a), Self::Secp256k1(b)) => Self::Secp256k1(a + b),
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    pub(crate) fn sub(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Ristretto255(a), Self::Ristretto255(b)) => Self::Ristretto255(a - b),
            (Self::Edwards25519(a), Self::Edwards25519(b)) => Self::Edwards25519(a - b),
            (Self::P256(a), Self::P256(b)) => Self::P256(a - b),
            (Self::P384(a), Self::P384(b)) => Self::P384(a - b),
            (Self::P521(a), Self::P521(b)) => Self::P521(a - b),
            (Self::Secp256k1(a), Self::Secp256k1(b)) => Self::Secp256k1(a - b),
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    pub(crate) fn mul(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Ristretto255(a), Self::Ristretto255(b)) => Self::Ristretto255(a * b),
            (Self::Edwards25519(a), Self::Edwards25519(b)) => Self::Edwards25519(a * b),
            (Self::P256(a), Self::P256(b)) => Self::P256(a * b),
            (Self::P384(a), Self::P384(b)) => Self::P384(a * b),
            (Self::P521(a), Self::P521(b)) => Self::P521(a * b),
            (Self::Secp256k1(a), Self::Secp256k1(b)) => Self::Secp256k1(a * b),
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    pub(crate) fn pow(&self, exponent: &Self) -> Self {
        match (self, exponent) {
            (Self::Ristretto255(a), Self::Ristretto255(b)) => {
                let mut be = b.to_bytes();
                be.reverse();
                Self::Ristretto255(pow_ct(a, curve25519_dalek::scalar::Scalar::ONE, &be))
            }
            (Self::Edwards25519(a), Self::Edwards25519(b)) => {
                let mut be = b.to_bytes();
                be.reverse();
                Self::Edwards25519(pow_ct(a, curve25519_dalek::scalar::Scalar::ONE, &be))
            }
            (Self::P256(a), Self::P256(b)) => {
                Self::P256(pow_ct(a, p256::Scalar::ONE, &b.to_repr()))
            }
            (Self::P384(a), Self::P384(b)) => {
                Self::P384(pow_ct(a, p384::Scalar::ONE, &b.to_repr()))
            }
            (Self::P521(a), Self::P521(b)) => {
                Self::P521(pow_ct(a, p521::Scalar::ONE, &b.to_repr()))
            }
            (Self::Secp256k1(a), Self::Secp256k1(b)) => Self::Secp256k1(a.pow(b)),
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    pub(crate) fn negate(&self) -> Self {
        match self {
            Self::Ristretto255(a) => Self::Ristretto255(-*a),
            Self::Edwards25519(a) => Self::Edwards25519(-*a),
            Self::P256(a) => Self::P256(-*a),
            Self::P384(a) => Self::P384(-*a),
            Self::P521(a) => Self::P521(-*a),
            Self::Secp256k1(a) => Self::Secp256k1(a.negate()),
        }
    }

    /// Modular inverse; zero is left unchanged (callers check `is_zero`).
    pub(crate) fn invert(&self) -> Self {
        match self {
            // The dalek inversion is an exponentiation chain, defined (and
            // zero-preserving) for every input.
            Self::Ristretto255(a) => Self::Ristretto255(a.invert()),
            Self::Edwards25519(a) => Self::Edwards25519(a.invert()),
            Self::P256(a) => Self::P256(a.invert().unwrap_or(*a)),
            Self::P384(a) => Self::P384(a.invert().unwrap_or(*a)),
            Self::P521(a) => Self::P521(a.invert().unwrap_or(*a)),
            Self::Secp256k1(a) => Self::Secp256k1(a.invert().unwrap_or(*a)),
        }
    }

    pub(crate) fn is_zero(&self) -> Choice {
        match self {
            Self::Ristretto255(a) | Self::Edwards25519(a) => {
                a.ct_eq(&curve25519_dalek::scalar::Scalar::ZERO)
            }
            Self::P256(a) => a.is_zero(),
            Self::P384(a) => a.is_zero(),
            Self::P521(a) => a.is_zero(),
            Self::Secp256k1(a) => a.is_zero(),
        }
    }

    pub(crate) fn ct_eq(&self, rhs: &Self) -> Choice {
        match (self, rhs) {
            (Self::Ristretto255(a), Self::Ristretto255(b)) => a.ct_eq(b),
            (Self::Edwards25519(a), Self::Edwards25519(b)) => a.ct_eq(b),
            (Self::P256(a), Self::P256(b)) => a.ct_eq(b),
            (Self::P384(a), Self::P384(b)) => a.ct_eq(b),
            (Self::P521(a), Self::P521(b)) => a.ct_eq(b),
            (Self::Secp256k1(a), Self::Secp256k1(b)) => a.ct_eq(b),
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    /// Constant-time `self <= rhs` over canonical encodings, compared as
    /// integers.
    pub(crate) fn less_or_equal(&self, rhs: &Self) -> Choice {
        let (a, b) = (self.to_be_integer(), rhs.to_be_integer());
        le_bytes_be(&a, &b)
    }

    /// Canonical wire encoding (little-endian for the 25519 groups,
    /// big-endian elsewhere).
    pub(crate) fn encode(&self) -> Vec<u8> {
        match self {
            Self::Ristretto255(a) | Self::Edwards25519(a) => a.to_bytes().to_vec(),
            Self::P256(a) => a.to_repr().to_vec(),
            Self::P384(a) => a.to_repr().to_vec(),
            Self::P521(a) => a.to_repr().to_vec(),
            Self::Secp256k1(a) => a.to_bytes().to_vec(),
        }
    }

    /// Big-endian integer view of the canonical encoding.
    fn to_be_integer(&self) -> Vec<u8> {
        let mut bytes = self.encode();
        if matches!(self, Self::Ristretto255(_) | Self::Edwards25519(_)) {
            bytes.reverse();
        }
        bytes
    }
}

impl Zeroize for ScalarRepr {
    fn zeroize(&mut self) {
        match self {
            Self::Ristretto255(a) | Self::Edwards25519(a) => a.zeroize(),
            Self::P256(a) => a.zeroize(),
            Self::P384(a) => a.zeroize(),
            Self::P521(a) => a.zeroize(),
            Self::Secp256k1(a) => a.zeroize(),
        }
    }
}

/// The element of one of the supported groups.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ElementRepr {
    Ristretto255(curve25519_dalek::ristretto::RistrettoPoint),
    Edwards25519(curve25519_dalek::edwards::EdwardsPoint),
    P256(p256::ProjectivePoint),
    P384(p384::ProjectivePoint),
    P521(p521::ProjectivePoint),
    Secp256k1(secp256k1::ProjectivePoint),
}

impl ElementRepr {
    pub(crate) fn identity(group: Group) -> Self {
        match group {
            Group::Ristretto255Sha512 => Self::Ristretto255(ristretto::identity()),
            Group::Edwards25519Sha512 => Self::Edwards25519(edwards::identity()),
            Group::P256Sha256 => Self::P256(p256_backend::identity()),
            Group::P384Sha384 => Self::P384(p384_backend::identity()),
            Group::P521Sha512 => Self::P521(p521_backend::identity()),
            Group::Secp256k1Sha256 => Self::Secp256k1(secp256k1::ProjectivePoint::IDENTITY),
        }
    }

    pub(crate) fn base(group: Group) -> Self {
        match group {
            Group::Ristretto255Sha512 => Self::Ristretto255(ristretto::base()),
            Group::Edwards25519Sha512 => Self::Edwards25519(edwards::base()),
            Group::P256Sha256 => Self::P256(p256_backend::base()),
            Group::P384Sha384 => Self::P384(p384_backend::base()),
            Group::P521Sha512 => Self::P521(p521_backend::base()),
            Group::Secp256k1Sha256 => Self::Secp256k1(secp256k1::ProjectivePoint::GENERATOR),
        }
    }

    pub(crate) fn decode(group: Group, bytes: &[u8]) -> Result<Self, Error> {
        match group {
            Group::Ristretto255Sha512 => ristretto::decode_element(bytes).map(Self::Ristretto255),
            Group::Edwards25519Sha512 => edwards::decode_element(bytes).map(Self::Edwards25519),
            Group::P256Sha256 => p256_backend::decode_element(bytes).map(Self::P256),
            Group::P384Sha384 => p384_backend::decode_element(bytes).map(Self::P384),
            Group::P521Sha512 => p521_backend::decode_element(bytes).map(Self::P521),
            Group::Secp256k1Sha256 => secp256k1::decode_point(bytes).map(Self::Secp256k1),
        }
    }

    pub(crate) fn hash(group: Group, input: &[u8], dst: &[u8]) -> Result<Self, Error> {
        match group {
            Group::Ristretto255Sha512 => ristretto::hash_to_group(input, dst).map(Self::Ristretto255),
            Group::Edwards25519Sha512 => edwards::hash_to_group(input, dst).map(Self::Edwards25519),
            Group::P256Sha256 => p256_backend::hash_to_group(input, dst).map(Self::P256),
            Group::P384Sha384 => p384_backend::hash_to_group(input, dst).map(Self::P384),
            Group::P521Sha512 => p521_backend::hash_to_group(input, dst).map(Self::P521),
            Group::Secp256k1Sha256 => secp256k1::hash_to_group(input, dst).map(Self::Secp256k1),
        }
    }

    pub(crate) fn encode_to(group: Group, input: &[u8], dst: &[u8]) -> Result<Self, Error> {
        match group {
            Group::Ristretto255Sha512 => {
                ristretto::encode_to_group(input, dst).map(Self::Ristretto255)
            }
            Group::Edwards25519Sha512 => edwards::encode_to_group(input, dst).map(Self::Edwards25519),
            Group::P256Sha256 => p256_backend::encode_to_group(input, dst).map(Self::P256),
            Group::P384Sha384 => p384_backend::encode_to_group(input, dst).map(Self::P384),
            Group::P521Sha512 => p521_backend::encode_to_group(input, dst).map(Self::P521),
            Group::Secp256k1Sha256 => secp256k1::encode_to_group(input, dst).map(Self::Secp256k1),
        }
    }

    pub(crate) fn add(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Ristretto255(a), Self::Ristretto255(b)) => Self::Ristretto255(a + b),
            (Self::Edwards25519(a), Self::Edwards25519(b)) => Self::Edwards25519(a + b),
            (Self::P256(a), Self::P256(b)) => Self::P256(a + b),
            (Self::P384(a), Self::P384(b)) => Self::P384(a + b),
            (Self::P521(a), Self::P521(b)) => Self::P521(a + b),
            (Self::Secp256k1(a), Self::Secp256k1(b)) => Self::Secp256k1(a.add(b)),
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    pub(crate) fn sub(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Ristretto255(a), Self::Ristretto255(b)) => Self::Ristretto255(a - b),
            (Self::Edwards25519(a), Self::Edwards25519(b)) => Self::Edwards25519(a - b),
            (Self::P256(a), Self::P256(b)) => Self::P256(a - b),
            (Self::P384(a), Self::P384(b)) => Self::P384(a - b),
            (Self::P521(a), Self::P521(b)) => Self::P521(a - b),
            (Self::Secp256k1(a), Self::Secp256k1(b)) => Self::Secp256k1(a.sub(b)),
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    pub(crate) fn double(&self) -> Self {
        match self {
            Self::Ristretto255(a) => Self::Ristretto255(a + a),
            Self::Edwards25519(a) => Self::Edwards25519(a + a),
            Self::P256(a) => Self::P256(a.double()),
            Self::P384(a) => Self::P384(a.double()),
            Self::P521(a) => Self::P521(a.double()),
            Self::Secp256k1(a) => Self::Secp256k1(a.double()),
        }
    }

    pub(crate) fn negate(&self) -> Self {
        match self {
            Self::Ristretto255(a) => Self::Ristretto255(-*a),
            Self::Edwards25519(a) => Self::Edwards25519(-*a),
            Self::P256(a) => Self::P256(-*a),
            Self::P384(a) => Self::P384(-*a),
            Self::P521(a) => Self::P521(-*a),
            Self::Secp256k1(a) => Self::Secp256k1(a.negate()),
        }
    }

    pub(crate) fn multiply(&self, scalar: &ScalarRepr) -> Self {
        match (self, scalar) {
            (Self::Ristretto255(p), ScalarRepr::Ristretto255(s)) => Self::Ristretto255(p * s),
            (Self::Edwards25519(p), ScalarRepr::Edwards25519(s)) => Self::Edwards25519(p * s),
            (Self::P256(p), ScalarRepr::P256(s)) => Self::P256(p * s),
            (Self::P384(p), ScalarRepr::P384(s)) => Self::P384(p * s),
            (Self::P521(p), ScalarRepr::P521(s)) => Self::P521(p * s),
            (Self::Secp256k1(p), ScalarRepr::Secp256k1(s)) => {
                Self::Secp256k1(p.mul(&s.to_bytes()))
            }
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    pub(crate) fn ct_eq(&self, rhs: &Self) -> Choice {
        match (self, rhs) {
            (Self::Ristretto255(a), Self::Ristretto255(b)) => a.ct_eq(b),
            (Self::Edwards25519(a), Self::Edwards25519(b)) => a.ct_eq(b),
            (Self::P256(a), Self::P256(b)) => a.to_affine().ct_eq(&b.to_affine()),
            (Self::P384(a), Self::P384(b)) => a.to_affine().ct_eq(&b.to_affine()),
            (Self::P521(a), Self::P521(b)) => a.to_affine().ct_eq(&b.to_affine()),
            (Self::Secp256k1(a), Self::Secp256k1(b)) => a.ct_eq(b),
            _ => unreachable!("group tags are checked by the caller"),
        }
    }

    pub(crate) fn is_identity(&self) -> Choice {
        match self {
            Self::Ristretto255(a) => {
                use curve25519_dalek::traits::IsIdentity;
                Choice::from(a.is_identity() as u8)
            }
            Self::Edwards25519(a) => {
                use curve25519_dalek::traits::IsIdentity;
                Choice::from(a.is_identity() as u8)
            }
            Self::P256(a) => a.is_identity(),
            Self::P384(a) => a.is_identity(),
            Self::P521(a) => a.is_identity(),
            Self::Secp256k1(a) => a.is_identity(),
        }
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        match self {
            Self::Ristretto255(a) => a.compress().to_bytes().to_vec(),
            Self::Edwards25519(a) => a.compress().to_bytes().to_vec(),
            Self::P256(a) => p256_backend::encode_element(a),
            Self::P384(a) => p384_backend::encode_element(a),
            Self::P521(a) => p521_backend::encode_element(a),
            Self::Secp256k1(a) => secp256k1::encode_point(a),
        }
    }

    /// The x-only channel: affine x for the Weierstrass curves, the
    /// Montgomery u-coordinate for Edwards25519, and the full canonical
    /// encoding for Ristretto255 (which exposes no coordinates).
    pub(crate) fn x_coordinate(&self) -> Vec<u8> {
        match self {
            Self::Ristretto255(a) => a.compress().to_bytes().to_vec(),
            Self::Edwards25519(a) => edwards::x_coordinate(a),
            Self::P256(a) => p256_backend::x_coordinate(a),
            Self::P384(a) => p384_backend::x_coordinate(a),
            Self::P521(a) => p521_backend::x_coordinate(a),
            Self::Secp256k1(a) => secp256k1::x_coordinate(a),
        }
    }
}
