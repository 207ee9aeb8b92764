//! The Edwards25519 back-end: `curve25519-dalek` points with the
//! `edwards25519_XMD:SHA-512_ELL2_RO_` hash-to-curve suite.

use ctfield::FieldParams;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, IsIdentity};
use hash2curve::{hash_to_field, Elligator2, MappedPoint};
use hex_literal::hex;
use once_cell::sync::Lazy;
use rand_core::OsRng;
use sha2::Sha512;

use crate::error::Error;

/// Expansion length for 128-bit security over the 255-bit field.
const SECURITY_LENGTH: usize = 48;

/// 2^255 - 19.
static BASE_FIELD: Lazy<FieldParams> = Lazy::new(|| {
    FieldParams::new(&hex!(
        "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed"
    ))
});

/// The prime subgroup order l = 2^252 + 27742317777372353535851937790883648493.
static SCALAR_FIELD: Lazy<FieldParams> = Lazy::new(|| {
    FieldParams::new(&hex!(
        "1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed"
    ))
});

static ELLIGATOR: Lazy<Elligator2> = Lazy::new(|| Elligator2::new(&BASE_FIELD));

pub(crate) fn base() -> EdwardsPoint {
    curve25519_dalek::constants::ED25519_BASEPOINT_POINT
}

pub(crate) fn identity() -> EdwardsPoint {
    EdwardsPoint::identity()
}

pub(crate) fn random_scalar() -> Scalar {
    loop {
        let scalar = Scalar::random(&mut OsRng);
        if scalar != Scalar::ZERO {
            return scalar;
        }
    }
}

/// Canonical little-endian scalar decoding; rejects unreduced values.
pub(crate) fn decode_scalar(bytes: &[u8]) -> Result<Scalar, Error> {
    let array: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidScalarLength)?;
    Option::<Scalar>::from(Scalar::from_canonical_bytes(array)).ok_or(Error::ScalarInvalidEncoding)
}

/// Decodes a compressed Edwards point. Rejects non-canonical encodings
/// (catching them by recompression), the identity, and points outside the
/// prime-order subgroup.
pub(crate) fn decode_element(bytes: &[u8]) -> Result<EdwardsPoint, Error> {
    if bytes.len() != 32 {
        return Err(Error::InvalidPointLength);
    }
    let compressed =
        CompressedEdwardsY::from_slice(bytes).map_err(|_| Error::InvalidPointLength)?;
    let point = compressed.decompress().ok_or(Error::InvalidPointEncoding)?;
    if point.compress().as_bytes()[..] != bytes[..] {
        return Err(Error::InvalidPointEncoding);
    }
    if point.is_identity() {
        return Err(Error::IdentityPoint);
    }
    if !point.is_torsion_free() {
        return Err(Error::InvalidPointEncoding);
    }
    Ok(point)
}

/// Two Elligator 2 outputs added, then cleared through the cofactor (8).
pub(crate) fn hash_to_group(input: &[u8], dst: &[u8]) -> Result<EdwardsPoint, Error> {
    let u = hash_to_field::<Sha512>(&BASE_FIELD, SECURITY_LENGTH, &[input], dst, 2)?;
    let q0 = mapped_to_point(&ELLIGATOR.map_to_edwards(&u[0]));
    let q1 = mapped_to_point(&ELLIGATOR.map_to_edwards(&u[1]));
    Ok((q0 + q1).mul_by_cofactor())
}

/// Non-uniform variant: a single map output, cofactor cleared.
pub(crate) fn encode_to_group(input: &[u8], dst: &[u8]) -> Result<EdwardsPoint, Error> {
    let u = hash_to_field::<Sha512>(&BASE_FIELD, SECURITY_LENGTH, &[input], dst, 1)?;
    let q = mapped_to_point(&ELLIGATOR.map_to_edwards(&u[0]));
    Ok(q.mul_by_cofactor())
}

/// 48 uniform bytes reduced (big-endian) modulo the subgroup order, then
/// re-expressed in the canonical little-endian form.
pub(crate) fn hash_to_scalar(input: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
    let fe = hash_to_field::<Sha512>(&SCALAR_FIELD, SECURITY_LENGTH, &[input], dst, 1)?;
    let mut le = [0u8; 32];
    for (dst_byte, src_byte) in le.iter_mut().zip(fe[0].encode().iter().rev()) {
        *dst_byte = *src_byte;
    }
    Ok(Option::<Scalar>::from(Scalar::from_canonical_bytes(le))
        .expect("reduced scalar is canonical"))
}

/// Montgomery u-coordinate, the x-only channel of this curve.
pub(crate) fn x_coordinate(point: &EdwardsPoint) -> Vec<u8> {
    point.to_montgomery().to_bytes().to_vec()
}

fn mapped_to_point(mapped: &MappedPoint) -> EdwardsPoint {
    // Compressed form: little-endian y with the sign of x in the top bit.
    let mut bytes = [0u8; 32];
    for (dst_byte, src_byte) in bytes.iter_mut().zip(mapped.y.encode().iter().rev()) {
        *dst_byte = *src_byte;
    }
    bytes[31] |= mapped.x.sgn0().unwrap_u8() << 7;
    CompressedEdwardsY(bytes)
        .decompress()
        .expect("mapped point is on the curve")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DST: &[u8] = b"QUUX-V01-CS02-with-edwards25519_XMD:SHA-512_ELL2_RO_";

    #[test]
    fn hash_to_group_vectors() {
        // RFC 9380 J.5.1 outputs in compressed Edwards form.
        let cases: [(&[u8], [u8; 32]); 3] = [
            (
                b"",
                hex!("21dc15e10253796df23a7699c8a383ea624cce88c52431f6be220b1a56c8a609"),
            ),
            (
                b"abc",
                hex!("31558a26887f23fb8218f143e69d5f0af2e7831130bd5b432ef23883b895839a"),
            ),
            (
                b"abcdef0123456789",
                hex!("a661c58eea707f2171dd1a8a641e41758ac842cfd31e64dabc7f0e143d0a0653"),
            ),
        ];
        for (msg, expected) in cases {
            let point = hash_to_group(msg, DST).expect("hash");
            assert_eq!(point.compress().to_bytes(), expected);
            assert!(point.is_torsion_free());
        }
    }

    #[test]
    fn hashed_points_are_in_the_prime_subgroup() {
        let point = hash_to_group(b"subgroup check", DST).expect("hash");
        assert!(point.is_torsion_free());
        assert!(!point.is_identity());
    }

    #[test]
    fn decode_rejects_non_canonical_y() {
        // y = p is a non-canonical encoding of y = 0.
        let bytes = hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        assert_eq!(decode_element(&bytes), Err(Error::InvalidPointEncoding));
    }

    #[test]
    fn decode_rejects_identity_and_small_order() {
        // (0, 1) is the identity.
        let mut identity_bytes = [0u8; 32];
        identity_bytes[0] = 1;
        assert_eq!(decode_element(&identity_bytes), Err(Error::IdentityPoint));
        // (0, -1) has order 2.
        let order_two = hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        assert_eq!(decode_element(&order_two), Err(Error::InvalidPointEncoding));
    }

    #[test]
    fn scalar_decode_requires_reduction() {
        // l itself is not canonical.
        let l_bytes = hex!("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010");
        assert_eq!(decode_scalar(&l_bytes), Err(Error::ScalarInvalidEncoding));
        let mut one = [0u8; 32];
        one[0] = 1;
        assert_eq!(decode_scalar(&one), Ok(Scalar::ONE));
    }
}
