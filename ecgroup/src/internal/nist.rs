//! NIST P-256 / P-384 / P-521 back-ends.
//!
//! Point and scalar arithmetic delegates to the RustCrypto curve crates
//! through the `elliptic-curve` trait surface; hashing to the curve runs
//! the generic SSWU map over [`ctfield`] and materializes the affine result
//! through a SEC1 uncompressed encoding.

use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use elliptic_curve::point::AffineCoordinates;
use elliptic_curve::{Field, PrimeField};

use ctfield::FieldParams;
use hash2curve::{hash_to_field, MappedPoint, SswuParams};
use hex_literal::hex;
use once_cell::sync::Lazy;
use rand_core::OsRng;

use crate::error::Error;

macro_rules! nist_backend {
    (
        $mod_name:ident,
        $curve:ident,
        $hash:ty,
        $sec_len:expr,
        $z:expr,
        $element_len:expr,
        $modulus:expr,
        $b:expr,
        $order:expr
    ) => {
        pub(crate) mod $mod_name {
            use super::*;
            use $curve::{AffinePoint, EncodedPoint, FieldBytes};
            pub(crate) use $curve::{ProjectivePoint, Scalar};

            pub(crate) const ELEMENT_LENGTH: usize = $element_len;
            pub(crate) const SCALAR_LENGTH: usize = $element_len - 1;
            pub(crate) const ORDER: &[u8] = &$order;

            static BASE_FIELD: Lazy<FieldParams> = Lazy::new(|| FieldParams::new(&$modulus));
            static SCALAR_FIELD: Lazy<FieldParams> = Lazy::new(|| FieldParams::new(&$order));
            static SSWU: Lazy<SswuParams> = Lazy::new(|| {
                let a = BASE_FIELD.from_u64(3).negate();
                let b = BASE_FIELD.decode(&$b).expect("curve constant");
                let z = BASE_FIELD.from_u64($z).negate();
                SswuParams::new(&BASE_FIELD, a, b, z, None)
            });

            pub(crate) fn base() -> ProjectivePoint {
                ProjectivePoint::GENERATOR
            }

            pub(crate) fn identity() -> ProjectivePoint {
                ProjectivePoint::IDENTITY
            }

            pub(crate) fn random_scalar() -> Scalar {
                loop {
                    let scalar = <Scalar as Field>::random(&mut OsRng);
                    if !bool::from(scalar.is_zero()) {
                        return scalar;
                    }
                }
            }

            /// Fixed-length big-endian decoding; rejects values >= n.
            pub(crate) fn decode_scalar(bytes: &[u8]) -> Result<Scalar, Error> {
                if bytes.len() != SCALAR_LENGTH {
                    return Err(Error::InvalidScalarLength);
                }
                let repr = FieldBytes::clone_from_slice(bytes);
                Option::<Scalar>::from(Scalar::from_repr(repr)).ok_or(Error::ScalarTooBig)
            }

            pub(crate) fn encode_scalar(scalar: &Scalar) -> Vec<u8> {
                scalar.to_repr().to_vec()
            }

            /// SEC1 compressed decoding: tag, canonical x, curve membership.
            pub(crate) fn decode_element(bytes: &[u8]) -> Result<ProjectivePoint, Error> {
                if bytes.len() != ELEMENT_LENGTH {
                    return Err(Error::InvalidPointLength);
                }
                if bytes[0] != 2 && bytes[0] != 3 {
                    return Err(Error::InvalidPointEncoding);
                }
                let encoded =
                    EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidPointEncoding)?;
                Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
                    .map(ProjectivePoint::from)
                    .ok_or(Error::InvalidPointEncoding)
            }

            /// SEC1 compressed encoding; the identity is the single byte 0.
            pub(crate) fn encode_element(point: &ProjectivePoint) -> Vec<u8> {
                point.to_affine().to_encoded_point(true).as_bytes().to_vec()
            }

            pub(crate) fn x_coordinate(point: &ProjectivePoint) -> Vec<u8> {
                point.to_affine().x().to_vec()
            }

            pub(crate) fn hash_to_group(
                input: &[u8],
                dst: &[u8],
            ) -> Result<ProjectivePoint, Error> {
                let u = hash_to_field::<$hash>(&BASE_FIELD, $sec_len, &[input], dst, 2)?;
                let q0 = mapped_to_point(&SSWU.map_to_curve(&u[0]));
                let q1 = mapped_to_point(&SSWU.map_to_curve(&u[1]));
                Ok(q0 + q1)
            }

            pub(crate) fn encode_to_group(
                input: &[u8],
                dst: &[u8],
            ) -> Result<ProjectivePoint, Error> {
                let u = hash_to_field::<$hash>(&BASE_FIELD, $sec_len, &[input], dst, 1)?;
                Ok(mapped_to_point(&SSWU.map_to_curve(&u[0])))
            }

            pub(crate) fn hash_to_scalar(input: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
                let fe = hash_to_field::<$hash>(&SCALAR_FIELD, $sec_len, &[input], dst, 1)?;
                let repr = FieldBytes::clone_from_slice(&fe[0].encode());
                Ok(Option::<Scalar>::from(Scalar::from_repr(repr))
                    .expect("reduced scalar is canonical"))
            }

            fn mapped_to_point(mapped: &MappedPoint) -> ProjectivePoint {
                debug_assert!(!bool::from(mapped.is_identity));
                let x = FieldBytes::clone_from_slice(&mapped.x.encode());
                let y = FieldBytes::clone_from_slice(&mapped.y.encode());
                let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
                Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
                    .map(ProjectivePoint::from)
                    .expect("SSWU output is on the curve")
            }
        }
    };
}

nist_backend!(
    p256_backend,
    p256,
    sha2::Sha256,
    48,
    10,
    33,
    hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
    hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551")
);

nist_backend!(
    p384_backend,
    p384,
    sha2::Sha384,
    72,
    12,
    49,
    hex!("fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff"),
    hex!("b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef"),
    hex!("ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973")
);

nist_backend!(
    p521_backend,
    p521,
    sha2::Sha512,
    98,
    4,
    67,
    hex!("01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"),
    hex!("0051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef109e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b503f00"),
    hex!("01fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386409")
);
