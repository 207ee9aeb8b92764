//! The secp256k1 back-end, implemented from first principles.
//!
//! Hashing to the group follows the `secp256k1_XMD:SHA-256_SSWU_RO_` suite:
//! SSWU targets the 3-isogenous curve E' (A', B' below, Z = -11) and the
//! rational isogeny of RFC 9380 §E.1 carries the result onto secp256k1.

pub(crate) mod field;
pub(crate) mod point;
pub(crate) mod scalar;

use ctfield::FieldParams;
use hash2curve::{hash_to_field, Isogeny, MappedPoint, SswuParams};
use hex_literal::hex;
use once_cell::sync::Lazy;
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use subtle::Choice;

use crate::error::Error;
pub(crate) use point::{AffinePoint, JacobianPoint, ProjectivePoint};
pub(crate) use scalar::Scalar;

/// Expansion length for 128-bit security over a 256-bit field.
const SECURITY_LENGTH: usize = 48;

/// p = 2^256 - 2^32 - 977, as the runtime field backing the curve maps.
static BASE_FIELD: Lazy<FieldParams> = Lazy::new(|| {
    FieldParams::new(&hex!(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"
    ))
});

/// SSWU on the 3-isogenous curve, plus the map back to secp256k1.
static SSWU: Lazy<SswuParams> = Lazy::new(|| {
    let fe = |bytes: &[u8]| BASE_FIELD.decode(bytes).expect("curve constant");

    let a = fe(&hex!(
        "3f8731abdd661adca08a5558f0f5d272e953d363cb6f0e5d405447c01a444533"
    ));
    let b = BASE_FIELD.from_u64(1771);
    let z = BASE_FIELD.from_u64(11).negate();

    let x_num = vec![
        fe(&hex!(
            "8e38e38e38e38e38e38e38e38e38e38e38e38e38e38e38e38e38e38daaaaa8c7"
        )),
        fe(&hex!(
            "07d3d4c80bc321d5b9f315cea7fd44c5d595d2fc0bf63b92dfff1044f17c6581"
        )),
        fe(&hex!(
            "534c328d23f234e6e2a413deca25caece4506144037c40314ecbd0b53d9dd262"
        )),
        fe(&hex!(
            "8e38e38e38e38e38e38e38e38e38e38e38e38e38e38e38e38e38e38daaaaa88c"
        )),
    ];
    let x_den = vec![
        fe(&hex!(
            "d35771193d94918a9ca34ccbb7b640dd86cd409542f8487d9fe6b745781eb49b"
        )),
        fe(&hex!(
            "edadc6f64383dc1df7c4b2d51b54225406d36b641f5e41bbc52a56612a8c6d14"
        )),
        BASE_FIELD.one(),
    ];
    let y_num = vec![
        fe(&hex!(
            "4bda12f684bda12f684bda12f684bda12f684bda12f684bda12f684b8e38e23c"
        )),
        fe(&hex!(
            "c75e0c32d5cb7c0fa9d0a54b12a0a6d5647ab046d686da6fdffc90fc201d71a3"
        )),
        fe(&hex!(
            "29a6194691f91a73715209ef6512e576722830a201be2018a765e85a9ecee931"
        )),
        fe(&hex!(
            "2f684bda12f684bda12f684bda12f684bda12f684bda12f684bda12f38e38d84"
        )),
    ];
    let y_den = vec![
        fe(&hex!(
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffff93b"
        )),
        fe(&hex!(
            "7a06534bb8bdb49fd5e9e6632722c2989467c1bfc8e8d978dfb425d2685c2573"
        )),
        fe(&hex!(
            "6484aa716545ca2cf3a70c3fa8fe337e0a3d21162f0d6299a7bf8192bfd2a76f"
        )),
        BASE_FIELD.one(),
    ];

    SswuParams::new(
        &BASE_FIELD,
        a,
        b,
        z,
        Some(Isogeny::new(x_num, x_den, y_num, y_den)),
    )
});

/// `hash_to_curve` for secp256k1: two map outputs added on the
/// public-input Jacobian path, then normalized.
pub(crate) fn hash_to_group(input: &[u8], dst: &[u8]) -> Result<ProjectivePoint, Error> {
    let u = hash_to_field::<Sha256>(&BASE_FIELD, SECURITY_LENGTH, &[input], dst, 2)?;
    let q0 = JacobianPoint::from_affine(&mapped_to_affine(&SSWU.map_to_curve(&u[0])));
    let q1 = JacobianPoint::from_affine(&mapped_to_affine(&SSWU.map_to_curve(&u[1])));
    let sum = q0.add(&q1).to_affine();
    Ok(ProjectivePoint::from_affine(&sum))
}

/// `encode_to_curve` (non-uniform variant): a single map output.
pub(crate) fn encode_to_group(input: &[u8], dst: &[u8]) -> Result<ProjectivePoint, Error> {
    let u = hash_to_field::<Sha256>(&BASE_FIELD, SECURITY_LENGTH, &[input], dst, 1)?;
    let mapped = mapped_to_affine(&SSWU.map_to_curve(&u[0]));
    Ok(ProjectivePoint::from_affine(&mapped))
}

pub(crate) fn hash_to_scalar(input: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
    let fe = hash_to_field::<Sha256>(&scalar::SCALAR_FIELD, SECURITY_LENGTH, &[input], dst, 1)?;
    Ok(Scalar(fe[0]))
}

/// Uniform random non-zero scalar by rejection sampling the OS RNG.
pub(crate) fn random_scalar() -> Scalar {
    loop {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        if let Some(scalar) = Option::<Scalar>::from(Scalar::from_bytes(&bytes)) {
            if !bool::from(scalar.is_zero()) {
                return scalar;
            }
        }
    }
}

/// SEC1 compressed encoding; the identity is the single byte 0x00.
pub(crate) fn encode_point(point: &ProjectivePoint) -> Vec<u8> {
    let affine = point.to_affine();
    if affine.infinity == 1 {
        return vec![0u8];
    }
    let mut out = Vec::with_capacity(33);
    out.push(2 | affine.y.is_odd().unwrap_u8());
    out.extend_from_slice(&affine.x.to_bytes());
    out
}

pub(crate) fn decode_point(bytes: &[u8]) -> Result<ProjectivePoint, Error> {
    if bytes.len() != 33 {
        return Err(Error::InvalidPointLength);
    }
    let tag = bytes[0];
    if tag != 2 && tag != 3 {
        return Err(Error::InvalidPointEncoding);
    }
    let mut x_bytes = [0u8; 32];
    x_bytes.copy_from_slice(&bytes[1..]);
    let y_is_odd = Choice::from(tag & 1);
    Option::<AffinePoint>::from(AffinePoint::decompress(&x_bytes, y_is_odd))
        .map(|affine| ProjectivePoint::from_affine(&affine))
        .ok_or(Error::InvalidPointEncoding)
}

/// Raw affine x, big-endian; all zero for the identity.
pub(crate) fn x_coordinate(point: &ProjectivePoint) -> Vec<u8> {
    point.to_affine().x.to_bytes().to_vec()
}

fn mapped_to_affine(mapped: &MappedPoint) -> AffinePoint {
    let coordinate = |fe: &ctfield::FieldElement| {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&fe.encode());
        field::FieldElement::from_bytes(&bytes).expect("map output is canonical")
    };
    AffinePoint {
        x: coordinate(&mapped.x),
        y: coordinate(&mapped.y),
        infinity: mapped.is_identity.unwrap_u8(),
    }
}
