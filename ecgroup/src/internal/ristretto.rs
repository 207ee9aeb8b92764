//! The Ristretto255 back-end, delegating to `curve25519-dalek`.

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, IsIdentity};
use hash2curve::expand_message_xmd;
use rand_core::OsRng;
use sha2::Sha512;

use crate::error::Error;

pub(crate) fn base() -> RistrettoPoint {
    curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT
}

pub(crate) fn random_scalar() -> Scalar {
    loop {
        let scalar = Scalar::random(&mut OsRng);
        if scalar != Scalar::ZERO {
            return scalar;
        }
    }
}

/// Canonical little-endian scalar decoding.
pub(crate) fn decode_scalar(bytes: &[u8]) -> Result<Scalar, Error> {
    let array: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidScalarLength)?;
    Option::<Scalar>::from(Scalar::from_canonical_bytes(array)).ok_or(Error::ScalarInvalidEncoding)
}

pub(crate) fn decode_element(bytes: &[u8]) -> Result<RistrettoPoint, Error> {
    if bytes.len() != 32 {
        return Err(Error::InvalidPointLength);
    }
    let compressed =
        CompressedRistretto::from_slice(bytes).map_err(|_| Error::InvalidPointLength)?;
    let point = compressed.decompress().ok_or(Error::InvalidPointEncoding)?;
    if point.is_identity() {
        return Err(Error::IdentityPoint);
    }
    Ok(point)
}

/// 64 uniform bytes through the one-way map
/// (`ristretto255_XMD:SHA-512_R255MAP_RO_`).
pub(crate) fn hash_to_group(input: &[u8], dst: &[u8]) -> Result<RistrettoPoint, Error> {
    let uniform = expand_message_xmd::<Sha512>(&[input], dst, 64)?;
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&uniform);
    Ok(RistrettoPoint::from_uniform_bytes(&wide))
}

/// Ristretto255 defines no separate non-uniform encoding; the suite reuses
/// the one-way map.
pub(crate) fn encode_to_group(input: &[u8], dst: &[u8]) -> Result<RistrettoPoint, Error> {
    hash_to_group(input, dst)
}

/// 64 uniform bytes reduced wide, little-endian, modulo the group order.
pub(crate) fn hash_to_scalar(input: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
    let uniform = expand_message_xmd::<Sha512>(&[input], dst, 64)?;
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&uniform);
    Ok(Scalar::from_bytes_mod_order_wide(&wide))
}

pub(crate) fn identity() -> RistrettoPoint {
    RistrettoPoint::identity()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use sha2::Digest;

    #[test]
    fn one_way_map_fixture() {
        // Test vector from the ristretto255 specification ("element
        // derivation" with the espresso input).
        let digest =
            Sha512::digest(b"Ristretto is traditionally a short shot of espresso coffee");
        let mut wide = [0u8; 64];
        wide.copy_from_slice(&digest);
        let point = RistrettoPoint::from_uniform_bytes(&wide);
        assert_eq!(
            point.compress().to_bytes(),
            hex!("3066f82a1a747d45120d1740f14358531a8f04bbffe6a819f86dfe50f44a0a46")
        );
    }

    #[test]
    fn hash_to_group_is_deterministic() {
        const DST: &[u8] = b"QUUX-V01-CS02-with-ristretto255_XMD:SHA-512_R255MAP_RO_";
        let a = hash_to_group(b"", DST).expect("hash");
        let b = hash_to_group(b"", DST).expect("hash");
        assert_eq!(a.compress(), b.compress());
        assert_eq!(
            a.compress().to_bytes(),
            hex!("bed61e1ee1966329962880e236dfdc83afd52fd1ce116f64fb806f1e8acea926")
        );
        assert_eq!(
            hash_to_group(b"abc", DST).expect("hash").compress().to_bytes(),
            hex!("627b997b104ee62543358e22576c75a98dff9dc5f348d5ab228689735d77b258")
        );
    }

    #[test]
    fn decode_rejects_identity_and_junk() {
        assert_eq!(decode_element(&[0u8; 32]), Err(Error::IdentityPoint));
        assert_eq!(decode_element(&[0u8; 31]), Err(Error::InvalidPointLength));
        // A non-canonical encoding (s >= p).
        assert_eq!(decode_element(&[0xff; 32]), Err(Error::InvalidPointEncoding));
    }
}
