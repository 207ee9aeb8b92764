//! The group dispatcher.

use core::fmt;

use crate::dst::{build_dst, check_dst, DstPolicy};
use crate::element::Element;
use crate::error::Error;
use crate::internal::{
    p256_backend, p384_backend, p521_backend, secp256k1, ElementRepr, ScalarRepr,
};
use crate::scalar::Scalar;

/// A prime-order group, selected by its wire identifier.
///
/// `Group` is a plain tag: copying it is free and all per-curve state
/// (field parameters, map constants) initializes lazily, once, on first
/// use. Identifier 2 is reserved for Decaf448 and decodes as
/// [`Error::InvalidCurveIdentifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Group {
    /// Ristretto255 with SHA-512.
    Ristretto255Sha512 = 1,
    /// NIST P-256 with SHA-256.
    P256Sha256 = 3,
    /// NIST P-384 with SHA-384.
    P384Sha384 = 4,
    /// NIST P-521 with SHA-512.
    P521Sha512 = 5,
    /// Edwards25519 with SHA-512.
    Edwards25519Sha512 = 6,
    /// secp256k1 with SHA-256.
    Secp256k1Sha256 = 7,
}

impl Default for Group {
    fn default() -> Self {
        Group::Ristretto255Sha512
    }
}

impl TryFrom<u8> for Group {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Error> {
        match id {
            1 => Ok(Group::Ristretto255Sha512),
            3 => Ok(Group::P256Sha256),
            4 => Ok(Group::P384Sha384),
            5 => Ok(Group::P521Sha512),
            6 => Ok(Group::Edwards25519Sha512),
            7 => Ok(Group::Secp256k1Sha256),
            _ => Err(Error::InvalidCurveIdentifier),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Group::Ristretto255Sha512 => "Ristretto255Sha512",
            Group::P256Sha256 => "P256Sha256",
            Group::P384Sha384 => "P384Sha384",
            Group::P521Sha512 => "P521Sha512",
            Group::Edwards25519Sha512 => "Edwards25519Sha512",
            Group::Secp256k1Sha256 => "Secp256k1Sha256",
        })
    }
}

impl Group {
    /// The stable wire identifier.
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Whether the group is implemented in this build. All declared
    /// variants are; the reserved identifier never constructs a `Group`.
    pub fn available(&self) -> bool {
        true
    }

    /// The RFC 9380 ciphersuite tag.
    pub fn ciphersuite(&self) -> &'static str {
        match self {
            Group::Ristretto255Sha512 => "ristretto255_XMD:SHA-512_R255MAP_RO_",
            Group::P256Sha256 => "P256_XMD:SHA-256_SSWU_RO_",
            Group::P384Sha384 => "P384_XMD:SHA-384_SSWU_RO_",
            Group::P521Sha512 => "P521_XMD:SHA-512_SSWU_RO_",
            Group::Edwards25519Sha512 => "edwards25519_XMD:SHA-512_ELL2_RO_",
            Group::Secp256k1Sha256 => "secp256k1_XMD:SHA-256_SSWU_RO_",
        }
    }

    /// Canonical scalar encoding length in bytes.
    pub fn scalar_length(&self) -> usize {
        match self {
            Group::Ristretto255Sha512 | Group::Edwards25519Sha512 => 32,
            Group::P256Sha256 | Group::Secp256k1Sha256 => 32,
            Group::P384Sha384 => 48,
            Group::P521Sha512 => 66,
        }
    }

    /// Canonical element encoding length in bytes.
    pub fn element_length(&self) -> usize {
        match self {
            Group::Ristretto255Sha512 | Group::Edwards25519Sha512 => 32,
            Group::P256Sha256 | Group::Secp256k1Sha256 => 33,
            Group::P384Sha384 => 49,
            Group::P521Sha512 => 67,
        }
    }

    /// The group order, as canonical big-endian bytes.
    pub fn order(&self) -> Vec<u8> {
        use hex_literal::hex;
        match self {
            Group::Ristretto255Sha512 | Group::Edwards25519Sha512 => {
                hex!("1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed").to_vec()
            }
            Group::P256Sha256 => p256_backend::ORDER.to_vec(),
            Group::P384Sha384 => p384_backend::ORDER.to_vec(),
            Group::P521Sha512 => p521_backend::ORDER.to_vec(),
            Group::Secp256k1Sha256 => secp256k1::scalar::ORDER.to_vec(),
        }
    }

    /// A new scalar set to zero.
    pub fn new_scalar(&self) -> Scalar {
        Scalar {
            group: *self,
            repr: ScalarRepr::zero(*self),
        }
    }

    /// A new element set to the identity.
    pub fn new_element(&self) -> Element {
        Element {
            group: *self,
            repr: ElementRepr::identity(*self),
        }
    }

    /// The canonical generator.
    pub fn base(&self) -> Element {
        Element {
            group: *self,
            repr: ElementRepr::base(*self),
        }
    }

    /// A uniformly random non-zero scalar from the OS RNG.
    pub fn random_scalar(&self) -> Scalar {
        Scalar {
            group: *self,
            repr: ScalarRepr::random(*self),
        }
    }

    /// A random element: a random scalar multiple of the base point.
    pub fn random_element(&self) -> Element {
        let mut element = self.base();
        element.multiply(&self.random_scalar());
        element
    }

    /// Hashes `input` to a scalar in `[0, n)` (RFC 9380 `hash_to_field`
    /// over the scalar field), under the default strict DST policy.
    pub fn hash_to_scalar(&self, input: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
        self.hash_to_scalar_with_policy(input, dst, DstPolicy::default())
    }

    /// [`Group::hash_to_scalar`] with an explicit short-DST policy.
    pub fn hash_to_scalar_with_policy(
        &self,
        input: &[u8],
        dst: &[u8],
        policy: DstPolicy,
    ) -> Result<Scalar, Error> {
        check_dst(dst, policy)?;
        Ok(Scalar {
            group: *self,
            repr: ScalarRepr::hash(*self, input, dst)?,
        })
    }

    /// Hashes `input` to a uniformly distributed element (RFC 9380
    /// `hash_to_curve`), under the default strict DST policy.
    pub fn hash_to_group(&self, input: &[u8], dst: &[u8]) -> Result<Element, Error> {
        self.hash_to_group_with_policy(input, dst, DstPolicy::default())
    }

    /// [`Group::hash_to_group`] with an explicit short-DST policy.
    pub fn hash_to_group_with_policy(
        &self,
        input: &[u8],
        dst: &[u8],
        policy: DstPolicy,
    ) -> Result<Element, Error> {
        check_dst(dst, policy)?;
        Ok(Element {
            group: *self,
            repr: ElementRepr::hash(*self, input, dst)?,
        })
    }

    /// Encodes `input` to an element (RFC 9380 `encode_to_curve`, the
    /// non-uniform variant). Ristretto255 defines no non-uniform map and
    /// reuses the uniform one.
    pub fn encode_to_group(&self, input: &[u8], dst: &[u8]) -> Result<Element, Error> {
        self.encode_to_group_with_policy(input, dst, DstPolicy::default())
    }

    /// [`Group::encode_to_group`] with an explicit short-DST policy.
    pub fn encode_to_group_with_policy(
        &self,
        input: &[u8],
        dst: &[u8],
        policy: DstPolicy,
    ) -> Result<Element, Error> {
        check_dst(dst, policy)?;
        Ok(Element {
            group: *self,
            repr: ElementRepr::encode_to(*self, input, dst)?,
        })
    }

    /// Decodes a canonical scalar encoding.
    pub fn decode_scalar(&self, bytes: &[u8]) -> Result<Scalar, Error> {
        Ok(Scalar {
            group: *self,
            repr: ScalarRepr::decode(*self, bytes)?,
        })
    }

    /// Decodes a canonical element encoding. Identity encodings are
    /// rejected with [`Error::IdentityPoint`] to preempt small-subgroup
    /// tricks; construct the identity with [`Group::new_element`] instead.
    pub fn decode_element(&self, bytes: &[u8]) -> Result<Element, Error> {
        Ok(Element {
            group: *self,
            repr: ElementRepr::decode(*self, bytes)?,
        })
    }

    /// [`Group::decode_scalar`] over lowercase or uppercase hex.
    pub fn scalar_from_hex(&self, hex_input: &str) -> Result<Scalar, Error> {
        let bytes = hex::decode(hex_input).map_err(|_| Error::ScalarInvalidEncoding)?;
        self.decode_scalar(&bytes)
    }

    /// [`Group::decode_element`] over lowercase or uppercase hex.
    pub fn element_from_hex(&self, hex_input: &str) -> Result<Element, Error> {
        let bytes = hex::decode(hex_input).map_err(|_| Error::InvalidPointEncoding)?;
        self.decode_element(&bytes)
    }

    /// Builds the recommended domain separation tag
    /// `<app>-V<version>-CS<id>-<ciphersuite>`.
    pub fn make_dst(&self, app: &str, version: u8) -> Result<Vec<u8>, Error> {
        if app.is_empty() {
            return Err(Error::EmptyDst);
        }
        Ok(build_dst(app, version, self.id(), self.ciphersuite()))
    }

    /// All implemented groups, in identifier order.
    pub fn list() -> &'static [Group] {
        &[
            Group::Ristretto255Sha512,
            Group::P256Sha256,
            Group::P384Sha384,
            Group::P521Sha512,
            Group::Edwards25519Sha512,
            Group::Secp256k1Sha256,
        ]
    }
}
