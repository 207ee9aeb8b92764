//! The group-bound scalar type.

use core::fmt;

use subtle::Choice;
use zeroize::Zeroize;

use crate::error::Error;
use crate::group::Group;
use crate::internal::ScalarRepr;

/// A scalar modulo the order of its [`Group`].
///
/// Scalars are created through group factory methods
/// ([`Group::new_scalar`], [`Group::random_scalar`],
/// [`Group::hash_to_scalar`], [`Group::decode_scalar`]) and mutated in
/// place; mutating operations return `&mut Self` so calls can be chained.
///
/// A scalar is permanently bound to the group that created it. Mixing
/// scalars from different groups is a programming error and panics with the
/// [`Error::CastScalar`] message.
#[derive(Clone, Copy)]
pub struct Scalar {
    pub(crate) group: Group,
    pub(crate) repr: ScalarRepr,
}

impl Scalar {
    /// The group this scalar belongs to.
    pub fn group(&self) -> Group {
        self.group
    }

    /// Sets the scalar to zero.
    pub fn zero(&mut self) -> &mut Self {
        self.repr = ScalarRepr::zero(self.group);
        self
    }

    /// Sets the scalar to one.
    pub fn one(&mut self) -> &mut Self {
        self.repr = ScalarRepr::one(self.group);
        self
    }

    /// Sets the scalar to a small integer.
    pub fn set_u64(&mut self, value: u64) -> &mut Self {
        self.repr = ScalarRepr::from_u64(self.group, value);
        self
    }

    /// Replaces the scalar with a uniformly random non-zero value drawn
    /// from the operating-system RNG. An RNG failure panics.
    pub fn random(&mut self) -> &mut Self {
        self.repr = ScalarRepr::random(self.group);
        self
    }

    /// Adds `rhs` in place.
    pub fn add(&mut self, rhs: &Scalar) -> &mut Self {
        self.check_group(rhs);
        self.repr = self.repr.add(&rhs.repr);
        self
    }

    /// Subtracts `rhs` in place.
    pub fn subtract(&mut self, rhs: &Scalar) -> &mut Self {
        self.check_group(rhs);
        self.repr = self.repr.sub(&rhs.repr);
        self
    }

    /// Multiplies by `rhs` in place.
    pub fn multiply(&mut self, rhs: &Scalar) -> &mut Self {
        self.check_group(rhs);
        self.repr = self.repr.mul(&rhs.repr);
        self
    }

    /// Raises the scalar to `exponent` in place; an exponent of zero
    /// yields one.
    pub fn pow(&mut self, exponent: &Scalar) -> &mut Self {
        self.check_group(exponent);
        self.repr = self.repr.pow(&exponent.repr);
        self
    }

    /// Inverts in place. Zero has no inverse and is left unchanged;
    /// callers guard with [`Scalar::is_zero`].
    pub fn invert(&mut self) -> &mut Self {
        self.repr = self.repr.invert();
        self
    }

    /// Negates in place.
    pub fn negate(&mut self) -> &mut Self {
        self.repr = self.repr.negate();
        self
    }

    /// Copies `rhs` into self.
    pub fn set(&mut self, rhs: &Scalar) -> &mut Self {
        self.check_group(rhs);
        self.repr = rhs.repr;
        self
    }

    /// Returns an independent copy.
    pub fn copy(&self) -> Scalar {
        *self
    }

    /// Constant-time equality.
    pub fn equal(&self, rhs: &Scalar) -> Choice {
        self.check_group(rhs);
        self.repr.ct_eq(&rhs.repr)
    }

    /// Constant-time `self <= rhs` on canonical integer values.
    pub fn less_or_equal(&self, rhs: &Scalar) -> Choice {
        self.check_group(rhs);
        self.repr.less_or_equal(&rhs.repr)
    }

    /// Whether the scalar is zero.
    pub fn is_zero(&self) -> Choice {
        self.repr.is_zero()
    }

    /// Canonical fixed-length encoding ([`Group::scalar_length`] bytes;
    /// little-endian for the 25519 groups, big-endian otherwise).
    pub fn encode(&self) -> Vec<u8> {
        self.repr.encode()
    }

    /// Lowercase hex of [`Scalar::encode`].
    pub fn encode_hex(&self) -> String {
        hex::encode(self.encode())
    }

    fn check_group(&self, rhs: &Scalar) {
        if self.group != rhs.group {
            panic!("{}", Error::CastScalar);
        }
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({:?}, 0x{})", self.group, self.encode_hex())
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && bool::from(self.repr.ct_eq(&other.repr))
    }
}

impl Eq for Scalar {}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.repr.zeroize();
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
    use serde::ser::{Serialize, SerializeStruct, Serializer};

    impl Serialize for Scalar {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("Scalar", 2)?;
            state.serialize_field("group", &self.group.id())?;
            state.serialize_field("scalar", &self.encode_hex())?;
            state.end()
        }
    }

    impl<'de> Deserialize<'de> for Scalar {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct ScalarVisitor;

            impl<'de> Visitor<'de> for ScalarVisitor {
                type Value = Scalar;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a struct with group id and hex scalar")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Scalar, A::Error> {
                    let mut group: Option<u8> = None;
                    let mut payload: Option<String> = None;
                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "group" => group = Some(map.next_value()?),
                            "scalar" => payload = Some(map.next_value()?),
                            other => return Err(de::Error::unknown_field(other, FIELDS)),
                        }
                    }
                    let group = group.ok_or_else(|| de::Error::missing_field("group"))?;
                    let payload = payload.ok_or_else(|| de::Error::missing_field("scalar"))?;
                    let group = Group::try_from(group).map_err(de::Error::custom)?;
                    group.scalar_from_hex(&payload).map_err(de::Error::custom)
                }
            }

            const FIELDS: &[&str] = &["group", "scalar"];
            deserializer.deserialize_struct("Scalar", FIELDS, ScalarVisitor)
        }
    }
}
