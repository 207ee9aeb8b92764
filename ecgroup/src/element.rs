//! The group-bound element type.

use core::fmt;

use subtle::Choice;

use crate::error::Error;
use crate::group::Group;
use crate::internal::ElementRepr;
use crate::scalar::Scalar;

/// A point of the prime-order group selected by its [`Group`].
///
/// Elements are created through group factory methods ([`Group::base`],
/// [`Group::new_element`], [`Group::hash_to_group`],
/// [`Group::decode_element`]) and mutated in place; mutating operations
/// return `&mut Self` so calls can be chained.
///
/// An element is permanently bound to the group that created it. Mixing
/// elements (or scalars) from different groups is a programming error and
/// panics with the [`Error::CastElement`] / [`Error::CastScalar`] message.
#[derive(Clone, Copy)]
pub struct Element {
    pub(crate) group: Group,
    pub(crate) repr: ElementRepr,
}

impl Element {
    /// The group this element belongs to.
    pub fn group(&self) -> Group {
        self.group
    }

    /// Sets the element to the identity (point at infinity).
    pub fn identity(&mut self) -> &mut Self {
        self.repr = ElementRepr::identity(self.group);
        self
    }

    /// Sets the element to the canonical generator.
    pub fn base(&mut self) -> &mut Self {
        self.repr = ElementRepr::base(self.group);
        self
    }

    /// Adds `rhs` in place.
    pub fn add(&mut self, rhs: &Element) -> &mut Self {
        self.check_group(rhs);
        self.repr = self.repr.add(&rhs.repr);
        self
    }

    /// Subtracts `rhs` in place.
    pub fn subtract(&mut self, rhs: &Element) -> &mut Self {
        self.check_group(rhs);
        self.repr = self.repr.sub(&rhs.repr);
        self
    }

    /// Doubles in place.
    pub fn double(&mut self) -> &mut Self {
        self.repr = self.repr.double();
        self
    }

    /// Negates in place.
    pub fn negate(&mut self) -> &mut Self {
        self.repr = self.repr.negate();
        self
    }

    /// Multiplies by a scalar in place; the scalar multiplication is
    /// constant-time in the scalar.
    pub fn multiply(&mut self, scalar: &Scalar) -> &mut Self {
        if self.group != scalar.group() {
            panic!("{}", Error::CastScalar);
        }
        self.repr = self.repr.multiply(&scalar.repr);
        self
    }

    /// Copies `rhs` into self.
    pub fn set(&mut self, rhs: &Element) -> &mut Self {
        self.check_group(rhs);
        self.repr = rhs.repr;
        self
    }

    /// Returns an independent copy.
    pub fn copy(&self) -> Element {
        *self
    }

    /// Constant-time equality.
    pub fn equal(&self, rhs: &Element) -> Choice {
        self.check_group(rhs);
        self.repr.ct_eq(&rhs.repr)
    }

    /// Whether the element is the identity.
    pub fn is_identity(&self) -> Choice {
        self.repr.is_identity()
    }

    /// Canonical compressed encoding ([`Group::element_length`] bytes; the
    /// Weierstrass identity is the single byte `0x00`).
    pub fn encode(&self) -> Vec<u8> {
        self.repr.encode()
    }

    /// Lowercase hex of [`Element::encode`].
    pub fn encode_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// The x-only channel: affine x for Weierstrass curves, the Montgomery
    /// u-coordinate for Edwards25519, the canonical encoding for
    /// Ristretto255.
    pub fn x_coordinate(&self) -> Vec<u8> {
        self.repr.x_coordinate()
    }

    fn check_group(&self, rhs: &Element) {
        if self.group != rhs.group {
            panic!("{}", Error::CastElement);
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({:?}, 0x{})", self.group, self.encode_hex())
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && bool::from(self.repr.ct_eq(&other.repr))
    }
}

impl Eq for Element {}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
    use serde::ser::{Serialize, SerializeStruct, Serializer};

    impl Serialize for Element {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("Element", 2)?;
            state.serialize_field("group", &self.group.id())?;
            state.serialize_field("element", &self.encode_hex())?;
            state.end()
        }
    }

    impl<'de> Deserialize<'de> for Element {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct ElementVisitor;

            impl<'de> Visitor<'de> for ElementVisitor {
                type Value = Element;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a struct with group id and hex element")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Element, A::Error> {
                    let mut group: Option<u8> = None;
                    let mut payload: Option<String> = None;
                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "group" => group = Some(map.next_value()?),
                            "element" => payload = Some(map.next_value()?),
                            other => return Err(de::Error::unknown_field(other, FIELDS)),
                        }
                    }
                    let group = group.ok_or_else(|| de::Error::missing_field("group"))?;
                    let payload = payload.ok_or_else(|| de::Error::missing_field("element"))?;
                    let group = Group::try_from(group).map_err(de::Error::custom)?;
                    group.element_from_hex(&payload).map_err(de::Error::custom)
                }
            }

            const FIELDS: &[&str] = &["group", "element"];
            deserializer.deserialize_struct("Element", FIELDS, ElementVisitor)
        }
    }
}
