//! RFC 9380 primitives for hashing byte strings to elliptic-curve groups.
//!
//! This crate provides the curve-independent half of a hash-to-curve
//! pipeline:
//!
//! - [`expand_message_xmd`] / [`expand_message_xof`] (RFC 9380 §5.3), with
//!   oversize domain separation tags hashed down inside the expander;
//! - [`hash_to_field`], producing elements of any [`ctfield`] prime field
//!   with the wide big-endian reduction the RFC prescribes;
//! - the simplified SWU map ([`SswuParams`]) for Weierstrass curves,
//!   including the rational-[`Isogeny`] indirection needed by curves with
//!   `A = 0` such as secp256k1;
//! - [`Elligator2`] for curve25519 composed with the birational map to
//!   edwards25519.
//!
//! The curve back-ends supply the per-curve constants and consume the
//! affine [`MappedPoint`] outputs; nothing here depends on a particular
//! point representation.

#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]

mod elligator;
mod expand;
mod hash2field;
mod isogeny;
mod sswu;

pub use elligator::Elligator2;
pub use expand::{expand_message_xmd, expand_message_xof, Error, MAX_DST_LEN};
pub use hash2field::hash_to_field;
pub use isogeny::Isogeny;
pub use sswu::{MappedPoint, SswuParams};
