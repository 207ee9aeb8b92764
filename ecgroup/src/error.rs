//! The wire-visible error taxonomy.

use core::fmt;

/// Errors returned by decoding, hashing and dispatch operations.
///
/// Programming errors (mixing scalars or elements across groups) are raised
/// as panics carrying the [`Error::CastScalar`] / [`Error::CastElement`]
/// message rather than returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The curve identifier is unknown or reserved.
    InvalidCurveIdentifier,
    /// A scalar encoding has the wrong length.
    InvalidScalarLength,
    /// A scalar encoding is not canonical.
    ScalarInvalidEncoding,
    /// A scalar encoding represents a negative value. Unsigned fixed-length
    /// encodings never produce this; it is part of the wire taxonomy for
    /// hosts layering signed formats on top.
    NegativeScalar,
    /// A scalar encoding is not below the group order.
    ScalarTooBig,
    /// An element encoding has the wrong length.
    InvalidPointLength,
    /// An element encoding has a bad prefix, a non-canonical coordinate, or
    /// does not lie on the curve.
    InvalidPointEncoding,
    /// The encoding is a valid identity element, which decoding rejects.
    IdentityPoint,
    /// A scalar from another group was supplied.
    CastScalar,
    /// An element from another group was supplied.
    CastElement,
    /// The domain separation tag is shorter than the recommended minimum.
    ShortDst,
    /// The domain separation tag is empty.
    EmptyDst,
    /// The requested expander output exceeds the RFC 9380 limits.
    ExpanderOutputTooLarge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Error::InvalidCurveIdentifier => "invalid curve identifier",
            Error::InvalidScalarLength => "invalid scalar length",
            Error::ScalarInvalidEncoding => "invalid scalar encoding",
            Error::NegativeScalar => "negative scalar",
            Error::ScalarTooBig => "scalar too big",
            Error::InvalidPointLength => "invalid point length",
            Error::InvalidPointEncoding => "invalid point encoding",
            Error::IdentityPoint => "point is the identity element",
            Error::CastScalar => "scalar belongs to another group",
            Error::CastElement => "element belongs to another group",
            Error::ShortDst => "domain separation tag is below the minimum length",
            Error::EmptyDst => "domain separation tag is empty",
            Error::ExpanderOutputTooLarge => "expander output length too large",
        };
        f.write_str(message)
    }
}

impl std::error::Error for Error {}

impl From<hash2curve::Error> for Error {
    fn from(err: hash2curve::Error) -> Self {
        match err {
            hash2curve::Error::EmptyDst => Error::EmptyDst,
            hash2curve::Error::OutputTooLarge => Error::ExpanderOutputTooLarge,
        }
    }
}
