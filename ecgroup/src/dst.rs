//! Domain separation tag construction and validation.

use crate::error::Error;

/// Shortest DST accepted under the strict policy (RFC 9380 §3.1 recommends
/// at least 16 bytes).
pub const MIN_DST_LENGTH: usize = 16;

/// How short domain separation tags are handled.
///
/// An empty DST is always an error. Below [`MIN_DST_LENGTH`] bytes, the
/// strict policy rejects while the lax policy accepts; lax callers take on
/// the domain-collision risk themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DstPolicy {
    /// Reject DSTs shorter than [`MIN_DST_LENGTH`].
    #[default]
    Strict,
    /// Accept short (but non-empty) DSTs.
    Lax,
}

pub(crate) fn check_dst(dst: &[u8], policy: DstPolicy) -> Result<(), Error> {
    if dst.is_empty() {
        return Err(Error::EmptyDst);
    }
    if policy == DstPolicy::Strict && dst.len() < MIN_DST_LENGTH {
        return Err(Error::ShortDst);
    }
    Ok(())
}

pub(crate) fn build_dst(app: &str, version: u8, group_id: u8, ciphersuite: &str) -> Vec<u8> {
    format!("{app}-V{version:02}-CS{group_id:02}-{ciphersuite}").into_bytes()
}
