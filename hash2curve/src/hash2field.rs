//! `hash_to_field` (RFC 9380 §5.2).

use ctfield::{FieldElement, FieldParams};
use digest::core_api::BlockSizeUser;
use digest::Digest;

use crate::expand::{expand_message_xmd, Error};

/// Hashes `msgs` to `count` elements of the field described by `params`.
///
/// `sec_len` is the per-element expansion length `L = ceil((ceil(log2 p) +
/// k) / 8)`; each `L`-byte block is interpreted big-endian and reduced into
/// the field.
pub fn hash_to_field<D>(
    params: &'static FieldParams,
    sec_len: usize,
    msgs: &[&[u8]],
    dst: &[u8],
    count: usize,
) -> Result<Vec<FieldElement>, Error>
where
    D: Digest + BlockSizeUser,
{
    let uniform = expand_message_xmd::<D>(msgs, dst, count * sec_len)?;
    Ok(uniform
        .chunks(sec_len)
        .map(|block| params.reduce_be_bytes(block))
        .collect())
}
