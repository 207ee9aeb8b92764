//! `expand_message` variants from RFC 9380 §5.3.

use core::fmt;

use digest::core_api::BlockSizeUser;
use digest::typenum::Unsigned;
use digest::{Digest, ExtendableOutput, Update, XofReader};

/// Salt prepended when a DST longer than [`MAX_DST_LEN`] must be hashed.
const OVERSIZE_DST_SALT: &[u8] = b"H2C-OVERSIZE-DST-";

/// Longest domain separation tag that can be used verbatim.
pub const MAX_DST_LEN: usize = 255;

/// Errors surfaced by the expanders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The domain separation tag is empty.
    EmptyDst,
    /// The requested output does not fit the expander limits
    /// (`len > 65535` or more than 255 hash blocks).
    OutputTooLarge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyDst => f.write_str("empty domain separation tag"),
            Error::OutputTooLarge => f.write_str("expander output length too large"),
        }
    }
}

impl std::error::Error for Error {}

/// The DST actually fed to the hash: either the caller's tag or, when the
/// tag exceeds 255 bytes, a digest of it (RFC 9380 §5.3.3).
struct Domain(Vec<u8>);

impl Domain {
    fn xmd<D: Digest>(dst: &[u8]) -> Result<Self, Error> {
        if dst.is_empty() {
            return Err(Error::EmptyDst);
        }
        if dst.len() > MAX_DST_LEN {
            let digest = D::new()
                .chain_update(OVERSIZE_DST_SALT)
                .chain_update(dst)
                .finalize();
            Ok(Self(digest.to_vec()))
        } else {
            Ok(Self(dst.to_vec()))
        }
    }

    fn xof<X>(dst: &[u8], security_bits: usize) -> Result<Self, Error>
    where
        X: Default + ExtendableOutput + Update,
    {
        if dst.is_empty() {
            return Err(Error::EmptyDst);
        }
        if dst.len() > MAX_DST_LEN {
            let mut hash = X::default();
            hash.update(OVERSIZE_DST_SALT);
            hash.update(dst);
            let mut reduced = vec![0u8; (2 * security_bits + 7) / 8];
            hash.finalize_xof().read(&mut reduced);
            Ok(Self(reduced))
        } else {
            Ok(Self(dst.to_vec()))
        }
    }

    fn update<H: Update>(&self, hash: &mut H) {
        hash.update(&self.0);
        hash.update(&[self.0.len() as u8]);
    }

    fn update_digest<D: Digest>(&self, hash: &mut D) {
        Digest::update(hash, &self.0);
        Digest::update(hash, [self.0.len() as u8]);
    }
}

/// `expand_message_xmd` (RFC 9380 §5.3.1) over a fixed-output hash.
///
/// `msgs` is the message in contiguous parts; `len` is the requested output
/// length in bytes.
pub fn expand_message_xmd<D>(msgs: &[&[u8]], dst: &[u8], len: usize) -> Result<Vec<u8>, Error>
where
    D: Digest + BlockSizeUser,
{
    let b_in_bytes = <D as Digest>::output_size();
    let block_size = <D as BlockSizeUser>::BlockSize::USIZE;
    if len == 0 || len > u16::MAX as usize {
        return Err(Error::OutputTooLarge);
    }
    let ell = (len + b_in_bytes - 1) / b_in_bytes;
    if ell > 255 {
        return Err(Error::OutputTooLarge);
    }
    let domain = Domain::xmd::<D>(dst)?;

    let mut b0 = D::new();
    Digest::update(&mut b0, vec![0u8; block_size]);
    for msg in msgs {
        Digest::update(&mut b0, msg);
    }
    Digest::update(&mut b0, (len as u16).to_be_bytes());
    Digest::update(&mut b0, [0u8]);
    domain.update_digest(&mut b0);
    let b0 = b0.finalize();

    let mut hash = D::new();
    Digest::update(&mut hash, &b0);
    Digest::update(&mut hash, [1u8]);
    domain.update_digest(&mut hash);
    let mut prev = hash.finalize();

    let mut uniform = Vec::with_capacity(ell * b_in_bytes);
    uniform.extend_from_slice(&prev);
    for i in 2..=ell {
        let mut hash = D::new();
        let xored: Vec<u8> = b0.iter().zip(prev.iter()).map(|(a, b)| a ^ b).collect();
        Digest::update(&mut hash, &xored);
        Digest::update(&mut hash, [i as u8]);
        domain.update_digest(&mut hash);
        prev = hash.finalize();
        uniform.extend_from_slice(&prev);
    }
    uniform.truncate(len);
    Ok(uniform)
}

/// `expand_message_xof` (RFC 9380 §5.3.2) over an extendable-output hash.
///
/// `security_bits` is the target security level `k` of the XOF (128 for
/// SHAKE128, 256 for SHAKE256); it sizes the digest that replaces an
/// oversize DST.
pub fn expand_message_xof<X>(
    msgs: &[&[u8]],
    dst: &[u8],
    len: usize,
    security_bits: usize,
) -> Result<Vec<u8>, Error>
where
    X: Default + ExtendableOutput + Update,
{
    if len == 0 || len > u16::MAX as usize {
        return Err(Error::OutputTooLarge);
    }
    let domain = Domain::xof::<X>(dst, security_bits)?;

    let mut hash = X::default();
    for msg in msgs {
        hash.update(msg);
    }
    hash.update(&(len as u16).to_be_bytes());
    domain.update(&mut hash);

    let mut uniform = vec![0u8; len];
    hash.finalize_xof().read(&mut uniform);
    Ok(uniform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use sha2::{Sha256, Sha512};
    use sha3::Shake128;

    const DST_256: &[u8] = b"QUUX-V01-CS02-with-expander-SHA256-128";
    const DST_512: &[u8] = b"QUUX-V01-CS02-with-expander-SHA512-256";
    const DST_SHAKE: &[u8] = b"QUUX-V01-CS02-with-expander-SHAKE128";

    #[test]
    fn xmd_sha256_vectors() {
        let out = expand_message_xmd::<Sha256>(&[b""], DST_256, 0x20).expect("expand");
        assert_eq!(
            out,
            hex!("68a985b87eb6b46952128911f2a4412bbc302a9d759667f87f7a21d803f07235")
        );
        let out = expand_message_xmd::<Sha256>(&[b"abc"], DST_256, 0x20).expect("expand");
        assert_eq!(
            out,
            hex!("d8ccab23b5985ccea865c6c97b6e5b8350e794e603b4b97902f53a8a0d605615")
        );
        // ell > 1: four blocks of SHA-256 output.
        let out = expand_message_xmd::<Sha256>(&[b"abc"], DST_256, 0x80).expect("expand");
        assert_eq!(
            out,
            hex!(
                "abba86a6129e366fc877aab32fc4ffc70120d8996c88aee2fe4b32d6c7b6437a
                 647e6c3163d40b76a73cf6a5674ef1d890f95b664ee0afa5359a5c4e07985635
                 bbecbac65d747d3d2da7ec2b8221b17b0ca9dc8a1ac1c07ea6a1e60583e2cb00
                 058e77b7b72a298425cd1b941ad4ec65e8afc50303a22c0f99b0509b4c895f40"
            )
            .to_vec()
        );
    }

    #[test]
    fn xmd_sha512_vector() {
        let out = expand_message_xmd::<Sha512>(&[b""], DST_512, 0x20).expect("expand");
        assert_eq!(
            out,
            hex!("6b9a7312411d92f921c6f68ca0b6380730a1a4d982c507211a90964c394179ba")
        );
    }

    #[test]
    fn xmd_message_in_parts() {
        let whole = expand_message_xmd::<Sha256>(&[b"abcdef"], DST_256, 0x20).expect("expand");
        let parts = expand_message_xmd::<Sha256>(&[b"abc", b"def"], DST_256, 0x20).expect("expand");
        assert_eq!(whole, parts);
    }

    #[test]
    fn xmd_oversize_dst_is_hashed() {
        let long_dst = vec![b'a'; 260];
        let out = expand_message_xmd::<Sha256>(&[b""], &long_dst, 0x20).expect("expand");
        assert_eq!(
            out,
            hex!("72ec388cff4da8c3ff2e8de2479ea86467c0a0a1c227a47a85b01a886beeba4a")
        );
    }

    #[test]
    fn xmd_limits() {
        assert_eq!(
            expand_message_xmd::<Sha256>(&[b"x"], DST_256, 0x10000),
            Err(Error::OutputTooLarge)
        );
        // 256 blocks of 32 bytes exceed ell = 255.
        assert_eq!(
            expand_message_xmd::<Sha256>(&[b"x"], DST_256, 255 * 32 + 1),
            Err(Error::OutputTooLarge)
        );
        assert_eq!(
            expand_message_xmd::<Sha256>(&[b"x"], b"", 0x20),
            Err(Error::EmptyDst)
        );
    }

    #[test]
    fn xof_shake128_vectors() {
        let out = expand_message_xof::<Shake128>(&[b""], DST_SHAKE, 0x20, 128).expect("expand");
        assert_eq!(
            out,
            hex!("86518c9cd86581486e9485aa74ab35ba150d1c75c88e26b7043e44e2acd735a2")
        );
        let out = expand_message_xof::<Shake128>(&[b"abc"], DST_SHAKE, 0x20, 128).expect("expand");
        assert_eq!(
            out,
            hex!("8696af52a4d862417c0763556073f47bc9b9ba43c99b505305cb1ec04a9ab468")
        );
    }

    #[test]
    fn xof_empty_dst() {
        assert_eq!(
            expand_message_xof::<Shake128>(&[b"x"], b"", 0x20, 128),
            Err(Error::EmptyDst)
        );
    }
}
