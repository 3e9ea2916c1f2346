//! Deterministic message-to-curve-point mapping.
//!
//! The pipeline is `expand_message_xmd` (RFC 9380 §5.3.1) feeding
//! `hash_to_field`, whose two field elements are each mapped to G1 and
//! summed. The two-point sum is load-bearing: a single map application is
//! not indifferentiable from a random oracle, so both elements always come
//! from the same expansion with the same domain tag.

use sha3::digest::{core_api::BlockSizeUser, Digest};
use tracing::error;

use crate::{
    curve::{Engine, FieldElement, G1Point},
    sdk::api::{BlsError, BlsResult, BytesVec},
};

/// Bytes drawn per field element before modular reduction. 16 bytes beyond
/// the 32-byte field size, so the reduced value's bias is negligible.
const FIELD_ELEMENT_EXPAND_LENGTH: usize = 48;

const DOMAIN_TAG_LENGTH_MAX: usize = 255;

/// A hash-to-curve domain separation tag, fixed per verifying context.
///
/// Length is validated once here so the expander never has to re-check;
/// an oversized tag cannot be encoded in the single length byte of `DST'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTag(BytesVec);

impl DomainTag {
    pub fn new(tag: &[u8]) -> BlsResult<Self> {
        if tag.is_empty() || tag.len() > DOMAIN_TAG_LENGTH_MAX {
            error!(
                "invalid domain tag length {} not in [1,{}]",
                tag.len(),
                DOMAIN_TAG_LENGTH_MAX
            );
            return Err(BlsError::InvalidDomainTag(tag.len()));
        }
        Ok(Self(tag.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `DST' = tag || I2OSP(len(tag), 1)`
    fn dst_prime(&self) -> BytesVec {
        let mut out = self.0.clone();
        out.push(self.0.len() as u8);
        out
    }
}

/// `expand_message_xmd` over digest `D`, with `Z_pad` sized to `D`'s input
/// block (64 bytes for SHA-256, 136 for Keccak-256).
///
/// The block counter is a single byte and the length prefix two bytes, so
/// requests needing more than 255 blocks or 65535 bytes are rejected up
/// front rather than wrapped.
pub fn expand_message_xmd<D>(
    domain: &DomainTag,
    message: &[u8],
    out_len: usize,
) -> BlsResult<BytesVec>
where
    D: Digest + BlockSizeUser,
{
    let digest_len = <D as Digest>::output_size();
    let ell = (out_len + digest_len - 1) / digest_len;
    if ell > 255 || out_len > u16::MAX as usize {
        error!("expander output length {} exceeds RFC bounds", out_len);
        return Err(BlsError::InvalidOutputLength(out_len));
    }
    Ok(expand_blocks::<D>(domain, message, out_len, ell))
}

/// Expansion core. `ell` is the block count, already checked to fit the
/// one-byte counter.
fn expand_blocks<D>(domain: &DomainTag, message: &[u8], out_len: usize, ell: usize) -> BytesVec
where
    D: Digest + BlockSizeUser,
{
    let dst_prime = domain.dst_prime();

    // b0 = H(Z_pad || msg || I2OSP(out_len, 2) || I2OSP(0, 1) || DST')
    let b0 = D::new()
        .chain_update(vec![0u8; D::block_size()])
        .chain_update(message)
        .chain_update((out_len as u16).to_be_bytes())
        .chain_update([0u8])
        .chain_update(&dst_prime)
        .finalize();

    // b1 = H(b0 || I2OSP(1, 1) || DST')
    let mut bi = D::new()
        .chain_update(&b0)
        .chain_update([1u8])
        .chain_update(&dst_prime)
        .finalize();

    let mut out = BytesVec::with_capacity(ell * <D as Digest>::output_size());
    out.extend_from_slice(&bi);
    for i in 2..=ell {
        // b_i = H(strxor(b0, b_{i-1}) || I2OSP(i, 1) || DST')
        let xored: BytesVec = b0.iter().zip(bi.iter()).map(|(a, b)| a ^ b).collect();
        bi = D::new()
            .chain_update(&xored)
            .chain_update([i as u8])
            .chain_update(&dst_prime)
            .finalize();
        out.extend_from_slice(&bi);
    }
    out.truncate(out_len);
    out
}

/// Hash `message` to two base-field elements: expand to 2*48 bytes, then
/// reduce each big-endian 48-byte chunk modulo the field order.
pub fn hash_to_field<D>(domain: &DomainTag, message: &[u8]) -> [FieldElement; 2]
where
    D: Digest + BlockSizeUser,
{
    // a 96-byte request is always within the one-byte block counter
    const OUT_LEN: usize = 2 * FIELD_ELEMENT_EXPAND_LENGTH;
    let ell = (OUT_LEN + <D as Digest>::output_size() - 1) / <D as Digest>::output_size();
    let expanded = expand_blocks::<D>(domain, message, OUT_LEN, ell);
    [
        FieldElement::from_be_bytes_reduced(&expanded[..FIELD_ELEMENT_EXPAND_LENGTH]),
        FieldElement::from_be_bytes_reduced(&expanded[FIELD_ELEMENT_EXPAND_LENGTH..]),
    ]
}

/// Full hash-to-curve: map both field elements independently and sum.
pub fn hash_to_point<D>(engine: &Engine, domain: &DomainTag, message: &[u8]) -> G1Point
where
    D: Digest + BlockSizeUser,
{
    let [e0, e1] = hash_to_field::<D>(domain, message);
    let p0 = engine.map_to_point(&e0);
    let p1 = engine.map_to_point(&e1);
    p0.add(&p1)
}
