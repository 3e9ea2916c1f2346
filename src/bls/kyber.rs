//! Beacon-ecosystem wire format (Kyber marshal layout).
//!
//! Same uncompressed 32-byte big-endian field elements as the verifier
//! format, but G2 puts the imaginary component of each coordinate first:
//! `x_imag || x_real || y_imag || y_real`. Published beacon group keys and
//! the G2 half of beacon signatures use this layout; converting to the
//! verifier format is a per-coordinate word swap. G1 marshals identically
//! in both formats (`x || y`, 64 bytes).

use tracing::warn;

use crate::{
    bls::evm,
    curve::{G1Point, G2Point},
    sdk::api::{BlsError, BlsResult},
};

pub const G1_MARSHALLED_LENGTH: usize = 64;
pub const G2_MARSHALLED_LENGTH: usize = 128;

/// Marshal a G1 point: `x || y`, identical to the verifier layout.
pub fn marshal_g1(point: &G1Point) -> [u8; G1_MARSHALLED_LENGTH] {
    evm::serialize_g1(point)
}

/// Unmarshal a beacon-format G1 point (e.g. a published round signature).
pub fn unmarshal_g1(bytes: &[u8]) -> BlsResult<G1Point> {
    evm::deserialize_g1(bytes)
}

/// Marshal a G2 point with imaginary-first coordinate words.
pub fn marshal_g2(point: &G2Point) -> [u8; G2_MARSHALLED_LENGTH] {
    word_swapped(&evm::serialize_g2(point))
}

/// Unmarshal a beacon-format G2 point (e.g. a published group public key),
/// enforcing canonical encodings plus on-curve and subgroup checks.
pub fn unmarshal_g2(bytes: &[u8]) -> BlsResult<G2Point> {
    let bytes: &[u8; G2_MARSHALLED_LENGTH] = bytes.try_into().map_err(|_| {
        warn!("malformed marshalled G2: {} bytes", bytes.len());
        BlsError::MalformedEncoding("G2 point must be 128 bytes")
    })?;
    evm::deserialize_g2(&word_swapped(bytes))
}

/// Swap the two 32-byte words of each extension-field coordinate, converting
/// between imaginary-first and real-first G2 layouts (the swap is its own
/// inverse).
fn word_swapped(bytes: &[u8; 128]) -> [u8; 128] {
    let mut out = [0u8; 128];
    for coordinate in 0..2 {
        let base = 64 * coordinate;
        out[base..base + 32].copy_from_slice(&bytes[base + 32..base + 64]);
        out[base + 32..base + 64].copy_from_slice(&bytes[base..base + 32]);
    }
    out
}
