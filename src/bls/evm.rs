//! Verifier-contract wire format: uncompressed big-endian field elements,
//! 32 bytes each.
//!
//! G1 is `x || y` (64 bytes). G2 coordinates live in the degree-2 extension;
//! the verifier takes each as `real || imag`, so a G2 point is
//! `x_real || x_imag || y_real || y_imag` (128 bytes). This word order is a
//! protocol contract with the deployed verifier and the pairing precompile
//! behind it; see [crate::bls::kyber] for the beacon ecosystem's opposite
//! ordering.

use tracing::warn;

use crate::{
    curve::{G1Point, G2Point},
    sdk::api::{BlsError, BlsResult},
};

pub const G1_SERIALIZED_LENGTH: usize = 64;
pub const G2_SERIALIZED_LENGTH: usize = 128;

/// Serialize a G1 point to the verifier's 64-byte `x || y` layout.
pub fn serialize_g1(point: &G1Point) -> [u8; G1_SERIALIZED_LENGTH] {
    let (x, y) = point.to_be_coordinates();
    let mut out = [0u8; G1_SERIALIZED_LENGTH];
    out[..32].copy_from_slice(&x);
    out[32..].copy_from_slice(&y);
    out
}

/// Deserialize a 64-byte `x || y` buffer, enforcing canonical field
/// encodings and the on-curve check.
pub fn deserialize_g1(bytes: &[u8]) -> BlsResult<G1Point> {
    let bytes: &[u8; G1_SERIALIZED_LENGTH] = bytes.try_into().map_err(|_| {
        warn!("malformed G1 encoding: {} bytes", bytes.len());
        BlsError::MalformedEncoding("G1 point must be 64 bytes")
    })?;
    let mut x = [0u8; 32];
    let mut y = [0u8; 32];
    x.copy_from_slice(&bytes[..32]);
    y.copy_from_slice(&bytes[32..]);
    let point = G1Point::from_be_coordinates(&x, &y)
        .ok_or(BlsError::MalformedEncoding("non-canonical field element"))?;
    if !point.is_valid() {
        warn!("G1 deserialization: point not on curve");
        return Err(BlsError::InvalidPoint("not on curve"));
    }
    Ok(point)
}

/// Serialize a G2 point to the verifier's 128-byte
/// `x_real || x_imag || y_real || y_imag` layout.
pub fn serialize_g2(point: &G2Point) -> [u8; G2_SERIALIZED_LENGTH] {
    let words = point.to_be_coordinates();
    let mut out = [0u8; G2_SERIALIZED_LENGTH];
    for (chunk, word) in out.chunks_exact_mut(32).zip(words.iter()) {
        chunk.copy_from_slice(word);
    }
    out
}

/// Deserialize a 128-byte verifier-layout buffer, enforcing canonical field
/// encodings plus the on-curve and prime-order-subgroup checks.
pub fn deserialize_g2(bytes: &[u8]) -> BlsResult<G2Point> {
    let bytes: &[u8; G2_SERIALIZED_LENGTH] = bytes.try_into().map_err(|_| {
        warn!("malformed G2 encoding: {} bytes", bytes.len());
        BlsError::MalformedEncoding("G2 point must be 128 bytes")
    })?;
    let word = |i: usize| -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes[32 * i..32 * (i + 1)]);
        out
    };
    let point = G2Point::from_be_coordinates(&word(0), &word(1), &word(2), &word(3))
        .ok_or(BlsError::MalformedEncoding("non-canonical field element"))?;
    if !point.is_valid() {
        warn!("G2 deserialization: point not on curve or not in subgroup");
        return Err(BlsError::InvalidPoint("not in G2"));
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Engine, SecretScalar};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sample_points() -> (G1Point, G2Point) {
        let engine = Engine::new();
        let s = SecretScalar::random(ChaCha20Rng::seed_from_u64(1234));
        (engine.g1_base().mul(&s), engine.g2_base().mul(&s))
    }

    #[test]
    fn g1_round_trip() {
        let (p, _) = sample_points();
        let bytes = serialize_g1(&p);
        assert_eq!(deserialize_g1(&bytes).unwrap(), p);
    }

    #[test]
    fn g2_round_trip() {
        let (_, q) = sample_points();
        let bytes = serialize_g2(&q);
        assert_eq!(deserialize_g2(&bytes).unwrap(), q);
    }

    #[test]
    fn g1_rejects_bad_length() {
        let (p, _) = sample_points();
        let bytes = serialize_g1(&p);
        assert!(matches!(
            deserialize_g1(&bytes[..63]),
            Err(BlsError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn g1_rejects_off_curve() {
        let (p, _) = sample_points();
        let mut bytes = serialize_g1(&p);
        bytes[63] ^= 1; // perturb y
        assert!(matches!(
            deserialize_g1(&bytes),
            Err(BlsError::InvalidPoint(_))
        ));
    }

    #[test]
    fn g2_rejects_non_canonical_coordinate() {
        let (_, q) = sample_points();
        let mut bytes = serialize_g2(&q);
        bytes[..32].copy_from_slice(&[0xff; 32]); // x_real above the modulus
        assert!(matches!(
            deserialize_g2(&bytes),
            Err(BlsError::MalformedEncoding(_))
        ));
    }
}
