//! Typed wrappers around the arkworks BN254 backend.
//!
//! Everything the rest of the crate knows about field and group arithmetic
//! goes through this module, so substituting a different pairing backend
//! means reimplementing this module and nothing else. Construction of the
//! fixed generators happens once, in [Engine::new]; the handle is read-only
//! afterwards.

use ark_bn254::{Bn254, Fq, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{BigInteger, PrimeField, UniformRand, Zero};
use rand::{CryptoRng, RngCore};
use serde::{de, de::Error as _, de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

mod map_to_curve;

/// Handle to the curve-arithmetic backend.
///
/// Owns the fixed G1/G2 base points. Cheap to clone; all state is immutable
/// after [Engine::new]. The backend itself is pure CPU-bound arithmetic with
/// no interior mutability, so an `Engine` may be shared freely.
#[derive(Debug, Clone)]
pub struct Engine {
    g1_base: G1Point,
    g2_base: G2Point,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            g1_base: G1Point(G1Affine::generator()),
            g2_base: G2Point(G2Affine::generator()),
        }
    }

    pub fn g1_base(&self) -> &G1Point {
        &self.g1_base
    }

    /// The fixed G2 base point that public keys are multiples of.
    pub fn g2_base(&self) -> &G2Point {
        &self.g2_base
    }

    /// Deterministic map from a base-field element to a G1 point
    /// (Fouque-Tibouchi, the map used by evmbls-style verifiers).
    /// Not constant-time; inputs here are public hash outputs.
    pub fn map_to_point(&self, e: &FieldElement) -> G1Point {
        G1Point(map_to_curve::map_to_g1(e.0))
    }

    /// The bilinear check the on-chain verifier performs:
    /// `e(signature, g2_base) == e(message_point, pub_key)`.
    /// `false` is the normal "bad signature" outcome, not an error.
    pub fn pairing_check(
        &self,
        signature: &G1Point,
        pub_key: &G2Point,
        message_point: &G1Point,
    ) -> bool {
        Bn254::pairing(signature.0, self.g2_base.0) == Bn254::pairing(message_point.0, pub_key.0)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// An element of the BN254 base field, always in reduced form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldElement(Fq);

impl FieldElement {
    /// Interpret `bytes` as a big-endian integer and reduce modulo the
    /// base-field order. Accepts arbitrary length; hash-to-field feeds
    /// 48-byte chunks through here.
    pub fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        Self(Fq::from_be_bytes_mod_order(bytes))
    }

    /// 32-byte big-endian encoding, zero-padded on the left.
    pub fn to_be_bytes(self) -> [u8; 32] {
        fq_to_be_bytes(self.0)
    }
}

fn fq_to_be_bytes(e: Fq) -> [u8; 32] {
    let mut out = [0; 32];
    let bytes = e.into_bigint().to_bytes_be();
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// `None` iff `bytes` is not the canonical (fully reduced) encoding of a
/// base-field element.
fn fq_from_be_bytes_canonical(bytes: &[u8; 32]) -> Option<Fq> {
    let e = Fq::from_be_bytes_mod_order(bytes);
    if fq_to_be_bytes(e) == *bytes {
        Some(e)
    } else {
        None
    }
}

/// A secret signing scalar, zeroized on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretScalar(Fr);

impl SecretScalar {
    /// Draw a uniformly random nonzero scalar. The zero draw has negligible
    /// probability but would yield an unusable key, so re-sample on it.
    pub fn random(mut rng: impl CryptoRng + RngCore) -> Self {
        loop {
            let candidate = Fr::rand(&mut rng);
            if !candidate.is_zero() {
                return Self(candidate);
            }
        }
    }

    pub(crate) fn as_inner(&self) -> &Fr {
        &self.0
    }
}

impl Zeroize for SecretScalar {
    fn zeroize(&mut self) {
        self.0 = Fr::zero();
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Serialize for SecretScalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut bytes = [0u8; 32];
        let be = self.0.into_bigint().to_bytes_be();
        bytes[32 - be.len()..].copy_from_slice(&be);
        bytes.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretScalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: [u8; 32] = Deserialize::deserialize(deserializer)?;
        let scalar = Fr::from_be_bytes_mod_order(&bytes);

        // ensure bytes encodes an integer less than the group order
        // if not then re-serializing will differ from bytes
        let mut roundtrip = [0u8; 32];
        let be = scalar.into_bigint().to_bytes_be();
        roundtrip[32 - be.len()..].copy_from_slice(&be);
        if roundtrip != bytes {
            return Err(D::Error::custom("integer exceeds scalar-field modulus"));
        }
        if scalar.is_zero() {
            return Err(D::Error::custom("zero secret scalar"));
        }

        Ok(Self(scalar))
    }
}

/// A point on the signature group G1, kept in affine form.
///
/// Carries no wire-format tag: whether a buffer holds the verifier layout or
/// the beacon marshal layout is decided entirely by which function in
/// [crate::bls::evm] or [crate::bls::kyber] produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct G1Point(G1Affine);

impl G1Point {
    /// Build from big-endian affine coordinates. `None` on a non-canonical
    /// field encoding; the all-zero pair decodes to the identity, matching
    /// the precompile convention.
    pub(crate) fn from_be_coordinates(x: &[u8; 32], y: &[u8; 32]) -> Option<Self> {
        let x = fq_from_be_bytes_canonical(x)?;
        let y = fq_from_be_bytes_canonical(y)?;
        if x.is_zero() && y.is_zero() {
            return Some(Self(G1Affine::identity()));
        }
        Some(Self(G1Affine::new_unchecked(x, y)))
    }

    /// Big-endian affine coordinates; the identity encodes as all zeroes.
    pub(crate) fn to_be_coordinates(self) -> ([u8; 32], [u8; 32]) {
        match self.0.xy() {
            Some((x, y)) => (fq_to_be_bytes(*x), fq_to_be_bytes(*y)),
            None => ([0; 32], [0; 32]),
        }
    }

    /// On-curve check. G1 has cofactor 1, so this is also the subgroup check.
    pub fn is_valid(&self) -> bool {
        self.0.is_zero() || self.0.is_on_curve()
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    /// Group addition, result normalized back to affine.
    pub fn add(&self, other: &G1Point) -> G1Point {
        Self((G1Projective::from(self.0) + other.0).into_affine())
    }

    /// Scalar multiplication by a secret scalar, normalized to affine.
    pub fn mul(&self, scalar: &SecretScalar) -> G1Point {
        Self((self.0 * scalar.0).into_affine())
    }
}

/// A point on the public-key group G2, kept in affine form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct G2Point(G2Affine);

impl G2Point {
    /// Build from big-endian coordinate parts, each extension-field
    /// coordinate split into its real and imaginary base-field components.
    pub(crate) fn from_be_coordinates(
        x_real: &[u8; 32],
        x_imag: &[u8; 32],
        y_real: &[u8; 32],
        y_imag: &[u8; 32],
    ) -> Option<Self> {
        let x = ark_bn254::Fq2::new(
            fq_from_be_bytes_canonical(x_real)?,
            fq_from_be_bytes_canonical(x_imag)?,
        );
        let y = ark_bn254::Fq2::new(
            fq_from_be_bytes_canonical(y_real)?,
            fq_from_be_bytes_canonical(y_imag)?,
        );
        if x.is_zero() && y.is_zero() {
            return Some(Self(G2Affine::identity()));
        }
        Some(Self(G2Affine::new_unchecked(x, y)))
    }

    /// `(x_real, x_imag, y_real, y_imag)` big-endian; identity is all zeroes.
    pub(crate) fn to_be_coordinates(self) -> [[u8; 32]; 4] {
        match self.0.xy() {
            Some((x, y)) => [
                fq_to_be_bytes(x.c0),
                fq_to_be_bytes(x.c1),
                fq_to_be_bytes(y.c0),
                fq_to_be_bytes(y.c1),
            ],
            None => [[0; 32]; 4],
        }
    }

    /// On-curve and prime-order-subgroup check. G2 has a nontrivial
    /// cofactor, so the subgroup part is not optional.
    pub fn is_valid(&self) -> bool {
        self.0.is_zero()
            || (self.0.is_on_curve() && self.0.is_in_correct_subgroup_assuming_on_curve())
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: &G2Point) -> G2Point {
        Self((G2Projective::from(self.0) + other.0).into_affine())
    }

    pub fn mul(&self, scalar: &SecretScalar) -> G2Point {
        Self((self.0 * scalar.0).into_affine())
    }
}

impl Serialize for G2Point {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let words = self.to_be_coordinates();
        let mut bytes = [0u8; 128];
        for (chunk, word) in bytes.chunks_exact_mut(32).zip(words.iter()) {
            chunk.copy_from_slice(word);
        }
        serializer.serialize_bytes(&bytes)
    }
}

impl<'de> Deserialize<'de> for G2Point {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct G2Visitor;

        impl<'de> Visitor<'de> for G2Visitor {
            type Value = G2Point;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a 128-byte G2 point encoding")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let words: &[u8; 128] =
                    v.try_into().map_err(|_| E::custom("expected 128 bytes"))?;
                let word = |i: usize| -> [u8; 32] {
                    let mut out = [0u8; 32];
                    out.copy_from_slice(&words[32 * i..32 * (i + 1)]);
                    out
                };
                let point = G2Point::from_be_coordinates(&word(0), &word(1), &word(2), &word(3))
                    .ok_or_else(|| E::custom("non-canonical field element"))?;
                if !point.is_valid() {
                    return Err(E::custom("point not in G2"));
                }
                Ok(point)
            }
        }

        deserializer.deserialize_bytes(G2Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn generators_are_valid() {
        let engine = Engine::new();
        assert!(engine.g1_base().is_valid());
        assert!(engine.g2_base().is_valid());
        assert!(!engine.g1_base().is_identity());
        assert!(!engine.g2_base().is_identity());
    }

    #[test]
    fn coordinate_round_trip() {
        let engine = Engine::new();
        let scalar = SecretScalar::random(ChaCha20Rng::seed_from_u64(99));
        let p = engine.g1_base().mul(&scalar);
        let (x, y) = p.to_be_coordinates();
        assert_eq!(G1Point::from_be_coordinates(&x, &y), Some(p));

        let q = engine.g2_base().mul(&scalar);
        let [xr, xi, yr, yi] = q.to_be_coordinates();
        assert_eq!(G2Point::from_be_coordinates(&xr, &xi, &yr, &yi), Some(q));
    }

    #[test]
    fn non_canonical_coordinate_rejected() {
        let modulus_minus_flipped = [0xff; 32]; // far above the field modulus
        let (x, y) = Engine::new().g1_base().to_be_coordinates();
        assert!(G1Point::from_be_coordinates(&modulus_minus_flipped, &y).is_none());
        assert!(G1Point::from_be_coordinates(&x, &modulus_minus_flipped).is_none());
    }

    #[test]
    fn pairing_check_matches_key_relation() {
        let engine = Engine::new();
        let sk = SecretScalar::random(ChaCha20Rng::seed_from_u64(7));
        let other = SecretScalar::random(ChaCha20Rng::seed_from_u64(8));
        let pub_key = engine.g2_base().mul(&sk);

        // an arbitrary message point and its "signature"
        let m = engine.g1_base().mul(&other);
        let sig = m.mul(&sk);

        assert!(engine.pairing_check(&sig, &pub_key, &m));
        // swapping in the wrong message point must fail
        assert!(!engine.pairing_check(&sig, &pub_key, engine.g1_base()));
    }
}
