//! BLS signatures over BN254, arranged for an EVM pairing-check verifier.
//!
//! Signatures and hashed messages live in G1, public keys in G2. Local
//! signing produces both the signature and the hashed message point, and
//! [to_args] packages everything in the verifier contract's calling
//! convention; the authoritative pairing check runs on-chain. The
//! [pairing_equivalent] helper mirrors that check for tests and off-chain
//! sanity only.

use serde::{Deserialize, Serialize};
use sha3::Keccak256;
use tracing::warn;

use crate::{
    constants::BLS_TAG,
    crypto_tools::rng,
    curve::{Engine, G1Point, G2Point, SecretScalar},
    sdk::api::{BlsError, BlsResult},
};

pub mod evm;
pub mod hash_to_curve;
pub mod kyber;

use hash_to_curve::{hash_to_point, DomainTag};

pub use crate::crypto_tools::message_digest::MessageDigest;
pub use crate::sdk::key::SecretRecoveryKey;

#[derive(Debug, Serialize, Deserialize)]
pub struct KeyPair {
    secret_key: SecretScalar,
    pub_key: G2Point,
}

impl KeyPair {
    pub fn pub_key(&self) -> &G2Point {
        &self.pub_key
    }

    pub fn encoded_pub_key(&self) -> [u8; evm::G2_SERIALIZED_LENGTH] {
        evm::serialize_g2(&self.pub_key)
    }
}

/// Derive a BLS key pair from `(secret_recovery_key, session_nonce)`.
/// The same inputs always derive the same key pair.
pub fn keygen(
    engine: &Engine,
    secret_recovery_key: &SecretRecoveryKey,
    session_nonce: &[u8],
) -> BlsResult<KeyPair> {
    let rng = rng::rng_seed_secret_scalar(BLS_TAG, KEYGEN_TAG, secret_recovery_key, session_nonce)?;

    let secret_key = SecretScalar::random(rng);
    let pub_key = engine.g2_base().mul(&secret_key);

    Ok(KeyPair {
        secret_key,
        pub_key,
    })
}

/// Sign a message digest: `m = hash_to_point(digest)`, `signature = sk · m`.
/// Deterministic; returns the hashed message point alongside the signature
/// because the verifier needs both.
pub fn sign(
    engine: &Engine,
    domain: &DomainTag,
    key_pair: &KeyPair,
    message_digest: &MessageDigest,
) -> (G1Point, G1Point) {
    let message_point = hash_to_point::<Keccak256>(engine, domain, message_digest.as_ref());
    let signature = message_point.mul(&key_pair.secret_key);
    (signature, message_point)
}

/// The verifier contract's positional arguments, already in its wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyArgs {
    pub signature: [u8; evm::G1_SERIALIZED_LENGTH],
    pub pub_key: [u8; evm::G2_SERIALIZED_LENGTH],
    pub message_point: [u8; evm::G1_SERIALIZED_LENGTH],
}

/// Serialize `(signature, pub_key, message_point)` for the verifier call.
/// The only function that crosses into the verifier's calling convention.
pub fn to_args(pub_key: &G2Point, message_point: &G1Point, signature: &G1Point) -> VerifyArgs {
    VerifyArgs {
        signature: evm::serialize_g1(signature),
        pub_key: evm::serialize_g2(pub_key),
        message_point: evm::serialize_g1(message_point),
    }
}

/// Off-chain mirror of the verifier's pairing check, operating on the same
/// wire bytes the contract would receive. `Ok(false)` means a well-formed
/// but invalid signature; malformed arguments are errors.
///
/// The identity public key is rejected outright: both pairings degenerate
/// to one, so it would "verify" any identity signature on any message.
pub fn pairing_equivalent(engine: &Engine, args: &VerifyArgs) -> BlsResult<bool> {
    let signature = evm::deserialize_g1(&args.signature)?;
    let pub_key = evm::deserialize_g2(&args.pub_key)?;
    let message_point = evm::deserialize_g1(&args.message_point)?;

    if pub_key.is_identity() {
        warn!("pairing check rejected: identity public key");
        return Err(BlsError::InvalidPoint("identity public key"));
    }

    Ok(engine.pairing_check(&signature, &pub_key, &message_point))
}

/// Domain separation for seeding the RNG
const KEYGEN_TAG: u8 = 0x00;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::key::dummy_secret_recovery_key;

    fn test_domain() -> DomainTag {
        DomainTag::new(b"testing evmbls").unwrap()
    }

    #[test]
    fn keygen_is_deterministic() {
        let engine = Engine::new();
        let a = keygen(&engine, &dummy_secret_recovery_key(0), b"nonce").unwrap();
        let b = keygen(&engine, &dummy_secret_recovery_key(0), b"nonce").unwrap();
        assert_eq!(a.pub_key(), b.pub_key());

        let c = keygen(&engine, &dummy_secret_recovery_key(1), b"nonce").unwrap();
        assert_ne!(a.pub_key(), c.pub_key());
    }

    #[test]
    fn sign_and_pairing_check() {
        let engine = Engine::new();
        let key_pair = keygen(&engine, &dummy_secret_recovery_key(0), b"nonce").unwrap();
        let digest = MessageDigest::from_round(1);

        let (signature, message_point) = sign(&engine, &test_domain(), &key_pair, &digest);
        assert!(signature.is_valid());
        assert!(message_point.is_valid());

        let args = to_args(key_pair.pub_key(), &message_point, &signature);
        assert_eq!(pairing_equivalent(&engine, &args), Ok(true));
    }

    #[test]
    fn wrong_key_fails_pairing_check() {
        let engine = Engine::new();
        let signer = keygen(&engine, &dummy_secret_recovery_key(0), b"nonce").unwrap();
        let other = keygen(&engine, &dummy_secret_recovery_key(1), b"nonce").unwrap();
        let digest = MessageDigest::from_round(1);

        let (signature, message_point) = sign(&engine, &test_domain(), &signer, &digest);
        let args = to_args(other.pub_key(), &message_point, &signature);
        assert_eq!(pairing_equivalent(&engine, &args), Ok(false));
    }

    /// All-zero encodings decode to the identity per the precompile
    /// convention, and an identity key plus identity signature would satisfy
    /// the raw pairing equation for any message.
    #[test]
    fn identity_public_key_rejected() {
        let engine = Engine::new();
        let domain = test_domain();
        let digest = MessageDigest::from_round(1);
        let message_point = hash_to_curve::hash_to_point::<Keccak256>(
            &engine,
            &domain,
            digest.as_ref(),
        );

        let forged = VerifyArgs {
            signature: [0; evm::G1_SERIALIZED_LENGTH],
            pub_key: [0; evm::G2_SERIALIZED_LENGTH],
            message_point: evm::serialize_g1(&message_point),
        };
        assert_eq!(
            pairing_equivalent(&engine, &forged),
            Err(BlsError::InvalidPoint("identity public key"))
        );
    }

    #[test]
    fn sign_is_deterministic() {
        let engine = Engine::new();
        let key_pair = keygen(&engine, &dummy_secret_recovery_key(0), b"nonce").unwrap();
        let digest = MessageDigest::from_round(7);

        let (sig_a, m_a) = sign(&engine, &test_domain(), &key_pair, &digest);
        let (sig_b, m_b) = sign(&engine, &test_domain(), &key_pair, &digest);
        assert_eq!(sig_a, sig_b);
        assert_eq!(m_a, m_b);
    }

    #[test]
    fn key_pair_serialization_round_trip() {
        let engine = Engine::new();
        let key_pair = keygen(&engine, &dummy_secret_recovery_key(3), b"nonce").unwrap();

        let bytes = crate::sdk::api::serialize(&key_pair).unwrap();
        let recovered: KeyPair = crate::sdk::api::deserialize(&bytes).unwrap();
        assert_eq!(recovered.pub_key(), key_pair.pub_key());

        // the recovered secret key still signs identically
        let digest = MessageDigest::from_round(2);
        let (sig_a, _) = sign(&engine, &test_domain(), &key_pair, &digest);
        let (sig_b, _) = sign(&engine, &test_domain(), &recovered, &digest);
        assert_eq!(sig_a, sig_b);
    }
}
