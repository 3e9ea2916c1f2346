use hmac::{
    digest::generic_array::GenericArray,
    Hmac, Mac,
};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use tracing::error;

use crate::sdk::{
    api::{BlsError, BlsResult},
    key::SecretRecoveryKey,
};

const SESSION_NONCE_LENGTH_MIN: usize = 4;
const SESSION_NONCE_LENGTH_MAX: usize = 256;

/// Initialize a RNG by hashing the arguments.
/// Intended for use deriving a BLS secret scalar: the scalar is a
/// deterministic function of `(secret_recovery_key, session_nonce)` and the
/// domain-separation tags, so the same inputs always recover the same key.
pub(crate) fn rng_seed_secret_scalar(
    scheme_tag: u8,
    tag: u8,
    secret_recovery_key: &SecretRecoveryKey,
    session_nonce: &[u8],
) -> BlsResult<impl CryptoRng + RngCore> {
    if session_nonce.len() < SESSION_NONCE_LENGTH_MIN
        || session_nonce.len() > SESSION_NONCE_LENGTH_MAX
    {
        error!(
            "invalid session_nonce length {} not in [{},{}]",
            session_nonce.len(),
            SESSION_NONCE_LENGTH_MIN,
            SESSION_NONCE_LENGTH_MAX
        );
        return Err(BlsError::InvalidSessionNonce(session_nonce.len()));
    }

    // Take care not to copy [secret_recovery_key]
    let hmac_key: &GenericArray<_, _> = (&secret_recovery_key.0[..]).into();

    let mut prf = Hmac::<Sha256>::new(hmac_key);

    prf.update(&scheme_tag.to_be_bytes());
    prf.update(&tag.to_be_bytes());
    prf.update(session_nonce);

    let seed = prf.finalize().into_bytes().into();

    Ok(ChaCha20Rng::from_seed(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::key::dummy_secret_recovery_key;
    use tracing_test::traced_test;

    #[test]
    fn identical_seeds_identical_streams() {
        let mut a = rng_seed_secret_scalar(0x42, 0x00, &dummy_secret_recovery_key(7), b"nonce")
            .unwrap();
        let mut b = rng_seed_secret_scalar(0x42, 0x00, &dummy_secret_recovery_key(7), b"nonce")
            .unwrap();
        let (mut buf_a, mut buf_b) = ([0u8; 32], [0u8; 32]);
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn distinct_tags_distinct_streams() {
        let mut a = rng_seed_secret_scalar(0x42, 0x00, &dummy_secret_recovery_key(7), b"nonce")
            .unwrap();
        let mut b = rng_seed_secret_scalar(0x42, 0x01, &dummy_secret_recovery_key(7), b"nonce")
            .unwrap();
        let (mut buf_a, mut buf_b) = ([0u8; 32], [0u8; 32]);
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);
        assert_ne!(buf_a, buf_b);
    }

    #[traced_test]
    #[test]
    fn short_session_nonce_rejected() {
        let result = rng_seed_secret_scalar(0x42, 0x00, &dummy_secret_recovery_key(7), b"abc");
        assert_eq!(result.err(), Some(BlsError::InvalidSessionNonce(3)));
        assert!(logs_contain("invalid session_nonce length"));
    }
}
