use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::{
    array::TryFromSliceError,
    convert::{TryFrom, TryInto},
};

/// Sign only 32-byte hash digests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDigest(pub(crate) [u8; 32]);

impl MessageDigest {
    /// The message signed by a randomness beacon for round `round`:
    /// Keccak-256 over the round number encoded as 8 big-endian bytes.
    /// Existing beacon signatures verify only against exactly this digest.
    pub fn from_round(round: u64) -> Self {
        Self(Keccak256::digest(round.to_be_bytes()).into())
    }
}

impl TryFrom<&[u8]> for MessageDigest {
    type Error = TryFromSliceError;

    fn try_from(v: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(v.try_into()?))
    }
}

impl From<[u8; 32]> for MessageDigest {
    fn from(v: [u8; 32]) -> Self {
        Self(v)
    }
}

impl AsRef<[u8]> for MessageDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
