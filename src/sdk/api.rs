//! API for bn254-bls users
use thiserror::Error;

pub type BlsResult<T> = Result<T, BlsError>;
pub type BytesVec = Vec<u8>;

/// Failures surfaced to callers.
///
/// A pairing check that simply does not hold is reported as `Ok(false)` by
/// the relevant function, never as a [BlsError]. Errors are reserved for
/// malformed inputs and serialization trouble.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BlsError {
    /// Domain tags are length-prefixed with a single byte on the wire, so an
    /// empty or over-long tag is rejected before any hashing happens.
    #[error("domain tag length {0} not in [1,255]")]
    InvalidDomainTag(usize),

    #[error("session nonce length {0} out of bounds")]
    InvalidSessionNonce(usize),

    /// Expander output request beyond the single-byte block counter or the
    /// two-byte length prefix.
    #[error("expander output length {0} out of bounds")]
    InvalidOutputLength(usize),

    /// Byte string of the wrong length, or a field element not in canonical
    /// reduced form.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(&'static str),

    /// Coordinates decode to a point that is not on the curve or not in the
    /// prime-order subgroup.
    #[error("invalid curve point: {0}")]
    InvalidPoint(&'static str),

    #[error("serialization failure")]
    Serialization,
}

/// Expose bn254-bls's (de)serialization functions
/// that use the appropriate bincode config options.
pub use super::wire_bytes::{deserialize, serialize};
