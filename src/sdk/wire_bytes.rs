use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{error, warn};

use super::api::{BlsError, BlsResult, BytesVec};

const SERIALIZATION_VERSION: u16 = 0;

/// Serialize `value` inside a versioned envelope so that stored key material
/// can be migrated if the encoding ever changes.
pub fn serialize<T: ?Sized>(value: &T) -> BlsResult<BytesVec>
where
    T: serde::Serialize,
{
    let payload = serialize_raw(value)?;
    serialize_raw(&BytesVecVersioned {
        version: SERIALIZATION_VERSION,
        payload,
    })
}

fn serialize_raw<T: ?Sized>(value: &T) -> BlsResult<BytesVec>
where
    T: serde::Serialize,
{
    match bincode::serialize(value) {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            error!("serialization failure: {}", err.to_string());
            Err(BlsError::Serialization)
        }
    }
}

/// deserialization failures are non-fatal: do not return [BlsResult]
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    let bytes_versioned: BytesVecVersioned = bincode::deserialize(bytes)
        .map_err(|err| {
            warn!("outer deserialization failure: {}", err.to_string());
        })
        .ok()?;
    if bytes_versioned.version != SERIALIZATION_VERSION {
        warn!(
            "encoding version {}, expected {}",
            bytes_versioned.version, SERIALIZATION_VERSION
        );
        return None;
    }
    bincode::deserialize(&bytes_versioned.payload)
        .map_err(|err| {
            warn!("inner deserialization failure: {}", err.to_string());
        })
        .ok()
}

#[derive(Serialize, Deserialize)]
struct BytesVecVersioned {
    version: u16,
    payload: BytesVec,
}
