//! Payload encoding for stored values.
//!
//! A payload is a small envelope around a MessagePack body:
//!
//! ```text
//! [version: u8][crc32(body): u32 LE][body: MessagePack, named fields]
//! ```
//!
//! Struct fields are written by name so the body is self-describing and
//! decodes without any external schema.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Current payload format version.
/// Increment this when changing the envelope layout.
pub const PAYLOAD_VERSION: u8 = 1;

const HEADER_LEN: usize = 5;

/// MessagePack marker for `nil`.
const MSGPACK_NIL: u8 = 0xc0;

/// Errors produced while building or reading a payload.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("value is absent")]
    AbsentValue,

    #[error("{0}")]
    Serialize(#[from] rmp_serde::encode::Error),

    #[error("payload truncated: {0} bytes")]
    Truncated(usize),

    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Checksum { expected: u32, actual: u32 },

    #[error("{0}")]
    Deserialize(#[from] rmp_serde::decode::Error),
}

/// Encode a value into a payload.
///
/// Values that serialize to `nil` (`None`, `()`) are rejected with
/// [`CodecError::AbsentValue`].
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    let body = rmp_serde::to_vec_named(value)?;
    if body.as_slice() == [MSGPACK_NIL] {
        return Err(CodecError::AbsentValue);
    }

    let mut payload = Vec::with_capacity(HEADER_LEN + body.len());
    payload.push(PAYLOAD_VERSION);
    payload.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// Decode a payload produced by [`encode`].
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, CodecError> {
    let body = verify(payload)?;
    Ok(rmp_serde::from_slice(body)?)
}

/// Check the envelope and return the body.
fn verify(payload: &[u8]) -> Result<&[u8], CodecError> {
    let (&version, rest) = payload
        .split_first()
        .ok_or(CodecError::Truncated(payload.len()))?;
    let (crc, body) = rest
        .split_first_chunk::<4>()
        .ok_or(CodecError::Truncated(payload.len()))?;

    if version != PAYLOAD_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let expected = u32::from_le_bytes(*crc);
    let actual = crc32fast::hash(body);
    if expected != actual {
        return Err(CodecError::Checksum { expected, actual });
    }

    Ok(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn envelope_header() {
        let payload = encode("value").unwrap();
        assert_eq!(payload[0], PAYLOAD_VERSION);
        let crc = u32::from_le_bytes(payload[1..5].try_into().unwrap());
        assert_eq!(crc, crc32fast::hash(&payload[5..]));
    }

    #[test]
    fn struct_fields_are_named() {
        let payload = encode(&Point { x: 1, y: 2 }).unwrap();
        let body = &payload[HEADER_LEN..];
        // fixmap with two entries, first key "x"
        assert_eq!(body[0], 0x82);
        assert_eq!(&body[1..3], &[0xa1, b'x']);
        assert_eq!(decode::<Point>(&payload).unwrap(), Point { x: 1, y: 2 });
    }

    #[test]
    fn absent_values_are_rejected() {
        assert!(matches!(
            encode(&None::<String>),
            Err(CodecError::AbsentValue)
        ));
        assert!(matches!(encode(&()), Err(CodecError::AbsentValue)));
        // Some(x) is stored as x
        let payload = encode(&Some(7u8)).unwrap();
        assert_eq!(decode::<u8>(&payload).unwrap(), 7);
    }

    #[test]
    fn truncated_payloads() {
        assert!(matches!(decode::<u8>(&[]), Err(CodecError::Truncated(0))));
        assert!(matches!(
            decode::<u8>(&[PAYLOAD_VERSION, 0, 0]),
            Err(CodecError::Truncated(3))
        ));
    }

    #[test]
    fn corrupt_body_fails_checksum() {
        let mut payload = encode(&Point { x: 10, y: 20 }).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0xff;
        assert!(matches!(
            decode::<Point>(&payload),
            Err(CodecError::Checksum { .. })
        ));
    }

    #[test]
    fn unknown_version() {
        let mut payload = encode(&1u32).unwrap();
        payload[0] = 9;
        assert!(matches!(
            decode::<u32>(&payload),
            Err(CodecError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn type_mismatch_is_a_decode_error() {
        let payload = encode("not a number").unwrap();
        assert!(matches!(
            decode::<u64>(&payload),
            Err(CodecError::Deserialize(_))
        ));
    }
}
