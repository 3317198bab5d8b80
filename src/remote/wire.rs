//! Value encoding for the remote key-value store.
//!
//! Values are short decimal strings.  Over HTTP each value travels in a
//! one-field JSON body:
//!
//! ```text
//!   {"value":"1"}
//! ```

use core::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::shared::DoorStatus;

/// Longest value the store exchanges.
pub const VALUE_MAX_LEN: usize = 32;

/// A fixed-capacity remote value.
pub type Value = heapless::String<VALUE_MAX_LEN>;

#[derive(Debug, Serialize, Deserialize)]
struct Body {
    value: Value,
}

pub fn door_status(status: DoorStatus) -> Value {
    integer(i64::from(status.wire_code()))
}

pub fn integer(n: i64) -> Value {
    let mut out = Value::new();
    // 20 chars is the longest i64; always fits.
    let _ = write!(out, "{n}");
    out
}

/// Copy `raw` into a [`Value`].
pub fn value(raw: &str) -> Result<Value, RemoteError> {
    let mut out = Value::new();
    out.push_str(raw).map_err(|()| RemoteError::ValueTooLong)?;
    Ok(out)
}

/// `{"value":"..."}` for a PUT request.
pub fn encode_body(value: &str) -> Result<Vec<u8>, RemoteError> {
    let body = Body {
        value: self::value(value)?,
    };
    serde_json::to_vec(&body).map_err(|_| RemoteError::Protocol)
}

/// Extract the value from a GET response body.
pub fn decode_body(bytes: &[u8]) -> Result<Value, RemoteError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::new());
    }
    serde_json::from_slice::<Body>(bytes)
        .map(|b| b.value)
        .map_err(|_| RemoteError::Protocol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_as_text() {
        assert_eq!(door_status(DoorStatus::Closed).as_str(), "1");
        assert_eq!(door_status(DoorStatus::Closing).as_str(), "3");
        assert_eq!(integer(-1).as_str(), "-1");
    }

    #[test]
    fn body_shape() {
        let bytes = encode_body("47").unwrap();
        assert_eq!(bytes, br#"{"value":"47"}"#);
        assert_eq!(decode_body(&bytes).unwrap().as_str(), "47");
    }

    #[test]
    fn empty_response_means_no_value() {
        assert_eq!(decode_body(b"").unwrap().as_str(), "");
        assert_eq!(decode_body(b" \n").unwrap().as_str(), "");
    }

    #[test]
    fn bad_bodies_rejected() {
        assert_eq!(decode_body(b"{\"v\":1}"), Err(RemoteError::Protocol));
        assert_eq!(decode_body(b"not json"), Err(RemoteError::Protocol));
        let long = "x".repeat(VALUE_MAX_LEN + 1);
        assert_eq!(encode_body(&long), Err(RemoteError::ValueTooLong));
    }
}
