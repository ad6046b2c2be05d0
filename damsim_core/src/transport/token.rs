//! Hex token of compact JSON

use super::{SnapshotTransport, TransportError};
use crate::snapshot::RawSnapshot;
use log::warn;
use serde_json::Value;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Encode any JSON value as a lowercase hex token
pub fn encode_token(value: &Value) -> String {
    let json = value.to_string();
    let mut out = String::with_capacity(json.len() * 2);
    for byte in json.bytes() {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Decode a token produced by [`encode_token`]
pub fn decode_token(token: &str) -> Result<Value, TransportError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TransportError::InvalidToken("empty token".to_string()));
    }
    if token.len() % 2 != 0 {
        return Err(TransportError::InvalidToken("odd length".to_string()));
    }
    let bytes = token
        .as_bytes()
        .chunks(2)
        .map(|pair| match (nibble(pair[0]), nibble(pair[1])) {
            (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
            _ => Err(TransportError::InvalidToken(format!(
                "bad digit pair '{}'",
                String::from_utf8_lossy(pair)
            ))),
        })
        .collect::<Result<Vec<u8>, _>>()?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// [`SnapshotTransport`] over hex tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenTransport;

impl SnapshotTransport for TokenTransport {
    fn serialize(&self, raw: &RawSnapshot) -> String {
        encode_token(raw)
    }

    fn deserialize(&self, text: &str) -> Option<RawSnapshot> {
        match decode_token(text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("could not decode share token: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_round_trip() {
        let value = json!({ "s": { "baseAtk": 5000, "affinity": "adv" }, "name": "ボス" });
        let token = encode_token(&value);
        assert!(token.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(decode_token(&token).unwrap(), value);
        assert_eq!(decode_token(&token.to_uppercase()).unwrap(), value);
    }

    #[test]
    fn test_bad_tokens() {
        assert!(matches!(decode_token(""), Err(TransportError::InvalidToken(_))));
        assert!(matches!(decode_token("abc"), Err(TransportError::InvalidToken(_))));
        assert!(matches!(decode_token("zz"), Err(TransportError::InvalidToken(_))));
        // valid hex, not JSON
        assert!(matches!(decode_token("7b7b"), Err(TransportError::Json(_))));
        assert!(TokenTransport.deserialize("nothex").is_none());
    }
}
