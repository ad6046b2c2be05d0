//! Share links carrying a whole comparison
//!
//! Payload shape (before hex encoding):
//!
//! ```json
//! {
//!   "s": { ...linked snapshot... },
//!   "cmp": { "s": { ...comparison snapshot... }, "name": "rival" },
//!   "roles": { "base": "A", "comp": "B" },
//!   "link": "A",
//!   "meta": { "presetName": "main", "compName": "rival" }
//! }
//! ```

use super::query::query_pairs;
use super::token::{decode_token, encode_token};
use super::{QueryTransport, TransportError};
use crate::compare::RoleMap;
use crate::snapshot::RawSnapshot;
use crate::types::Side;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison name used when a shared payload carries none
pub const SHARED_NAME: &str = "shared preset";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareComparison {
    #[serde(rename = "s")]
    pub snapshot: RawSnapshot,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comp_name: Option<String>,
}

/// Everything a share link restores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    #[serde(rename = "s")]
    pub snapshot: RawSnapshot,
    #[serde(rename = "cmp")]
    pub comparison: Option<ShareComparison>,
    pub roles: RoleMap,
    pub link: Side,
    #[serde(default)]
    pub meta: ShareMeta,
}

fn side_of(value: Option<&Value>) -> Option<Side> {
    value.and_then(Value::as_str).and_then(Side::parse)
}

fn trimmed(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl SharePayload {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Read a decoded payload, filling gaps the way old links need:
    /// - no `roles` → base `A`, comp the other side; equal roles → A/B
    /// - no valid `link` → `A`
    /// - `cmp` may be the comparison snapshot itself instead of `{s, name}`
    /// - comparison name: `cmp.name`, else `meta.compName`, else [`SHARED_NAME`]
    pub fn from_value(value: &Value) -> Result<SharePayload, TransportError> {
        let obj = value
            .as_object()
            .ok_or(TransportError::Unsupported("payload is not an object"))?;
        let snapshot = obj
            .get("s")
            .filter(|s| !s.is_null())
            .cloned()
            .ok_or(TransportError::Unsupported("payload has no snapshot"))?;

        let meta = obj.get("meta");
        let meta = ShareMeta {
            preset_name: trimmed(meta.and_then(|m| m.get("presetName"))),
            comp_name: trimmed(meta.and_then(|m| m.get("compName"))),
        };

        let comparison = match obj.get("cmp") {
            None | Some(Value::Null) => None,
            Some(block) => {
                let (snapshot, name) = match block.get("s") {
                    Some(inner) => (inner.clone(), trimmed(block.get("name"))),
                    None => (block.clone(), None),
                };
                let name = name
                    .or_else(|| meta.comp_name.clone())
                    .unwrap_or_else(|| SHARED_NAME.to_string());
                Some(ShareComparison { snapshot, name })
            }
        };

        let roles = obj.get("roles");
        let base = side_of(roles.and_then(|r| r.get("base"))).unwrap_or(Side::A);
        let comp = side_of(roles.and_then(|r| r.get("comp"))).unwrap_or_else(|| base.other());
        let link = side_of(obj.get("link")).unwrap_or(Side::A);

        Ok(SharePayload {
            snapshot,
            comparison,
            roles: RoleMap::new(base, comp),
            link,
            meta,
        })
    }
}

/// What a share link decodes to
#[derive(Debug, Clone, PartialEq)]
pub enum SharedState {
    /// `z=` token with a full comparison
    Full(SharePayload),
    /// Legacy short-key query with one snapshot
    Single(RawSnapshot),
}

/// Build a share link: `<base_url>?z=<token>`
pub fn share_link(base_url: &str, payload: &SharePayload) -> String {
    let sep = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}z={}", base_url, sep, encode_token(&payload.to_value()))
}

/// Decode a share link, a bare query string or a bare token.
///
/// A `z=` token wins when it decodes; otherwise the legacy short keys are
/// tried. `None` when neither yields anything.
pub fn parse_share_link(text: &str) -> Option<SharedState> {
    let text = text.trim();
    let text = text.split('#').next().unwrap_or(text);
    let query = match text.split_once('?') {
        Some((_, query)) => query,
        None if text.contains('=') => text,
        None => {
            return decode_token(text)
                .and_then(|v| SharePayload::from_value(&v))
                .map(SharedState::Full)
                .map_err(|e| warn!("could not decode share token: {}", e))
                .ok();
        }
    };

    let token = query_pairs(query)
        .into_iter()
        .find(|(k, _)| k == "z")
        .map(|(_, v)| v);
    if let Some(token) = token {
        match decode_token(&token).and_then(|v| SharePayload::from_value(&v)) {
            Ok(payload) => return Some(SharedState::Full(payload)),
            Err(e) => warn!("could not decode share token, trying short keys: {}", e),
        }
    }
    QueryTransport.decode(query).map(SharedState::Single)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_round_trip() {
        let payload = SharePayload {
            snapshot: json!({ "baseAtk": 5000 }),
            comparison: Some(ShareComparison {
                snapshot: json!({ "baseAtk": 6000 }),
                name: "rival".into(),
            }),
            roles: RoleMap::new(Side::B, Side::A),
            link: Side::A,
            meta: ShareMeta {
                preset_name: Some("main".into()),
                comp_name: Some("rival".into()),
            },
        };
        let link = share_link("https://example.invalid/damsim/", &payload);
        assert!(link.starts_with("https://example.invalid/damsim/?z="));
        assert_eq!(parse_share_link(&link), Some(SharedState::Full(payload)));
    }

    #[test]
    fn test_decode_defaults() {
        let payload = SharePayload::from_value(&json!({
            "s": { "baseAtk": 1 },
            "cmp": { "baseAtk": 2 },
            "roles": { "base": "B", "comp": "B" },
            "link": "C"
        }))
        .unwrap();
        assert_eq!(payload.roles, RoleMap::default());
        assert_eq!(payload.link, Side::A);
        let cmp = payload.comparison.unwrap();
        assert_eq!(cmp.snapshot, json!({ "baseAtk": 2 }));
        assert_eq!(cmp.name, SHARED_NAME);
    }

    #[test]
    fn test_decode_name_from_meta_and_missing_comp_role() {
        let payload = SharePayload::from_value(&json!({
            "s": {},
            "cmp": { "s": {}, "name": "  " },
            "roles": { "base": "B" },
            "meta": { "compName": "boss", "presetName": " mine " }
        }))
        .unwrap();
        assert_eq!(payload.roles, RoleMap::new(Side::B, Side::A));
        assert_eq!(payload.comparison.unwrap().name, "boss");
        assert_eq!(payload.meta.preset_name.as_deref(), Some("mine"));
    }

    #[test]
    fn test_payload_without_snapshot_is_rejected() {
        assert!(SharePayload::from_value(&json!({ "cmp": null })).is_err());
        assert!(SharePayload::from_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_legacy_fallback() {
        let state = parse_share_link("https://example.invalid/?ba=4200&mode=standard").unwrap();
        match state {
            SharedState::Single(raw) => assert_eq!(raw["baseAtk"], "4200"),
            other => panic!("expected legacy snapshot, got {:?}", other),
        }
        // broken token, legacy keys still apply
        assert!(matches!(
            parse_share_link("?z=nothex&ba=1"),
            Some(SharedState::Single(_))
        ));
        assert!(parse_share_link("?utm=1").is_none());
    }
}
