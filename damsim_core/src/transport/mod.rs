//! Snapshot transport - turning snapshots into shareable text and back
//!
//! Two encodings exist:
//! - [`TokenTransport`]: compact JSON as a hex token, used for the `z=`
//!   share link that carries a whole comparison
//! - [`QueryTransport`]: the older `key=value&...` query with short keys,
//!   one snapshot only
//!
//! Decoding never fails hard. Whatever comes back is partial at best and
//! must go through [`normalize`](crate::snapshot::normalize) before use.

mod query;
mod share;
mod token;

pub use query::QueryTransport;
pub use share::{parse_share_link, share_link, ShareComparison, ShareMeta, SharePayload, SharedState, SHARED_NAME};
pub use token::{decode_token, encode_token, TokenTransport};

use crate::snapshot::RawSnapshot;
use thiserror::Error;

/// Transport decoding error
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Share token is not valid hex: {0}")]
    InvalidToken(String),
    #[error("Share token is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported share payload: {0}")]
    Unsupported(&'static str),
}

/// Encoding of a raw snapshot as opaque text
pub trait SnapshotTransport {
    fn serialize(&self, raw: &RawSnapshot) -> String;

    /// Decode text produced by [`serialize`](Self::serialize). `None` on
    /// failure; a successful result may still be partial.
    fn deserialize(&self, text: &str) -> Option<RawSnapshot>;
}
