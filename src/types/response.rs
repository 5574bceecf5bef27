// src/types/response.rs
//! Response envelopes. The backend is inconsistent about wrapping: most
//! list/get endpoints return `{ "data": ... }` while `pengguna/getall` and
//! `auth/profile` return the value bare, so payloads accept both shapes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// List body: `{ "data": [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Enveloped(DataEnvelope<Vec<T>>),
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn into_rows(self) -> Vec<T> {
        match self {
            ListPayload::Enveloped(envelope) => envelope.data,
            ListPayload::Bare(rows) => rows,
        }
    }
}

/// Single-record body: `{ "data": {...} }` or the bare record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemPayload<T> {
    Enveloped(DataEnvelope<T>),
    Bare(T),
}

impl<T> ItemPayload<T> {
    pub fn into_item(self) -> T {
        match self {
            ItemPayload::Enveloped(envelope) => envelope.data,
            ItemPayload::Bare(item) => item,
        }
    }
}

/// Body of a successful `auth/login`. `tokenName` tells the client which
/// storage key the token belongs under.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub redirect_to: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Minimal error body; failures carry a human-readable `message`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_payload_accepts_both_shapes() {
        let enveloped: ListPayload<i64> = serde_json::from_str(r#"{"data":[1,2,3]}"#).unwrap();
        assert_eq!(enveloped.into_rows(), vec![1, 2, 3]);

        let bare: ListPayload<i64> = serde_json::from_str(r#"[4,5]"#).unwrap();
        assert_eq!(bare.into_rows(), vec![4, 5]);
    }

    #[test]
    fn item_payload_accepts_both_shapes() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Record {
            id: i64,
        }

        let enveloped: ItemPayload<Record> =
            serde_json::from_str(r#"{"data":{"id":9}}"#).unwrap();
        assert_eq!(enveloped.into_item(), Record { id: 9 });

        let bare: ItemPayload<Record> = serde_json::from_str(r#"{"id":3}"#).unwrap();
        assert_eq!(bare.into_item(), Record { id: 3 });
    }
}
