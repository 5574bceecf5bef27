// src/types/company.rs
use serde::{Deserialize, Serialize};

/// A company as returned by `perusahaan/*`. Owns zero or more job postings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    pub nama: String,
    pub alamat: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telepon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deskripsi: Option<String>,
    /// Image reference as served by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gambar: Option<String>,
}
