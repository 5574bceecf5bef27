// src/types/saved.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::job::JobPosting;

/// A bookmark joining an account and a posting, as returned by
/// `lowongan-disimpan/:penggunaId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: i64,
    pub pengguna_id: i64,
    pub lowongan_id: i64,
    /// When the posting was saved.
    pub tanggal: DateTime<Utc>,
    pub lowongan: JobPosting,
}
