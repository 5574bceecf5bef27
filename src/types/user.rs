// src/types/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role. Decides which navigation entries are visible and which
/// token key a login is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Siswa,
    Alumni,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Siswa => "siswa",
            Role::Alumni => "alumni",
        }
    }

    /// Local-storage key the login token for this role is persisted under.
    pub fn token_key(&self) -> &'static str {
        match self {
            Role::Admin => "admin_token",
            Role::Siswa => "siswa_token",
            Role::Alumni => "alumni_token",
        }
    }

    /// Navigation entries shown for this role.
    pub fn menu_entries(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &["dashboard", "pengguna", "perusahaan", "lowongan", "setting"],
            Role::Siswa | Role::Alumni => &["home", "lowongan", "perusahaan", "simpan", "profile"],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "siswa" => Ok(Role::Siswa),
            "alumni" => Ok(Role::Alumni),
            _ => Err(format!("{:?} is not a valid role", s)),
        }
    }
}

/// A portal account as returned by `pengguna/*` and `auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub nama: String,
    pub email: String,
    pub peran: Role,
    pub nisn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alamat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telepon: Option<String>,
    /// Kept as the raw wire string; normalized to `YYYY-MM-DD` only when
    /// prefilling edit forms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tanggal_lahir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jenis_kelamin: Option<String>,
    pub dibuat_pada: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Siswa, Role::Alumni] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
        assert!(Role::from_str("guru").is_err());
    }

    #[test]
    fn role_token_keys() {
        assert_eq!(Role::Admin.token_key(), "admin_token");
        assert_eq!(Role::Siswa.token_key(), "siswa_token");
        assert_eq!(Role::Alumni.token_key(), "alumni_token");
    }

    #[test]
    fn user_deserializes_from_wire_shape() {
        let raw = r#"{
            "id": 7,
            "nama": "Budi Santoso",
            "email": "budi@example.com",
            "peran": "siswa",
            "nisn": "0051234567",
            "tanggalLahir": "2006-02-11T00:00:00.000Z",
            "jenisKelamin": "Laki-laki",
            "dibuatPada": "2024-05-01T08:30:00Z"
        }"#;

        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.peran, Role::Siswa);
        assert_eq!(user.nisn, "0051234567");
        assert_eq!(user.alamat, None);
        assert_eq!(user.jenis_kelamin.as_deref(), Some("Laki-laki"));
    }
}
