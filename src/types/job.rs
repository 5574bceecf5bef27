// src/types/job.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Employment type of a posting, wire values as the backend stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Magang,
    ParuhWaktu,
    PenuhWaktu,
    Freelance,
    Kontrak,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 5] = [
        EmploymentType::Magang,
        EmploymentType::ParuhWaktu,
        EmploymentType::PenuhWaktu,
        EmploymentType::Freelance,
        EmploymentType::Kontrak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::Magang => "magang",
            EmploymentType::ParuhWaktu => "paruh_waktu",
            EmploymentType::PenuhWaktu => "penuh_waktu",
            EmploymentType::Freelance => "freelance",
            EmploymentType::Kontrak => "kontrak",
        }
    }

    /// Human label derived from the wire value: underscores become spaces
    /// and every word is capitalized, matching how the select options are
    /// displayed.
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "magang" => Ok(EmploymentType::Magang),
            "paruh_waktu" => Ok(EmploymentType::ParuhWaktu),
            "penuh_waktu" => Ok(EmploymentType::PenuhWaktu),
            "freelance" => Ok(EmploymentType::Freelance),
            "kontrak" => Ok(EmploymentType::Kontrak),
            _ => Err(format!("{:?} is not a valid employment type", s)),
        }
    }
}

/// Company block embedded in a posting response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nama: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alamat: Option<String>,
}

/// A job posting as returned by `lowongan/*`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: i64,
    pub nama: String,
    /// Newline-delimited terms, rendered as bullets.
    pub ketentuan: String,
    /// Newline-delimited requirements, rendered as bullets.
    pub persyaratan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub jenis_pekerjaan: EmploymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perusahaan_id: Option<i64>,
    pub dibuat_pada: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_pendaftaran: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perusahaan: Option<CompanySummary>,
}

impl JobPosting {
    pub fn terms(&self) -> Vec<&str> {
        split_lines(&self.ketentuan)
    }

    pub fn requirements(&self) -> Vec<&str> {
        split_lines(&self.persyaratan)
    }

    /// External registration link, when present and non-blank.
    pub fn registration_link(&self) -> Option<&str> {
        self.link_pendaftaran
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
