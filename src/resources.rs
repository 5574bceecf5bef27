// src/resources.rs
//! One parameterized resource client instead of a page per endpoint. Each
//! REST resource (`pengguna`, `perusahaan`, `lowongan`) shares the same
//! getall/get/create/update/delete/import/export surface; only the base
//! path, the export filename, and the form schema differ.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::core::ApiClient;
use crate::form::{FieldKind, FieldSpec, SelectOption};
use crate::types::response::{ItemPayload, ListPayload};
use crate::types::{Company, EmploymentType, JobPosting, User};
use crate::utils;

pub struct Resource<T> {
    base: &'static str,
    export_file: &'static str,
    _marker: PhantomData<T>,
}

pub fn pengguna() -> Resource<User> {
    Resource::new("pengguna", "data-pengguna.xlsx")
}

pub fn perusahaan() -> Resource<Company> {
    Resource::new("perusahaan", "data-perusahaan.xlsx")
}

pub fn lowongan() -> Resource<JobPosting> {
    Resource::new("lowongan", "data-lowongan.xlsx")
}

impl<T> Resource<T>
where
    T: DeserializeOwned,
{
    fn new(base: &'static str, export_file: &'static str) -> Self {
        Self {
            base,
            export_file,
            _marker: PhantomData,
        }
    }

    pub fn base(&self) -> &'static str {
        self.base
    }

    /// Full list; re-fetched on every render, never cached.
    pub async fn get_all(&self, client: &ApiClient) -> Result<Vec<T>> {
        let payload: ListPayload<T> = client
            .get_json(&format!("{}/getall", self.base))
            .await
            .with_context(|| format!("Gagal memuat data {}", self.base))?;
        Ok(payload.into_rows())
    }

    pub async fn get(&self, client: &ApiClient, id: i64) -> Result<T> {
        let payload: ItemPayload<T> = client
            .get_json(&format!("{}/get/{}", self.base, id))
            .await
            .with_context(|| format!("Gagal memuat detail {}", self.base))?;
        Ok(payload.into_item())
    }

    /// Untyped record for edit-form prefill.
    pub async fn get_raw(&self, client: &ApiClient, id: i64) -> Result<Value> {
        let payload: ItemPayload<Value> = client
            .get_json(&format!("{}/get/{}", self.base, id))
            .await
            .with_context(|| format!("Gagal memuat detail {}", self.base))?;
        Ok(payload.into_item())
    }

    pub async fn create(&self, client: &ApiClient, payload: &BTreeMap<String, String>) -> Result<()> {
        client
            .post_unit(&format!("{}/create", self.base), payload)
            .await
            .with_context(|| format!("Gagal menambahkan data {}", self.base))?;
        info!("Created {} record", self.base);
        Ok(())
    }

    pub async fn update(
        &self,
        client: &ApiClient,
        id: i64,
        payload: &BTreeMap<String, String>,
    ) -> Result<()> {
        client
            .put_unit(&format!("{}/update/{}", self.base, id), payload)
            .await
            .with_context(|| format!("Gagal mengedit data {}", self.base))?;
        info!("Updated {} record {}", self.base, id);
        Ok(())
    }

    pub async fn delete(&self, client: &ApiClient, id: i64) -> Result<()> {
        client
            .delete_unit(&format!("{}/delete/{}", self.base, id))
            .await
            .with_context(|| format!("Gagal menghapus data {}", self.base))?;
        info!("Deleted {} record {}", self.base, id);
        Ok(())
    }

    /// Upload a spreadsheet; the caller re-fetches the list afterwards.
    /// Only the extension is sniffed here, the server validates content.
    pub async fn import(&self, client: &ApiClient, file: &Path) -> Result<()> {
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", file.display()))?;
        utils::validate_spreadsheet(file_name)?;

        client
            .post_file(&format!("{}/import", self.base), file)
            .await
            .with_context(|| format!("Gagal mengimpor data {}", self.base))?;
        info!("Imported {} from {}", self.base, file.display());
        Ok(())
    }

    /// Download the export blob under its fixed filename.
    pub async fn export(&self, client: &ApiClient, download_dir: &Path) -> Result<PathBuf> {
        let bytes = client
            .get_bytes(&format!("{}/export", self.base))
            .await
            .with_context(|| format!("Gagal mengekspor data {}", self.base))?;

        let path = utils::write_download(download_dir, self.export_file, &bytes).await?;
        info!("Exported {} to {}", self.base, path.display());
        Ok(path)
    }
}

// Form schemas, one per resource, as the pages declared them.

pub fn pengguna_form() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Nama", "nama", FieldKind::Text).required(),
        FieldSpec::new("Email", "email", FieldKind::Email).required(),
        FieldSpec::new("Kata Sandi", "katasandi", FieldKind::Password).required(),
        FieldSpec::new(
            "Peran",
            "peran",
            FieldKind::Select(vec![
                SelectOption::new("siswa", "Siswa"),
                SelectOption::new("alumni", "Alumni"),
                SelectOption::new("admin", "Admin"),
            ]),
        )
        .required(),
        FieldSpec::new("NISN", "nisn", FieldKind::Text).required(),
        FieldSpec::new("Alamat", "alamat", FieldKind::Textarea),
        FieldSpec::new("Telepon", "telepon", FieldKind::Text).placeholder("08xxxxxxxxxx"),
        FieldSpec::new("Tanggal Lahir", "tanggalLahir", FieldKind::Date),
        FieldSpec::new(
            "Jenis Kelamin",
            "jenisKelamin",
            FieldKind::Select(vec![
                SelectOption::new("Laki-laki", "Laki-laki"),
                SelectOption::new("Perempuan", "Perempuan"),
            ]),
        ),
    ]
}

pub fn perusahaan_form() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Nama Perusahaan", "nama", FieldKind::Text).required(),
        FieldSpec::new("Alamat", "alamat", FieldKind::Textarea).required(),
        FieldSpec::new("Email", "email", FieldKind::Email).required(),
        FieldSpec::new("Telepon", "telepon", FieldKind::Text),
        FieldSpec::new("Deskripsi", "deskripsi", FieldKind::Textarea),
        FieldSpec::new("Gambar", "gambar", FieldKind::Url).placeholder("https://..."),
    ]
}

/// Posting schema; the company select is built from the fetched company
/// list, the employment select from the enum's wire values.
pub fn lowongan_form(companies: &[Company]) -> Vec<FieldSpec> {
    let jenis_options = EmploymentType::ALL
        .iter()
        .map(|jenis| SelectOption::new(jenis.as_str(), jenis.label()))
        .collect();
    let perusahaan_options = companies
        .iter()
        .map(|company| SelectOption::new(company.id.to_string(), company.nama.clone()))
        .collect();

    vec![
        FieldSpec::new("Nama Lowongan", "nama", FieldKind::Text).required(),
        FieldSpec::new("Ketentuan", "ketentuan", FieldKind::Textarea).required(),
        FieldSpec::new("Persyaratan", "persyaratan", FieldKind::Textarea).required(),
        FieldSpec::new("Jenis Pekerjaan", "jenisPekerjaan", FieldKind::Select(jenis_options))
            .required(),
        FieldSpec::new("Perusahaan", "perusahaanId", FieldKind::Select(perusahaan_options))
            .required(),
        FieldSpec::new("Gaji", "salary", FieldKind::Number),
        FieldSpec::new("Tanggal Expired", "expiredAt", FieldKind::Date),
        FieldSpec::new("Link Pendaftaran", "linkPendaftaran", FieldKind::Url),
    ]
}
