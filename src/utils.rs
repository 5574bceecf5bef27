// src/utils.rs
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};

/// Extensions the spreadsheet import accepts. Only a sniff; the server
/// performs the authoritative validation.
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate that a file looks like a spreadsheet by extension.
pub fn validate_spreadsheet(filename: &str) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            SPREADSHEET_EXTENSIONS
        );
    }

    Ok(())
}

/// Content type for a spreadsheet upload part.
pub fn spreadsheet_content_type(filename: &str) -> Result<&'static str> {
    let lower_name = filename.to_lowercase();
    if lower_name.ends_with(".xlsx") {
        Ok("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    } else if lower_name.ends_with(".xls") {
        Ok("application/vnd.ms-excel")
    } else {
        anyhow::bail!("Unsupported file format: {}", filename)
    }
}

/// Normalize a wire date value to `YYYY-MM-DD` for date input fields.
/// Accepts RFC 3339 timestamps, bare datetimes, and already-plain dates;
/// anything else is passed through unchanged.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}

/// Render a timestamp the way the pages do (`id-ID` day/month/year).
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y").to_string()
}

/// Salary display, numeric-as-string straight from the wire.
pub fn format_salary(salary: &str) -> String {
    format!("Rp {}", salary)
}

// File system utilities
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Write an exported blob under the download directory, returning the
/// final path.
pub async fn write_download(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    ensure_dir_exists(dir).await?;

    let path = dir.join(filename);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("data.xlsx"), Some("xlsx".to_string()));
        assert_eq!(get_file_extension("legacy.XLS"), Some("xls".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_spreadsheet() {
        assert!(validate_spreadsheet("data-pengguna.xlsx").is_ok());
        assert!(validate_spreadsheet("arsip.XLS").is_ok());
        assert!(validate_spreadsheet("laporan.pdf").is_err());
        assert!(validate_spreadsheet("noext").is_err());
    }

    #[test]
    fn test_spreadsheet_content_type() {
        assert_eq!(
            spreadsheet_content_type("data.xlsx").unwrap(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            spreadsheet_content_type("data.xls").unwrap(),
            "application/vnd.ms-excel"
        );
        assert!(spreadsheet_content_type("data.csv").is_err());
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("2006-02-11T00:00:00.000Z"), "2006-02-11");
        assert_eq!(normalize_date("2006-02-11T00:00:00"), "2006-02-11");
        assert_eq!(normalize_date("2006-02-11"), "2006-02-11");
        assert_eq!(normalize_date("bukan tanggal"), "bukan tanggal");
    }

    #[tokio::test]
    async fn test_write_download() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("unduhan");

        let path = write_download(&target, "data-pengguna.xlsx", b"blob").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"blob");
    }
}
