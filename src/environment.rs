// src/environment.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    /// Base URL of the remote REST API.
    pub api_base_url: String,
    /// JSON file the role-scoped tokens persist to.
    pub session_path: PathBuf,
    /// Directory exported spreadsheets are written into.
    pub download_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load(config_path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        Self::load_from_file(config_path, &environment)
    }

    fn get_environment() -> String {
        std::env::var("LOKERKU_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "{} not found. The portal cannot start without configuration.",
                config_path.display()
            );
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config_file: ConfigFile = serde_yaml::from_str(&config_content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            api_base_url: env_config.api_base_url,
            session_path: Self::resolve_path(&env_config.session_path)?,
            download_path: Self::resolve_path(&env_config.download_path)?,
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the download directory and the session file's parent exist.
    pub async fn ensure_directories(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.download_path)
            .await
            .with_context(|| {
                format!("Failed to create directory: {}", self.download_path.display())
            })?;

        if let Some(parent) = self.session_path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create directory: {}", parent.display())
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_the_local_section_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            concat!(
                "local:\n",
                "  api_base_url: http://localhost:4000/api\n",
                "  session_path: session.json\n",
                "  download_path: unduhan\n",
                "production:\n",
                "  api_base_url: https://api.example.com\n",
                "  session_path: /var/lib/lokerku/session.json\n",
                "  download_path: /var/lib/lokerku/unduhan\n",
            ),
        )
        .unwrap();

        let config = EnvironmentConfig::load_from_file(&config_path, "local").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:4000/api");
        assert!(config.session_path.is_absolute());
        assert!(config.download_path.ends_with("unduhan"));

        let production = EnvironmentConfig::load_from_file(&config_path, "production").unwrap();
        assert_eq!(production.api_base_url, "https://api.example.com");
    }

    #[test]
    fn missing_config_is_a_startup_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.yaml");
        assert!(EnvironmentConfig::load_from_file(&missing, "local").is_err());
    }
}
