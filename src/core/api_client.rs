// src/core/api_client.rs
//! HTTP client wrapper over the job-board REST API. One configured
//! `reqwest::Client`; every request carries the bearer token selected by
//! the current route namespace, and an unauthorized response without a
//! stored token forces navigation back to the login page.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::session::{lock_store, Navigator, RouteClass, TokenStore};
use crate::types::response::ApiMessage;
use crate::utils;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<Mutex<TokenStore>>,
    navigator: Arc<dyn Navigator>,
    /// Path the UI is "on"; drives token selection per route namespace.
    location: Mutex<String>,
}

impl ApiClient {
    pub fn new(
        base_url: String,
        tokens: Arc<Mutex<TokenStore>>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            navigator,
            location: Mutex::new("/".to_string()),
        })
    }

    /// Move the client onto a page path (`/admin/...`, `/Id/...`, `/`).
    pub fn set_location(&self, path: &str) {
        let mut location = self
            .location
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *location = path.to_string();
    }

    pub fn current_route(&self) -> RouteClass {
        let location = self
            .location
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        RouteClass::of(&location)
    }

    pub fn store_token(&self, name: &str, value: &str) -> Result<()> {
        lock_store(&self.tokens).set(name, value)
    }

    pub fn clear_tokens(&self) -> Result<()> {
        lock_store(&self.tokens).clear()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn bearer_token(&self) -> Option<String> {
        let store = lock_store(&self.tokens);
        self.current_route().token_from(&store).map(str::to_owned)
    }

    /// Attach the route-scoped bearer token and send. On a 401 with no
    /// stored token for the current namespace, force-navigate to the login
    /// page; the response itself still flows back to the caller.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let token = self.bearer_token();
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.context("HTTP request failed")?;
        self.handle_unauthorized(response.status(), token.is_some());

        Ok(response)
    }

    /// A 401 without a stored token for the current namespace sends the
    /// user back to the login page; everything else flows to the caller.
    fn handle_unauthorized(&self, status: StatusCode, had_token: bool) {
        if status == StatusCode::UNAUTHORIZED && !had_token {
            warn!("Unauthorized response without a stored token, returning to login");
            self.navigator.redirect("/");
        }
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|parsed| parsed.message)
            .unwrap_or(body);

        format!("HTTP {} error: {}", status, message)
    }

    async fn parse<R>(response: reqwest::Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        if response.status().is_success() {
            response
                .json::<R>()
                .await
                .context("Failed to parse JSON response")
        } else {
            anyhow::bail!(Self::error_message(response).await)
        }
    }

    async fn expect_success(response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            anyhow::bail!(Self::error_message(response).await)
        }
    }

    pub async fn get_json<R>(&self, endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("GET {}", url);

        let response = self
            .execute(self.client.get(&url))
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;
        Self::parse(response).await
    }

    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let response = self
            .execute(self.client.post(&url).json(payload))
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;
        Self::parse(response).await
    }

    /// POST where only success matters; mutation response bodies are not
    /// inspected.
    pub async fn post_unit<T>(&self, endpoint: &str, payload: &T) -> Result<()>
    where
        T: Serialize,
    {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let response = self
            .execute(self.client.post(&url).json(payload))
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;
        Self::expect_success(response).await
    }

    pub async fn put_unit<T>(&self, endpoint: &str, payload: &T) -> Result<()>
    where
        T: Serialize,
    {
        let url = self.url(endpoint);
        debug!("PUT {}", url);

        let response = self
            .execute(self.client.put(&url).json(payload))
            .await
            .with_context(|| format!("Failed to PUT to {}", url))?;
        Self::expect_success(response).await
    }

    pub async fn delete_unit(&self, endpoint: &str) -> Result<()> {
        let url = self.url(endpoint);
        debug!("DELETE {}", url);

        let response = self
            .execute(self.client.delete(&url))
            .await
            .with_context(|| format!("Failed to DELETE {}", url))?;
        Self::expect_success(response).await
    }

    /// Upload one file as the multipart part `file` (spreadsheet import).
    pub async fn post_file(&self, endpoint: &str, file_path: &Path) -> Result<()> {
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", file_path.display()))?
            .to_string();
        let content_type = utils::spreadsheet_content_type(&file_name)?;

        let file_content = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

        let form = Form::new().part(
            "file",
            Part::bytes(file_content)
                .file_name(file_name)
                .mime_str(content_type)
                .context("Failed to create multipart part")?,
        );

        let url = self.url(endpoint);
        debug!("POST {} (multipart)", url);

        let response = self
            .execute(self.client.post(&url).multipart(form))
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;
        Self::expect_success(response).await
    }

    /// GET returning the raw body bytes (spreadsheet export blobs).
    pub async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>> {
        let url = self.url(endpoint);
        debug!("GET {} (blob)", url);

        let response = self
            .execute(self.client.get(&url))
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;

        if response.status().is_success() {
            let bytes = response
                .bytes()
                .await
                .context("Failed to read response body")?;
            Ok(bytes.to_vec())
        } else {
            anyhow::bail!(Self::error_message(response).await)
        }
    }
}
