// src/auth.rs
//! Login and profile against `auth/*`. Tokens are opaque to this client;
//! the login response names the storage key (`tokenName`) and the client
//! persists the token under it.

use anyhow::Result;
use serde_json::json;
use tracing::info;

use crate::core::ApiClient;
use crate::types::response::{ItemPayload, LoginResponse};
use crate::types::User;

const DEFAULT_REDIRECT: &str = "/Id/home";

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Page to land on after login, as directed by the server.
    pub redirect_to: String,
    /// Storage key the token was persisted under.
    pub token_name: String,
}

/// POST `auth/login` with NISN and password. Empty inputs are rejected
/// before any request goes out.
pub async fn login(client: &ApiClient, nisn: &str, katasandi: &str) -> Result<LoginOutcome> {
    if nisn.trim().is_empty() || katasandi.trim().is_empty() {
        anyhow::bail!("NISN dan Kata Sandi harus diisi.");
    }

    let response: LoginResponse = client
        .post_json(
            "auth/login",
            &json!({
                "nisn": nisn,
                "katasandi": katasandi,
            }),
        )
        .await?;

    let token = response.access_token.filter(|token| !token.is_empty());
    let token_name = response.token_name.filter(|name| !name.is_empty());
    let (token, token_name) = match (token, token_name) {
        (Some(token), Some(token_name)) => (token, token_name),
        _ => anyhow::bail!("Token tidak ditemukan, login gagal."),
    };

    client.store_token(&token_name, &token)?;
    info!("Logged in, token stored under {}", token_name);

    Ok(LoginOutcome {
        redirect_to: response
            .redirect_to
            .unwrap_or_else(|| DEFAULT_REDIRECT.to_string()),
        token_name,
    })
}

/// GET `auth/profile` for the logged-in account.
pub async fn profile(client: &ApiClient) -> Result<User> {
    let payload: ItemPayload<User> = client.get_json("auth/profile").await?;
    Ok(payload.into_item())
}

/// Drop every stored token.
pub fn logout(client: &ApiClient) -> Result<()> {
    client.clear_tokens()?;
    info!("Session cleared");
    Ok(())
}
