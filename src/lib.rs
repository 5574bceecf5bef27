//! Client library for the school job-board portal: a thin, typed layer
//! over the remote REST API plus the page-side plumbing the portal's
//! screens share (dynamic add/edit forms, table search/sort/pagination,
//! spreadsheet import/export, the job save flow). All state lives on the
//! server; this crate holds nothing beyond the persisted session tokens.

use anyhow::Result;
use std::sync::{Arc, Mutex};

pub mod auth;
pub mod core;
pub mod environment;
pub mod form;
pub mod resources;
pub mod save_flow;
pub mod session;
pub mod table;
pub mod types;
pub mod utils;

pub use crate::core::ApiClient;
pub use environment::EnvironmentConfig;
pub use session::{Navigator, TokenStore};

/// Everything a page needs: configuration, the session store, and the
/// configured HTTP client.
pub struct Portal {
    pub config: EnvironmentConfig,
    pub client: ApiClient,
}

impl Portal {
    pub fn connect(config: EnvironmentConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let tokens = Arc::new(Mutex::new(TokenStore::load(&config.session_path)?));
        let client = ApiClient::new(config.api_base_url.clone(), tokens, navigator)?;

        Ok(Self { config, client })
    }
}
