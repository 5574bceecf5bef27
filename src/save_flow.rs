// src/save_flow.rs
//! Bookmarking a posting from its detail page. The flow first asks the
//! server whether the posting is already saved, then drives the save
//! action: saved is terminal and idempotent, a failed save falls back to
//! not-saved with a retryable error. Applying is a separate,
//! confirmation-gated external navigation that never touches saved-state.

use anyhow::Result;
use serde_json::json;
use tracing::info;

use crate::core::ApiClient;
use crate::types::response::ListPayload;
use crate::types::SavedJob;

/// GET `lowongan-disimpan/:penggunaId`.
pub async fn saved_jobs(client: &ApiClient, pengguna_id: i64) -> Result<Vec<SavedJob>> {
    let payload: ListPayload<SavedJob> = client
        .get_json(&format!("lowongan-disimpan/{}", pengguna_id))
        .await?;
    Ok(payload.into_rows())
}

/// POST `lowongan-disimpan`.
pub async fn save_job(client: &ApiClient, pengguna_id: i64, lowongan_id: i64) -> Result<()> {
    client
        .post_unit(
            "lowongan-disimpan",
            &json!({
                "penggunaId": pengguna_id,
                "lowonganId": lowongan_id,
            }),
        )
        .await?;
    info!("Saved posting {} for user {}", lowongan_id, pengguna_id);
    Ok(())
}

/// DELETE `lowongan-disimpan/:penggunaId/:lowonganId`.
pub async fn unsave_job(client: &ApiClient, pengguna_id: i64, lowongan_id: i64) -> Result<()> {
    client
        .delete_unit(&format!("lowongan-disimpan/{}/{}", pengguna_id, lowongan_id))
        .await?;
    info!("Removed saved posting {} for user {}", lowongan_id, pengguna_id);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    CheckingSaved,
    Saved,
    NotSaved,
    Saving,
}

#[derive(Debug)]
pub struct SaveFlow {
    state: SaveState,
    last_error: Option<String>,
}

impl SaveFlow {
    pub fn new() -> Self {
        Self {
            state: SaveState::Idle,
            last_error: None,
        }
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    /// Error from the last failed save; cleared on the next attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn start_check(&mut self) -> Result<()> {
        if self.state != SaveState::Idle {
            anyhow::bail!("Pengecekan hanya bisa dilakukan sekali.");
        }
        self.state = SaveState::CheckingSaved;
        Ok(())
    }

    pub fn resolve_check(&mut self, already_saved: bool) {
        if self.state == SaveState::CheckingSaved {
            self.state = if already_saved {
                SaveState::Saved
            } else {
                SaveState::NotSaved
            };
        }
    }

    /// Begin saving. Refused while saved (idempotent terminal state),
    /// while another save is in flight, and before the check resolved.
    pub fn start_save(&mut self) -> Result<()> {
        match self.state {
            SaveState::NotSaved => {
                self.state = SaveState::Saving;
                self.last_error = None;
                Ok(())
            }
            SaveState::Saved => anyhow::bail!("Lowongan sudah disimpan."),
            SaveState::Saving => anyhow::bail!("Penyimpanan sedang berlangsung."),
            SaveState::Idle | SaveState::CheckingSaved => {
                anyhow::bail!("Status simpan belum diketahui.")
            }
        }
    }

    pub fn complete_save(&mut self) {
        if self.state == SaveState::Saving {
            self.state = SaveState::Saved;
        }
    }

    /// A failed save returns to not-saved and stays retryable.
    pub fn fail_save(&mut self, error: impl Into<String>) {
        if self.state == SaveState::Saving {
            self.state = SaveState::NotSaved;
            self.last_error = Some(error.into());
        }
    }

    pub fn save_enabled(&self) -> bool {
        self.state == SaveState::NotSaved
    }

    /// Label of the save control, mirroring the page button.
    pub fn save_label(&self) -> &'static str {
        match self.state {
            SaveState::Saving => "Menyimpan...",
            SaveState::Saved => "Tersimpan",
            _ => "Simpan",
        }
    }
}

impl Default for SaveFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the initial saved/not-saved state from the server.
pub async fn check_saved(
    client: &ApiClient,
    flow: &mut SaveFlow,
    pengguna_id: i64,
    lowongan_id: i64,
) -> Result<bool> {
    flow.start_check()?;

    match saved_jobs(client, pengguna_id).await {
        Ok(saved) => {
            let already_saved = saved.iter().any(|entry| entry.lowongan_id == lowongan_id);
            flow.resolve_check(already_saved);
            Ok(already_saved)
        }
        Err(error) => {
            flow.resolve_check(false);
            Err(error)
        }
    }
}

/// Drive one save attempt through the flow.
pub async fn save(
    client: &ApiClient,
    flow: &mut SaveFlow,
    pengguna_id: i64,
    lowongan_id: i64,
) -> Result<()> {
    flow.start_save()?;

    match save_job(client, pengguna_id, lowongan_id).await {
        Ok(()) => {
            flow.complete_save();
            Ok(())
        }
        Err(error) => {
            flow.fail_save(error.to_string());
            Err(error)
        }
    }
}

/// The external registration link to open: requires a present link and an
/// explicit confirmation, and has no effect on saved-state.
pub fn apply_target<'a>(link: Option<&'a str>, confirmed: bool) -> Option<&'a str> {
    let link = link.map(str::trim).filter(|link| !link.is_empty())?;
    confirmed.then_some(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_flow(saved: bool) -> SaveFlow {
        let mut flow = SaveFlow::new();
        flow.start_check().unwrap();
        flow.resolve_check(saved);
        flow
    }

    #[test]
    fn check_resolves_to_saved_or_not_saved() {
        assert_eq!(checked_flow(true).state(), SaveState::Saved);
        assert_eq!(checked_flow(false).state(), SaveState::NotSaved);
    }

    #[test]
    fn successful_save_reaches_terminal_state() {
        let mut flow = checked_flow(false);

        flow.start_save().unwrap();
        assert_eq!(flow.state(), SaveState::Saving);
        assert!(!flow.save_enabled());
        assert_eq!(flow.save_label(), "Menyimpan...");

        flow.complete_save();
        assert_eq!(flow.state(), SaveState::Saved);
        assert_eq!(flow.save_label(), "Tersimpan");
    }

    #[test]
    fn saved_is_idempotent_and_refuses_resaving() {
        let mut flow = checked_flow(true);
        assert!(!flow.save_enabled());
        assert!(flow.start_save().is_err());
        assert_eq!(flow.state(), SaveState::Saved);
    }

    #[test]
    fn failed_save_returns_to_retryable_not_saved() {
        let mut flow = checked_flow(false);

        flow.start_save().unwrap();
        flow.fail_save("Jaringan bermasalah");

        assert_eq!(flow.state(), SaveState::NotSaved);
        assert_eq!(flow.last_error(), Some("Jaringan bermasalah"));
        assert!(flow.save_enabled());

        flow.start_save().unwrap();
        assert_eq!(flow.last_error(), None);
        flow.complete_save();
        assert_eq!(flow.state(), SaveState::Saved);
    }

    #[test]
    fn save_before_check_is_refused() {
        let mut flow = SaveFlow::new();
        assert!(flow.start_save().is_err());

        flow.start_check().unwrap();
        assert!(flow.start_save().is_err());
    }

    #[test]
    fn apply_requires_link_and_confirmation() {
        assert_eq!(apply_target(None, true), None);
        assert_eq!(apply_target(Some("   "), true), None);
        assert_eq!(apply_target(Some("https://daftar.example.com"), false), None);
        assert_eq!(
            apply_target(Some("https://daftar.example.com"), true),
            Some("https://daftar.example.com")
        );
    }
}
