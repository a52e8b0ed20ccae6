//! # Theme State
//!
//! The user's light/dark/system preference, persisted on the device and
//! mirrored to the account settings when signed in.
//!
//! ```text
//! set(Dark)
//!   ├─► ThemeRepository::save      must succeed
//!   ├─► current = Dark             UI re-renders
//!   └─► PATCH /settings {theme}    only when signed in; failure is logged
//!
//! sign-in ──► GET /settings ──► server preference, when set, replaces the local one
//! ```

use bookit_api::ApiClient;
use bookit_core::{ColorScheme, SettingsUpdate, ThemePreference};
use bookit_store::ThemeRepository;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::ClientResult;

#[derive(Debug, Clone)]
pub struct ThemeState {
    repo: ThemeRepository,
    api: ApiClient,
    current: Arc<RwLock<ThemePreference>>,
}

impl ThemeState {
    pub fn new(repo: ThemeRepository, api: ApiClient) -> Self {
        ThemeState {
            repo,
            api,
            current: Arc::new(RwLock::new(ThemePreference::default())),
        }
    }

    /// Reads the persisted preference into memory.
    pub async fn load(&self) -> ClientResult<ThemePreference> {
        let pref = self.repo.load().await?;
        *self.current.write().await = pref;
        debug!(theme = %pref, "Theme loaded");
        Ok(pref)
    }

    pub async fn preference(&self) -> ThemePreference {
        *self.current.read().await
    }

    /// Scheme to render given the device's current scheme.
    pub async fn resolve(&self, system: ColorScheme) -> ColorScheme {
        self.preference().await.resolve(system)
    }

    /// Changes the preference locally, then pushes it to the account.
    pub async fn set(&self, pref: ThemePreference) -> ClientResult<()> {
        self.repo.save(pref).await?;
        *self.current.write().await = pref;
        info!(theme = %pref, "Theme changed");

        if self.api.has_token().await {
            if let Err(e) = self.api.settings().update(&SettingsUpdate::theme(pref)).await {
                warn!(error = %e, "Could not sync theme to account settings");
            }
        }
        Ok(())
    }

    /// Adopts the account's stored preference, if it can be fetched.
    pub async fn sync_from_server(&self) {
        let settings = match self.api.settings().get().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Could not fetch account settings, keeping local theme");
                return;
            }
        };

        let Some(pref) = settings.theme else {
            debug!("Account has no stored theme, keeping local one");
            return;
        };
        if let Err(e) = self.repo.save(pref).await {
            warn!(error = %e, "Could not persist server theme");
        }
        *self.current.write().await = pref;
        debug!(theme = %pref, "Theme taken from account settings");
    }
}
