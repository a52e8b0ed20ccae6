//! # Session State
//!
//! Who is signed in, and the token that proves it.
//!
//! ## Restore on Launch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load_token()                                                          │
//! │     │                                                                   │
//! │     ├── none ─────────────────────────────► signed out                  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  install token, GET /auth/me                                            │
//! │     │                                                                   │
//! │     ├── 200 ──► cache user ───────────────► signed in                   │
//! │     ├── 401 ──► wipe token + user ────────► signed out                  │
//! │     └── network / server failure                                        │
//! │            ├── cached user ───────────────► signed in (offline)         │
//! │            └── no cached user ────────────► signed out, token kept      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The token is never logged.

use bookit_api::{ApiClient, AuthResponse};
use bookit_core::{LoginRequest, ProfileUpdate, RegisterRequest, User};
use bookit_store::SessionRepository;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::state::{FavoritesState, ThemeState};

#[derive(Debug, Clone)]
pub struct SessionState {
    store: SessionRepository,
    api: ApiClient,
    user: Arc<RwLock<Option<User>>>,
    theme: ThemeState,
    favorites: FavoritesState,
}

impl SessionState {
    pub fn new(
        store: SessionRepository,
        api: ApiClient,
        theme: ThemeState,
        favorites: FavoritesState,
    ) -> Self {
        SessionState {
            store,
            api,
            user: Arc::new(RwLock::new(None)),
            theme,
            favorites,
        }
    }

    /// Restores the persisted session. Returns the signed-in user, if any.
    pub async fn restore(&self) -> ClientResult<Option<User>> {
        let Some(token) = self.store.load_token().await? else {
            info!("No stored session");
            return Ok(None);
        };

        self.api.set_token(token).await;

        match self.api.auth().me().await {
            Ok(user) => {
                self.store.save_user(&user).await?;
                info!(user_id = %user.id, "Session restored");
                *self.user.write().await = Some(user.clone());
                self.theme.sync_from_server().await;
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                info!("Stored token rejected, signing out");
                self.api.clear_token().await;
                self.store.clear().await?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Could not verify stored session");
                match self.store.load_user().await? {
                    Some(user) => {
                        info!(user_id = %user.id, "Session restored from cache");
                        *self.user.write().await = Some(user.clone());
                        Ok(Some(user))
                    }
                    None => {
                        // Keep the stored token for the next launch.
                        self.api.clear_token().await;
                        Ok(None)
                    }
                }
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.api.auth().login(&request).await?;
        self.sign_in(response).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        let response = self.api.auth().register(request).await?;
        self.sign_in(response).await
    }

    async fn sign_in(&self, response: AuthResponse) -> ClientResult<User> {
        let AuthResponse { token, user } = response;

        self.store.save_token(&token).await?;
        self.store.save_user(&user).await?;
        self.api.set_token(token).await;
        *self.user.write().await = Some(user.clone());
        info!(user_id = %user.id, "Signed in");

        self.favorites.clear().await;
        self.theme.sync_from_server().await;
        Ok(user)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        if !self.is_authenticated().await {
            return Err(ClientError::not_authenticated());
        }

        let user = self.api.auth().update_profile(update).await?;
        self.store.save_user(&user).await?;
        *self.user.write().await = Some(user.clone());
        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    pub async fn change_password(&self, current: &str, new: &str) -> ClientResult<()> {
        if !self.is_authenticated().await {
            return Err(ClientError::not_authenticated());
        }
        self.api.auth().change_password(current, new).await?;
        info!("Password changed");
        Ok(())
    }

    /// Signs out locally; the server is told on a best-effort basis.
    pub async fn logout(&self) -> ClientResult<()> {
        if self.api.has_token().await {
            if let Err(e) = self.api.auth().logout().await {
                warn!(error = %e, "Server logout failed, signing out locally");
            }
        }

        self.api.clear_token().await;
        self.store.clear().await?;
        *self.user.write().await = None;
        self.favorites.clear().await;
        info!("Signed out");
        Ok(())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    pub async fn token(&self) -> Option<String> {
        self.api.token().await
    }
}
