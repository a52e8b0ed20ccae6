//! # Session Repository
//!
//! Persists the bearer token and a snapshot of the signed-in user so a
//! session survives restarts and can be shown offline.

use bookit_core::User;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::preferences::PreferenceRepository;

pub const TOKEN_KEY: &str = "auth.token";
pub const USER_KEY: &str = "auth.user";

/// Typed view over the auth keys.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    prefs: PreferenceRepository,
}

impl SessionRepository {
    pub fn new(prefs: PreferenceRepository) -> Self {
        SessionRepository { prefs }
    }

    /// Stored token. Empty strings count as absent.
    pub async fn load_token(&self) -> DbResult<Option<String>> {
        let token = self.prefs.get(TOKEN_KEY).await?;
        Ok(token.filter(|t| !t.trim().is_empty()))
    }

    pub async fn save_token(&self, token: &str) -> DbResult<()> {
        debug!("Persisting auth token");
        self.prefs.set(TOKEN_KEY, token).await
    }

    /// Cached user snapshot.
    ///
    /// A snapshot that no longer decodes is discarded rather than failing the
    /// restore.
    pub async fn load_user(&self) -> DbResult<Option<User>> {
        match self.prefs.get_json::<User>(USER_KEY).await {
            Ok(user) => Ok(user),
            Err(DbError::Serialization { message, .. }) => {
                warn!(error = %message, "Discarding unreadable cached user");
                self.prefs.remove(USER_KEY).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn save_user(&self, user: &User) -> DbResult<()> {
        debug!(user_id = %user.id, "Caching user snapshot");
        self.prefs.set_json(USER_KEY, user).await
    }

    /// Wipes token and user.
    pub async fn clear(&self) -> DbResult<()> {
        debug!("Clearing persisted session");
        self.prefs.remove(TOKEN_KEY).await?;
        self.prefs.remove(USER_KEY).await?;
        Ok(())
    }
}
