//! # Bookit Client Library
//!
//! Wires configuration, the local store and the API client into the state
//! containers a UI (or the `bookit` CLI) drives.
//!
//! ## Module Organization
//! ```text
//! bookit_client/
//! ├── lib.rs          ◄─── You are here (bootstrap, logging)
//! ├── state/
//! │   ├── session.rs  ◄─── Sign-in, restore, logout
//! │   ├── theme.rs    ◄─── Theme preference
//! │   ├── favorites.rs◄─── Favorites cache
//! │   └── unread.rs   ◄─── Unread badge poller
//! ├── commands/       ◄─── CLI command handlers
//! └── error.rs        ◄─── ClientError for the UI
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. ApiConfig::load_or_default  defaults ◄ client.toml ◄ BOOKIT_* env  │
//! │  2. Database::new               SQLite file, migrations                │
//! │  3. ApiClient::new              base URL for environment + platform    │
//! │  4. ThemeState::load            persisted preference (default system)  │
//! │  5. SessionState::restore       token ─► /auth/me ─► signed in or out  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use bookit_api::{ApiClient, ApiConfig};
use bookit_store::{Database, DbConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ClientResult;
use state::{FavoritesState, SessionState, ThemeState, UnreadWatcher};

/// Everything a running client holds.
#[derive(Debug, Clone)]
pub struct App {
    pub config: ApiConfig,
    pub db: Database,
    pub api: ApiClient,
    pub session: SessionState,
    pub theme: ThemeState,
    pub favorites: FavoritesState,
}

impl App {
    /// Opens the store, builds the client and restores theme and session.
    pub async fn start(config: ApiConfig) -> ClientResult<Self> {
        let db = Database::new(DbConfig::new(config.db_path())).await?;
        let api = ApiClient::new(&config)?;
        let app = App::assemble(config, db, api);

        app.theme.load().await?;
        app.session.restore().await?;

        info!(
            base_url = %app.api.base_url(),
            signed_in = app.session.is_authenticated().await,
            "Client ready"
        );
        Ok(app)
    }

    /// Builds the state containers over an existing store and client.
    pub fn assemble(config: ApiConfig, db: Database, api: ApiClient) -> Self {
        let theme = ThemeState::new(db.theme(), api.clone());
        let favorites = FavoritesState::new(
            Arc::new(api.favorites()),
            config.favorites_staleness(),
        );
        let session = SessionState::new(db.session(), api.clone(), theme.clone(), favorites.clone());

        App {
            config,
            db,
            api,
            session,
            theme,
            favorites,
        }
    }

    /// Starts the unread badge poller at the configured interval.
    pub fn watch_unread(&self) -> UnreadWatcher {
        UnreadWatcher::start(self.api.clone(), self.config.unread_poll_interval())
    }

    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}

/// Installs the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - `RUST_LOG=bookit=trace` - Trace for bookit crates only
/// - Default: `info,bookit=debug,sqlx=warn`
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bookit=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookit_core::ThemePreference;
    use std::time::Duration;

    #[tokio::test]
    async fn test_assemble_offline_app() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let api = ApiClient::with_base_url(
            "http://127.0.0.1:9/api".parse().unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        let app = App::assemble(ApiConfig::default(), db, api);

        assert_eq!(app.theme.load().await.unwrap(), ThemePreference::System);
        assert!(app.session.restore().await.unwrap().is_none());
        assert!(!app.favorites.refresh_if_stale().await);

        let watcher = app.watch_unread();
        assert_eq!(watcher.current(), 0);
        watcher.shutdown().await;
        app.shutdown().await;
    }
}
