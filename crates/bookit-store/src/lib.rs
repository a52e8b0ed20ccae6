//! # bookit-store: Local Persisted Store
//!
//! The small amount of state the Bookit client keeps on the device: the
//! auth token, a snapshot of the signed-in user and the theme preference.
//! Everything else is fetched from the backend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  apps/client (SessionState, ThemeState)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bookit-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────────┐   ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories    │   │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ Preference        │   │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ Session, Theme    │   │ 0001_...   │  │   │
//! │  │   └───────────────┘    └───────────────────┘   └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <platform data dir>/bookit.db                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookit_store::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bookit.db")).await?;
//! let theme = db.theme().load().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{PreferenceRepository, SessionRepository, ThemeRepository};
