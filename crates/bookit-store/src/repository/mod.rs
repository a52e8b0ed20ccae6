//! # Repository Module
//!
//! Typed access to the local `preferences` table.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionState ──► db.session()  ─┐                                     │
//! │                                  ├──► PreferenceRepository ──► SQLite  │
//! │  ThemeState   ──► db.theme()    ─┘        (key TEXT → value TEXT)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`PreferenceRepository`] - Raw string and JSON values by key
//! - [`SessionRepository`] - Auth token and cached user snapshot
//! - [`ThemeRepository`] - Theme preference

pub mod preferences;
pub mod session;
pub mod theme;

pub use preferences::PreferenceRepository;
pub use session::SessionRepository;
pub use theme::ThemeRepository;
