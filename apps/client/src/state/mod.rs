//! # State Module
//!
//! The containers a UI binds to. Each is cheap to clone and safe to share
//! across tasks.
//!
//! ```text
//! state/
//! ├── session.rs    ◄─── SessionState (sign-in, restore, logout)
//! ├── theme.rs      ◄─── ThemeState (preference, local + account)
//! ├── favorites.rs  ◄─── FavoritesState (optimistic toggles, staleness)
//! └── unread.rs     ◄─── UnreadWatcher (badge poller)
//! ```

pub mod favorites;
pub mod session;
pub mod theme;
pub mod unread;

pub use favorites::FavoritesState;
pub use session::SessionState;
pub use theme::ThemeState;
pub use unread::UnreadWatcher;
