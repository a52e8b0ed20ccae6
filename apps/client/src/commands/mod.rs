//! # CLI Commands
//!
//! Handlers behind each `bookit` subcommand. Every handler takes the running
//! [`App`](crate::App), goes through the same state containers a UI would,
//! and prints plain text to stdout.
//!
//! ```text
//! commands/
//! ├── auth.rs       ◄─── login, register, logout, whoami
//! ├── catalog.rs    ◄─── categories, suppliers
//! ├── favorites.rs  ◄─── favorites list | toggle
//! ├── theme.rs      ◄─── theme get | set
//! ├── orders.rs     ◄─── orders list | show | book | cancel | accept-quote | reject-quote | pay
//! ├── card.rs       ◄─── card check (offline)
//! └── chat.rs       ◄─── chat list | show | send, unread
//! ```

pub mod auth;
pub mod card;
pub mod catalog;
pub mod chat;
pub mod favorites;
pub mod orders;
pub mod theme;

use crate::error::{ClientError, ClientResult};
use crate::App;

/// Fails with `NotAuthenticated` unless someone is signed in.
pub(crate) async fn require_session(app: &App) -> ClientResult<()> {
    if app.session.is_authenticated().await {
        Ok(())
    } else {
        Err(ClientError::not_authenticated())
    }
}
