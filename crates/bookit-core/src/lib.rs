//! # bookit-core: Pure Client Logic for Bookit
//!
//! This crate holds every piece of the Bookit client that can be expressed
//! as a pure function or a plain data structure. It has zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookit Client Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (TypeScript)                       │   │
//! │  │   Home ──► Supplier ──► Booking ──► Checkout ──► Chat          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ bindings                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          apps/client (session, theme, favorites contexts)       │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────┐   ┌───────────────▼───────────────┐   │
//! │  │ bookit-store (SQLite k/v)   │   │ bookit-api (REST consumer)    │   │
//! │  └──────────────┬──────────────┘   └───────────────┬───────────────┘   │
//! │                 └────────────────┬─────────────────┘                    │
//! │  ┌───────────────────────────────▼─────────────────────────────────┐   │
//! │  │               ★ bookit-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐  │   │
//! │  │   │  types  │ │  money  │ │   card   │ │favorites │ │ theme │  │   │
//! │  │   │ Order   │ │ Money   │ │ Luhn     │ │ FavSet   │ │ Pref  │  │   │
//! │  │   │ Quote   │ │ TaxRate │ │ Brand    │ │ staleness│ │ Scheme│  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └───────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Supplier, Order, Quote, Conversation, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`card`] - Card number, expiry, and CVV validation
//! - [`favorites`] - Favorite id-set bookkeeping with optimistic toggles
//! - [`theme`] - Theme preference and color scheme resolution
//! - [`validation`] - Form input validation (email, password, ...)
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bookit_core::card::{detect_card_brand, validate_card_number, CardBrand};
//!
//! assert!(validate_card_number("4242 4242 4242 4242"));
//! assert_eq!(detect_card_brand("4242424242424242"), CardBrand::Visa);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod card;
pub mod error;
pub mod favorites;
pub mod money;
pub mod theme;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use card::{CardBrand, CardDetails};
pub use error::{CoreError, ValidationError};
pub use favorites::{FavoriteSet, PendingToggle};
pub use money::Money;
pub use theme::{ColorScheme, ThemePreference};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// How long a fetched favorites set is trusted before it is re-fetched.
///
/// A set older than this, or an empty set, is refreshed from the server the
/// next time a screen asks for it.
pub const FAVORITES_STALENESS_SECS: u64 = 30;

/// Default interval between unread-count polls.
pub const UNREAD_POLL_INTERVAL_SECS: u64 = 30;

/// Maximum length of a chat message body.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Default page size for supplier listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
