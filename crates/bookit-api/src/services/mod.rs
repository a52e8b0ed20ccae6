//! # Services
//!
//! One thin service per backend resource. Each holds a clone of the
//! [`ApiClient`](crate::ApiClient) and is obtained from it:
//!
//! ```rust,ignore
//! let orders = api.orders().list(Some(OrderStatus::Quoted)).await?;
//! api.favorites().add("sup-1").await?;
//! ```
//!
//! | Service | Resource |
//! |---|---|
//! | [`AuthService`] | `/auth` |
//! | [`CategoriesService`] | `/categories` |
//! | [`SuppliersService`] | `/suppliers` |
//! | [`OrdersService`] | `/orders` |
//! | [`PaymentsService`] | `/payments`, `/orders/{id}/payments` |
//! | [`ConversationsService`] | `/conversations` |
//! | [`FavoritesService`] | `/favorites` |
//! | [`SettingsService`] | `/settings` |

pub mod auth;
pub mod catalog;
pub mod conversations;
pub mod favorites;
pub mod orders;
pub mod payments;
pub mod settings;

pub use auth::{AuthResponse, AuthService};
pub use catalog::{CategoriesService, SupplierQuery, SuppliersService};
pub use conversations::{ConversationsService, UnreadCount};
pub use favorites::{FavoritesApi, FavoritesService};
pub use orders::OrdersService;
pub use payments::PaymentsService;
pub use settings::SettingsService;

