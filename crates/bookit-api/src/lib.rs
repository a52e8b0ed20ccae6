//! # bookit-api: REST API Consumer
//!
//! Typed access to the Bookit backend: configuration, a shared HTTP client
//! carrying the bearer token, one classification path for every failure,
//! and a service per resource.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  apps/client (SessionState, FavoritesState, UnreadWatcher, CLI)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bookit-api (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ApiConfig ──► ApiClient ──► services::{auth, orders, ...}     │   │
//! │  │                     │                                           │   │
//! │  │                     └──► ApiError { kind, message, status }     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │ HTTPS / JSON (camelCase)                                        │
//! │       ▼                                                                 │
//! │  Bookit backend  (https://api.bookit.app/api)                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookit_api::{ApiClient, ApiConfig};
//!
//! let api = ApiClient::new(&ApiConfig::load_or_default(None))?;
//! let categories = api.categories().list().await?;
//! ```
//!
//! No request is retried: a failure is reported once and the caller decides.

pub mod client;
pub mod config;
pub mod error;
pub mod services;

pub use client::ApiClient;
pub use config::{resolve_base_url, ApiConfig, Environment, Platform};
pub use error::{ApiError, ApiErrorKind, ApiResult, GENERIC_ERROR_MESSAGE};
pub use services::{AuthResponse, FavoritesApi, SupplierQuery};
