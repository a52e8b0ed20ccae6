//! # Favorites State
//!
//! The favorites cache screens read from, kept in step with the server.
//!
//! ## Concurrency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FavoritesState (Clone)                                                │
//! │    set: Arc<Mutex<FavoriteSet>> ◄── locked only between awaits          │
//! │    api: Arc<dyn FavoritesApi>                                           │
//! │                                                                         │
//! │  toggle("s-1")                                                          │
//! │    lock ─► apply_optimistic ─► unlock      UI already shows the flip   │
//! │    api.add / api.remove                    no lock held here           │
//! │    lock ─► confirm | coerce | rollback ─► unlock                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two toggles of the same supplier may be in flight at once; only the newer
//! one decides the final state.

use bookit_api::{ApiError, FavoritesApi};
use bookit_core::{FavoriteSet, PendingToggle};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::ClientResult;

#[derive(Clone)]
pub struct FavoritesState {
    set: Arc<Mutex<FavoriteSet>>,
    api: Arc<dyn FavoritesApi>,
    staleness: chrono::Duration,
}

impl FavoritesState {
    /// Creates an empty cache that trusts a fetched set for `staleness`.
    pub fn new(api: Arc<dyn FavoritesApi>, staleness: Duration) -> Self {
        let staleness = chrono::Duration::from_std(staleness).unwrap_or_else(|_| {
            chrono::Duration::seconds(bookit_core::FAVORITES_STALENESS_SECS as i64)
        });
        FavoritesState {
            set: Arc::new(Mutex::new(FavoriteSet::new())),
            api,
            staleness,
        }
    }

    pub async fn is_favorite(&self, supplier_id: &str) -> bool {
        self.set.lock().await.is_favorite(supplier_id)
    }

    /// Favorited ids, sorted.
    pub async fn ids(&self) -> Vec<String> {
        self.set.lock().await.ids()
    }

    /// Flips a supplier's favorite state and returns the resulting state.
    ///
    /// ## Outcomes
    /// - success: the flip stands
    /// - 409 on add: already a favorite, treated as success (`true`)
    /// - 404 on remove: already gone, treated as success (`false`)
    /// - anything else: the flip is undone and the error returned
    pub async fn toggle(&self, supplier_id: &str) -> ClientResult<bool> {
        let toggle = self.set.lock().await.apply_optimistic(supplier_id);
        debug!(supplier_id, add = toggle.is_add(), "Optimistic favorite toggle");

        let result = if toggle.is_add() {
            self.api.add(supplier_id).await
        } else {
            self.api.remove(supplier_id).await
        };

        self.settle(&toggle, result).await
    }

    async fn settle(&self, toggle: &PendingToggle, result: Result<(), ApiError>) -> ClientResult<bool> {
        let mut set = self.set.lock().await;
        let id = toggle.supplier_id.as_str();

        match result {
            Ok(()) => set.confirm(toggle),
            Err(e) if toggle.is_add() && e.is_conflict() => {
                debug!(supplier_id = id, "Already a favorite on the server");
                set.coerce(toggle, true);
            }
            Err(e) if !toggle.is_add() && e.is_not_found() => {
                debug!(supplier_id = id, "Favorite already removed on the server");
                set.coerce(toggle, false);
            }
            Err(e) => {
                warn!(supplier_id = id, error = %e, "Favorite toggle failed, rolling back");
                set.rollback(toggle);
                return Err(e.into());
            }
        }

        Ok(set.is_favorite(id))
    }

    /// Re-fetches the id set when it is empty or stale.
    ///
    /// Returns whether a refresh happened. Failures are logged and leave the
    /// cached set as it was.
    pub async fn refresh_if_stale(&self) -> bool {
        let stale = self.set.lock().await.needs_refresh(Utc::now(), self.staleness);
        if !stale {
            return false;
        }

        match self.refresh().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Favorites refresh failed, keeping cached set");
                false
            }
        }
    }

    /// Fetches the full id set. Returns how many favorites there are.
    pub async fn refresh(&self) -> ClientResult<usize> {
        let ids = self.api.list_ids().await?;
        let mut set = self.set.lock().await;
        set.replace_all(ids, Utc::now());
        info!(count = set.len(), "Favorites refreshed");
        Ok(set.len())
    }

    /// Forgets everything (logout, account switch).
    pub async fn clear(&self) {
        self.set.lock().await.clear();
        debug!("Favorites cache cleared");
    }
}

impl std::fmt::Debug for FavoritesState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesState")
            .field("staleness", &self.staleness)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use bookit_api::ApiResult;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex as StdMutex;

    /// In-memory stand-in for the favorites endpoints.
    #[derive(Default)]
    pub(crate) struct FakeFavoritesApi {
        pub server: StdMutex<HashSet<String>>,
        /// Forced status per supplier id for add/remove.
        pub failures: StdMutex<HashMap<String, u16>>,
        pub list_calls: StdMutex<u32>,
        pub offline: StdMutex<bool>,
    }

    impl FakeFavoritesApi {
        pub(crate) fn with(ids: &[&str]) -> Arc<Self> {
            let api = FakeFavoritesApi::default();
            api.server
                .lock()
                .unwrap()
                .extend(ids.iter().map(|s| s.to_string()));
            Arc::new(api)
        }

        fn forced(&self, id: &str) -> Option<ApiError> {
            if *self.offline.lock().unwrap() {
                return Some(ApiError::network("connection refused"));
            }
            self.failures
                .lock()
                .unwrap()
                .get(id)
                .map(|status| ApiError::from_response(*status, ""))
        }
    }

    #[async_trait]
    impl FavoritesApi for FakeFavoritesApi {
        async fn list_ids(&self) -> ApiResult<Vec<String>> {
            *self.list_calls.lock().unwrap() += 1;
            if *self.offline.lock().unwrap() {
                return Err(ApiError::network("connection refused"));
            }
            Ok(self.server.lock().unwrap().iter().cloned().collect())
        }

        async fn add(&self, supplier_id: &str) -> ApiResult<()> {
            if let Some(err) = self.forced(supplier_id) {
                return Err(err);
            }
            if !self.server.lock().unwrap().insert(supplier_id.to_string()) {
                return Err(ApiError::from_response(409, ""));
            }
            Ok(())
        }

        async fn remove(&self, supplier_id: &str) -> ApiResult<()> {
            if let Some(err) = self.forced(supplier_id) {
                return Err(err);
            }
            if !self.server.lock().unwrap().remove(supplier_id) {
                return Err(ApiError::from_response(404, ""));
            }
            Ok(())
        }
    }

    fn state(api: Arc<FakeFavoritesApi>) -> FavoritesState {
        FavoritesState::new(api, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_toggle_add_then_remove() {
        let api = FakeFavoritesApi::with(&[]);
        let favorites = state(api.clone());

        assert!(favorites.toggle("s-1").await.unwrap());
        assert!(favorites.is_favorite("s-1").await);
        assert!(api.server.lock().unwrap().contains("s-1"));

        assert!(!favorites.toggle("s-1").await.unwrap());
        assert!(!favorites.is_favorite("s-1").await);
        assert!(api.server.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conflict_on_add_counts_as_success() {
        // Server already has it; local cache does not know yet.
        let api = FakeFavoritesApi::with(&["s-1"]);
        let favorites = state(api);

        assert!(favorites.toggle("s-1").await.unwrap());
        assert!(favorites.is_favorite("s-1").await);
    }

    #[tokio::test]
    async fn test_not_found_on_remove_counts_as_success() {
        let api = FakeFavoritesApi::with(&["s-1"]);
        let favorites = state(api.clone());
        favorites.refresh().await.unwrap();

        // Removed from another device in the meantime.
        api.server.lock().unwrap().clear();

        assert!(!favorites.toggle("s-1").await.unwrap());
        assert!(!favorites.is_favorite("s-1").await);
    }

    #[tokio::test]
    async fn test_other_failure_rolls_back() {
        let api = FakeFavoritesApi::with(&[]);
        api.failures.lock().unwrap().insert("s-1".to_string(), 500);
        let favorites = state(api);

        let err = favorites.toggle("s-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert!(!favorites.is_favorite("s-1").await);
    }

    #[tokio::test]
    async fn test_network_failure_on_remove_restores_favorite() {
        let api = FakeFavoritesApi::with(&["s-1"]);
        let favorites = state(api.clone());
        favorites.refresh().await.unwrap();

        *api.offline.lock().unwrap() = true;
        let err = favorites.toggle("s-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert!(favorites.is_favorite("s-1").await);
    }

    #[tokio::test]
    async fn test_refresh_if_stale_only_when_needed() {
        let api = FakeFavoritesApi::with(&["s-1", "s-2"]);
        let favorites = state(api.clone());

        assert!(favorites.refresh_if_stale().await);
        assert_eq!(favorites.ids().await, vec!["s-1", "s-2"]);

        // Fresh and non-empty: no second fetch.
        assert!(!favorites.refresh_if_stale().await);
        assert_eq!(*api.list_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_set_is_always_refetched() {
        let api = FakeFavoritesApi::with(&[]);
        let favorites = state(api.clone());

        assert!(favorites.refresh_if_stale().await);
        assert!(favorites.refresh_if_stale().await);
        assert_eq!(*api.list_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_swallowed() {
        let api = FakeFavoritesApi::with(&["s-1"]);
        let favorites = state(api.clone());
        favorites.refresh().await.unwrap();

        *api.offline.lock().unwrap() = true;
        favorites.clear().await;
        assert!(!favorites.refresh_if_stale().await);
        assert!(favorites.ids().await.is_empty());

        assert!(favorites.refresh().await.is_err());
    }

    #[tokio::test]
    async fn test_clear() {
        let api = FakeFavoritesApi::with(&["s-1"]);
        let favorites = state(api);
        favorites.refresh().await.unwrap();

        favorites.clear().await;
        assert!(!favorites.is_favorite("s-1").await);
    }
}
