//! Favorite suppliers.
//!
//! Adding an existing favorite answers 409 and removing a missing one 404;
//! callers that toggle treat both as "already in the requested state".

use async_trait::async_trait;
use bookit_core::Supplier;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiResult;

/// The remote operations the favorites cache depends on.
#[async_trait]
pub trait FavoritesApi: Send + Sync {
    /// Ids of every favorited supplier.
    async fn list_ids(&self) -> ApiResult<Vec<String>>;

    async fn add(&self, supplier_id: &str) -> ApiResult<()>;

    async fn remove(&self, supplier_id: &str) -> ApiResult<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddFavoriteRequest<'a> {
    supplier_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct FavoritesService {
    client: ApiClient,
}

impl FavoritesService {
    pub fn new(client: ApiClient) -> Self {
        FavoritesService { client }
    }

    /// Full supplier records for the favorites screen.
    pub async fn list_suppliers(&self) -> ApiResult<Vec<Supplier>> {
        self.client.get(&["favorites"]).await
    }
}

#[async_trait]
impl FavoritesApi for FavoritesService {
    async fn list_ids(&self) -> ApiResult<Vec<String>> {
        self.client.get(&["favorites", "ids"]).await
    }

    async fn add(&self, supplier_id: &str) -> ApiResult<()> {
        self.client
            .post_empty(&["favorites"], &AddFavoriteRequest { supplier_id })
            .await
    }

    async fn remove(&self, supplier_id: &str) -> ApiResult<()> {
        self.client.delete(&["favorites", supplier_id]).await
    }
}
