//! Categories and suppliers: the browsable catalog.

use bookit_core::validation::{validate_page, validate_search_query};
use bookit_core::{Category, Review, Supplier, DEFAULT_PAGE_SIZE};
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct CategoriesService {
    client: ApiClient,
}

impl CategoriesService {
    pub fn new(client: ApiClient) -> Self {
        CategoriesService { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        self.client.get(&["categories"]).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Category> {
        self.client.get(&["categories", id]).await
    }
}

/// Filters for the supplier listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for SupplierQuery {
    fn default() -> Self {
        SupplierQuery {
            category: None,
            search: None,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SupplierQuery {
    pub fn in_category(category: impl Into<String>) -> Self {
        SupplierQuery {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Validated copy with the search text trimmed (or dropped if blank).
    fn normalized(&self) -> ApiResult<Self> {
        validate_page(self.page, self.per_page)?;
        let search = match &self.search {
            Some(text) => validate_search_query(text)?,
            None => None,
        };
        Ok(SupplierQuery {
            search,
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone)]
pub struct SuppliersService {
    client: ApiClient,
}

impl SuppliersService {
    pub fn new(client: ApiClient) -> Self {
        SuppliersService { client }
    }

    /// `GET /suppliers?category=&search=&page=&perPage=`.
    pub async fn list(&self, query: &SupplierQuery) -> ApiResult<Vec<Supplier>> {
        let query = query.normalized()?;
        self.client.get_with_query(&["suppliers"], &query).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Supplier> {
        self.client.get(&["suppliers", id]).await
    }

    pub async fn reviews(&self, id: &str) -> ApiResult<Vec<Review>> {
        self.client.get(&["suppliers", id, "reviews"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_serialization_skips_unset() {
        let query = SupplierQuery::in_category("cleaning");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"category": "cleaning", "page": 1, "perPage": 20})
        );
    }

    #[test]
    fn test_normalized_trims_search() {
        let query = SupplierQuery::default().search("  tiler ");
        assert_eq!(query.normalized().unwrap().search.as_deref(), Some("tiler"));

        let blank = SupplierQuery::default().search("   ");
        assert_eq!(blank.normalized().unwrap().search, None);

        let bad_page = SupplierQuery {
            page: 0,
            ..Default::default()
        };
        assert!(bad_page.normalized().is_err());
    }
}
