//! Bookings and the quote decision.

use bookit_core::{NewOrder, Order, OrderStatus};
use serde::Serialize;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Serialize)]
struct StatusFilter {
    status: &'static str,
}

#[derive(Debug, Clone)]
pub struct OrdersService {
    client: ApiClient,
}

impl OrdersService {
    pub fn new(client: ApiClient) -> Self {
        OrdersService { client }
    }

    /// `GET /orders`, optionally filtered by status.
    pub async fn list(&self, status: Option<OrderStatus>) -> ApiResult<Vec<Order>> {
        match status {
            Some(status) => {
                self.client
                    .get_with_query(&["orders"], &StatusFilter { status: status.as_str() })
                    .await
            }
            None => self.client.get(&["orders"]).await,
        }
    }

    pub async fn get(&self, id: &str) -> ApiResult<Order> {
        self.client.get(&["orders", id]).await
    }

    /// `POST /orders`. The scheduled date is checked against today first.
    pub async fn create(&self, order: &NewOrder) -> ApiResult<Order> {
        order.validate(chrono::Local::now().date_naive())?;
        let created: Order = self.client.post(&["orders"], order).await?;
        info!(order_id = %created.id, supplier_id = %created.supplier_id, "Order created");
        Ok(created)
    }

    pub async fn cancel(&self, id: &str) -> ApiResult<Order> {
        let order: Order = self
            .client
            .post(&["orders", id, "cancel"], &serde_json::json!({}))
            .await?;
        info!(order_id = %id, "Order cancelled");
        Ok(order)
    }

    pub async fn accept_quote(&self, id: &str) -> ApiResult<Order> {
        let order: Order = self
            .client
            .post(&["orders", id, "quote", "accept"], &serde_json::json!({}))
            .await?;
        info!(order_id = %id, "Quote accepted");
        Ok(order)
    }

    pub async fn reject_quote(&self, id: &str) -> ApiResult<Order> {
        let order: Order = self
            .client
            .post(&["orders", id, "quote", "reject"], &serde_json::json!({}))
            .await?;
        info!(order_id = %id, "Quote rejected");
        Ok(order)
    }
}
