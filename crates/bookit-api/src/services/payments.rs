//! Card payments for confirmed orders.
//!
//! The card is validated on the device before anything is sent; an invalid
//! card never reaches the network.

use bookit_core::card::clean_card_number;
use bookit_core::{CardDetails, Payment};
use serde::Serialize;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRequest<'a> {
    card_number: String,
    expiry: &'a str,
    cvv: &'a str,
    holder_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct PaymentsService {
    client: ApiClient,
}

impl PaymentsService {
    pub fn new(client: ApiClient) -> Self {
        PaymentsService { client }
    }

    /// `POST /orders/{id}/payments`.
    pub async fn pay(&self, order_id: &str, card: &CardDetails) -> ApiResult<Payment> {
        card.validate(chrono::Local::now().date_naive())?;

        let request = PaymentRequest {
            card_number: clean_card_number(&card.number),
            expiry: card.expiry.trim(),
            cvv: card.cvv.trim(),
            holder_name: card.holder_name.trim(),
        };

        let payment: Payment = self
            .client
            .post(&["orders", order_id, "payments"], &request)
            .await?;
        info!(
            order_id = %order_id,
            payment_id = %payment.id,
            brand = %payment.card_brand,
            amount_cents = payment.amount_cents,
            "Payment submitted"
        );
        Ok(payment)
    }

    pub async fn list(&self) -> ApiResult<Vec<Payment>> {
        self.client.get(&["payments"]).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Payment> {
        self.client.get(&["payments", id]).await
    }
}
