//! Chat with suppliers.

use bookit_core::validation::validate_message_body;
use bookit_core::{Conversation, Message};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Body of `GET /conversations/unread-count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnreadCount {
    pub count: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest<'a> {
    body: &'a str,
    client_message_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartConversationRequest<'a> {
    supplier_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct ConversationsService {
    client: ApiClient,
}

impl ConversationsService {
    pub fn new(client: ApiClient) -> Self {
        ConversationsService { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Conversation>> {
        self.client.get(&["conversations"]).await
    }

    pub async fn messages(&self, conversation_id: &str) -> ApiResult<Vec<Message>> {
        self.client
            .get(&["conversations", conversation_id, "messages"])
            .await
    }

    /// Sends a message under a fresh client message id.
    pub async fn send(&self, conversation_id: &str, body: &str) -> ApiResult<Message> {
        let client_message_id = Uuid::new_v4().to_string();
        self.send_with_id(conversation_id, body, &client_message_id)
            .await
    }

    /// Sends a message under a caller-chosen id, so a resend after a dropped
    /// response is recognized by the server as the same message.
    pub async fn send_with_id(
        &self,
        conversation_id: &str,
        body: &str,
        client_message_id: &str,
    ) -> ApiResult<Message> {
        let body = validate_message_body(body)?;
        debug!(
            conversation_id = %conversation_id,
            client_message_id = %client_message_id,
            "Sending message"
        );
        self.client
            .post(
                &["conversations", conversation_id, "messages"],
                &SendMessageRequest {
                    body: &body,
                    client_message_id,
                },
            )
            .await
    }

    /// Opens (or returns the existing) conversation with a supplier.
    pub async fn start(&self, supplier_id: &str) -> ApiResult<Conversation> {
        self.client
            .post(&["conversations"], &StartConversationRequest { supplier_id })
            .await
    }

    pub async fn mark_read(&self, conversation_id: &str) -> ApiResult<()> {
        self.client
            .post_empty(&["conversations", conversation_id, "read"], &serde_json::json!({}))
            .await
    }

    /// Total unread messages across all conversations.
    pub async fn unread_count(&self) -> ApiResult<u32> {
        let unread: UnreadCount = self.client.get(&["conversations", "unread-count"]).await?;
        Ok(unread.count)
    }
}
