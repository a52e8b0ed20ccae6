//! Authentication and profile endpoints.

use bookit_core::{LoginRequest, ProfileUpdate, RegisterRequest, User};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Body of a successful login or registration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        AuthService { client }
    }

    /// `POST /auth/login`. Input is checked locally first.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        request.validate()?;
        let response: AuthResponse = self.client.post(&["auth", "login"], request).await?;
        info!(user_id = %response.user.id, "Logged in");
        Ok(response)
    }

    /// `POST /auth/register`.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        request.validate()?;
        let response: AuthResponse = self.client.post(&["auth", "register"], request).await?;
        info!(user_id = %response.user.id, "Registered");
        Ok(response)
    }

    /// `GET /auth/me`: the user the current token belongs to.
    pub async fn me(&self) -> ApiResult<User> {
        self.client.get(&["auth", "me"]).await
    }

    /// `POST /auth/logout`: revokes the token server-side.
    pub async fn logout(&self) -> ApiResult<()> {
        self.client
            .post_empty(&["auth", "logout"], &serde_json::json!({}))
            .await
    }

    /// `PATCH /auth/profile`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        update.validate()?;
        self.client.patch(&["auth", "profile"], update).await
    }

    /// `POST /auth/change-password`.
    pub async fn change_password(&self, current: &str, new: &str) -> ApiResult<()> {
        bookit_core::validation::validate_required("current password", current)?;
        bookit_core::validation::validate_password(new)?;
        self.client
            .post_empty(
                &["auth", "change-password"],
                &ChangePasswordRequest {
                    current_password: current,
                    new_password: new,
                },
            )
            .await
    }
}
