//! Server-side user settings.

use bookit_core::{SettingsUpdate, UserSettings};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct SettingsService {
    client: ApiClient,
}

impl SettingsService {
    pub fn new(client: ApiClient) -> Self {
        SettingsService { client }
    }

    pub async fn get(&self) -> ApiResult<UserSettings> {
        self.client.get(&["settings"]).await
    }

    /// `PATCH /settings`; returns the settings after the change.
    pub async fn update(&self, update: &SettingsUpdate) -> ApiResult<UserSettings> {
        self.client.patch(&["settings"], update).await
    }
}
