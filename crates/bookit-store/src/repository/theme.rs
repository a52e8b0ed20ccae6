//! # Theme Repository

use bookit_core::ThemePreference;
use chrono::Utc;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::repository::preferences::PreferenceRepository;

pub const THEME_KEY: &str = "ui.theme";

/// Typed view over the theme key.
#[derive(Debug, Clone)]
pub struct ThemeRepository {
    prefs: PreferenceRepository,
}

impl ThemeRepository {
    pub fn new(prefs: PreferenceRepository) -> Self {
        ThemeRepository { prefs }
    }

    /// Stored preference; missing or unrecognized values give the default.
    pub async fn load(&self) -> DbResult<ThemePreference> {
        let Some(raw) = self.prefs.get(THEME_KEY).await? else {
            return Ok(ThemePreference::default());
        };

        match raw.parse() {
            Ok(pref) => Ok(pref),
            Err(_) => {
                warn!(value = %raw, "Unknown stored theme, using default");
                Ok(ThemePreference::default())
            }
        }
    }

    pub async fn save(&self, pref: ThemePreference) -> DbResult<()> {
        debug!(theme = %pref, "Persisting theme");

        sqlx::query(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(THEME_KEY)
        .bind(pref)
        .bind(Utc::now().to_rfc3339())
        .execute(self.prefs.pool())
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_default_when_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.theme().load().await.unwrap(), ThemePreference::System);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for pref in ThemePreference::ALL {
            db.theme().save(pref).await.unwrap();
            assert_eq!(db.theme().load().await.unwrap(), pref);
        }
        assert_eq!(
            db.preferences().get(THEME_KEY).await.unwrap().as_deref(),
            Some("system")
        );
    }

    #[tokio::test]
    async fn test_unknown_value_falls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.preferences().set(THEME_KEY, "sepia").await.unwrap();
        assert_eq!(db.theme().load().await.unwrap(), ThemePreference::System);
    }
}
