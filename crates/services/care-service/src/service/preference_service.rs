//! Preference service - Device-level display settings.

use async_trait::async_trait;

use common::AppResult;
use domain::Theme;

use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PreferenceService: Send + Sync {
    /// Stored theme, light when unset or unrecognized
    async fn theme(&self) -> AppResult<Theme>;

    async fn set_theme(&self, theme: Theme) -> AppResult<()>;
}

pub struct PreferenceManager {
    persistence: Persistence,
}

impl PreferenceManager {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl PreferenceService for PreferenceManager {
    async fn theme(&self) -> AppResult<Theme> {
        let stored = self.persistence.store().theme().await?;
        Ok(stored
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    async fn set_theme(&self, theme: Theme) -> AppResult<()> {
        self.persistence.store().set_theme(theme.as_str()).await?;
        tracing::debug!(%theme, "theme saved");
        Ok(())
    }
}
