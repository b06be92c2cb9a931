use std::sync::Arc;

use log::info;

use crate::{
    api::ApiClientImpl,
    config::{Config, get_config},
    core::{DefaultCore, UndoWindow},
    error::Result,
    storage::{StorageImpl, database},
};

pub type DefaultUndoWindow = UndoWindow<ApiClientImpl, StorageImpl>;

/// Wires storage, the HTTP client and the core service from a config.
#[derive(Debug, Clone, Default)]
pub struct CoreBuilder {
    config: Option<Config>,
}

impl CoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config` instead of the global one.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub async fn build(self) -> Result<(Arc<DefaultCore>, DefaultUndoWindow)> {
        info!("CoreBuilder: Building Core service...");
        let config = match self.config {
            Some(config) => config,
            None => get_config().read()?.clone(),
        };

        let db_pool = database::create_db_pool(&config.db_path).await?;
        let storage = StorageImpl::new(db_pool).await?;
        info!("Storage initialized");

        let api_client =
            ApiClientImpl::with_timeout(config.api_base_url.clone(), config.request_timeout)?;
        info!("API client created for {}", api_client.base_url());

        let core = Arc::new(DefaultCore::new(api_client, storage));
        core.initialize().await?;
        info!("Core service initialized");

        let undo = UndoWindow::new(Arc::clone(&core), config.undo_window);
        Ok((core, undo))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_build_seeds_new_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: dir.path().join("profile.db"),
            undo_window: Duration::from_millis(500),
            ..Default::default()
        };

        let (core, undo) = CoreBuilder::new()
            .with_config(config.clone())
            .build()
            .await
            .unwrap();
        let state = core.state();
        assert_eq!(state.profile.unwrap().username, "ramazan");
        assert_eq!(state.stories.len(), 6);
        assert_eq!(undo.window(), Duration::from_millis(500));
        drop(undo);
        drop(core);

        // reopening keeps the stored data
        let (core, _) = CoreBuilder::new().with_config(config).build().await.unwrap();
        core.toggle_follow().await.unwrap();
        assert_eq!(core.state().profile.unwrap().follower_count, 1248);
    }
}
