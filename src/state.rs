use crate::auth::session::SessionGuard;
use crate::config::AppConfig;
use crate::food_log::repo::FoodLog;
use crate::profile::client::{HttpProfileApi, ProfileApi};
use crate::storage::{keys, KeyValueStore, MemoryStore, SqliteStore};
use anyhow::Context;
use std::{sync::Arc, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn KeyValueStore>,
    pub food_log: Arc<FoodLog>,
    pub profile_api: Arc<dyn ProfileApi>,
    pub session: Arc<SessionGuard>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn KeyValueStore> = if config.database_url == "memory" {
            tracing::warn!("using in-memory store; nothing will persist");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(
                SqliteStore::connect(&config.database_url)
                    .await
                    .context("open local store")?,
            )
        };

        let profile_api = Arc::new(
            HttpProfileApi::new(
                &config.profile_api.base_url,
                Duration::from_secs(config.profile_api.timeout_secs),
                store.clone(),
            )
            .context("build profile client")?,
        ) as Arc<dyn ProfileApi>;

        let state = Self::from_parts(config, store, profile_api);

        // Already signed in from a previous run: that session has been reconciled.
        if state.store.get(keys::AUTH_TOKEN).await?.is_some() {
            state.session.try_claim();
        }
        Ok(state)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn KeyValueStore>,
        profile_api: Arc<dyn ProfileApi>,
    ) -> Self {
        Self {
            config,
            food_log: Arc::new(FoodLog::new(store.clone())),
            store,
            profile_api,
            session: Arc::new(SessionGuard::default()),
        }
    }

    #[cfg(test)]
    pub fn fake(profile_api: Arc<dyn ProfileApi>) -> Self {
        use crate::config::ProfileApiConfig;

        let config = Arc::new(AppConfig {
            database_url: "memory".into(),
            profile_api: ProfileApiConfig {
                base_url: "http://fake.local".into(),
                timeout_secs: 1,
            },
            host: "127.0.0.1".into(),
            port: 0,
        });

        Self::from_parts(config, Arc::new(MemoryStore::new()), profile_api)
    }
}
