use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::{CollectionStats, FilterConfig, JobRecord};

pub const FILTER_CONFIG_KEY: &str = "filterConfig";
pub const JOBS_DATA_KEY: &str = "jobsData";
pub const STATS_KEY: &str = "stats";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Stored value for '{key}' is invalid: '{source}'")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("Failed to serialize value: '{0}'")]
    Serialize(#[from] serde_json::Error),
    #[error("Settings backend error: '{0}'")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Key-value storage for JSON encoded settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Store kept in process memory, nothing survives a restart.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.values.write().await.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Everything persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredState {
    pub filter_config: FilterConfig,
    pub jobs: Vec<JobRecord>,
    pub stats: CollectionStats,
}

/// Typed access to the settings keys on top of any `SettingsStore`.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn SettingsStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySettingsStore::new()))
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| SettingsError::Corrupt {
                    key: key.to_owned(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw).await
    }

    pub async fn load_filter_config(&self) -> Result<Option<FilterConfig>> {
        self.load(FILTER_CONFIG_KEY).await
    }

    pub async fn save_filter_config(&self, config: &FilterConfig) -> Result<()> {
        self.save(FILTER_CONFIG_KEY, config).await
    }

    pub async fn load_jobs(&self) -> Result<Option<Vec<JobRecord>>> {
        self.load(JOBS_DATA_KEY).await
    }

    pub async fn save_jobs(&self, jobs: &[JobRecord]) -> Result<()> {
        self.save(JOBS_DATA_KEY, jobs).await
    }

    pub async fn load_stats(&self) -> Result<Option<CollectionStats>> {
        self.load(STATS_KEY).await
    }

    pub async fn save_stats(&self, stats: &CollectionStats) -> Result<()> {
        self.save(STATS_KEY, stats).await
    }

    /// Load everything, writing defaults for whatever has never been stored.
    pub async fn load_state(&self) -> Result<StoredState> {
        let filter_config = match self.load_filter_config().await? {
            Some(config) => config,
            None => {
                log::info!("no stored filter config, initializing defaults");
                let config = FilterConfig::default();
                self.save_filter_config(&config).await?;
                config
            }
        };
        let jobs = match self.load_jobs().await? {
            Some(jobs) => jobs,
            None => {
                self.save_jobs(&[]).await?;
                Vec::new()
            }
        };
        let stats = match self.load_stats().await? {
            Some(stats) => stats,
            None => {
                let stats = CollectionStats::empty(filter_config.website);
                self.save_stats(&stats).await?;
                stats
            }
        };
        Ok(StoredState {
            filter_config,
            jobs,
            stats,
        })
    }
}
