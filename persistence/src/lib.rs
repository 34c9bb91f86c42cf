use async_trait::async_trait;
use job_collector::settings::{self, SettingsError, SettingsStore};
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

pub const SETTINGS_COLLECTION: &str = "settings";

#[derive(Debug, Error)]
pub enum Error {
    #[error("MongoDB error: '{0}'")]
    Mongo(#[from] mongodb::error::Error),
    #[error("IO error: '{0}'")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: '{0}'")]
    Json(#[from] serde_json::Error),
}

impl From<Error> for SettingsError {
    fn from(e: Error) -> Self {
        SettingsError::Backend(e.to_string())
    }
}

pub async fn connect(
    mongodb_connection_url: &str,
    database_name: &str,
) -> Result<mongodb::Database, Error> {
    let client = mongodb::Client::with_uri_str(mongodb_connection_url).await?;
    Ok(client.database(database_name))
}

#[derive(Serialize, Deserialize, Debug)]
struct StoredSetting {
    #[serde(rename = "_id")]
    key: String,
    value: String,
}

/// One document per settings key in the `settings` collection.
#[derive(Clone)]
pub struct MongoSettingsStore {
    collection: mongodb::Collection<StoredSetting>,
}

impl MongoSettingsStore {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection::<StoredSetting>(SETTINGS_COLLECTION),
        }
    }

    pub async fn connect(mongodb_connection_url: &str, database_name: &str) -> Result<Self, Error> {
        let db = connect(mongodb_connection_url, database_name).await?;
        log::info!("Connected to database {}", database_name);
        Ok(Self::new(&db))
    }
}

#[async_trait]
impl SettingsStore for MongoSettingsStore {
    async fn get(&self, key: &str) -> settings::Result<Option<String>> {
        let found = self
            .collection
            .find_one(doc! { "_id": key }, None)
            .await
            .map_err(Error::from)?;
        Ok(found.map(|setting| setting.value))
    }

    async fn set(&self, key: &str, value: String) -> settings::Result<()> {
        let setting = StoredSetting {
            key: key.to_owned(),
            value,
        };
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "_id": key }, &setting, options)
            .await
            .map_err(Error::from)?;
        log::debug!("Saved setting {}", key);
        Ok(())
    }
}

/// All keys in a single JSON object on disk, values kept as parsed JSON.
pub struct FileSettingsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Map<String, Value>, Error> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Map::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, values: &Map<String, Value>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_string_pretty(values)?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, raw).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    /// Sibling file a new version is written to before it replaces the original.
    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self, key: &str) -> settings::Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let values = self.read_all().await?;
        Ok(values.get(key).map(Value::to_string))
    }

    async fn set(&self, key: &str, value: String) -> settings::Result<()> {
        let parsed: Value = serde_json::from_str(&value)?;
        let _guard = self.lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_owned(), parsed);
        self.write_all(&values).await?;
        log::debug!("Saved setting {} to {}", key, self.path.display());
        Ok(())
    }
}
