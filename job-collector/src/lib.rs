pub mod boss;
pub mod collector;
pub mod config;
pub(crate) mod cookies;
pub mod fallback;
pub mod message;
pub mod normalize;
pub mod options;
pub mod page;
pub mod query;
pub mod session;
pub mod settings;
pub mod types;

#[cfg(test)]
mod test_server;

pub use boss::Error as FetchError;
pub use collector::{Collection, Collector, Origin};
pub use config::CollectorConfig;
pub use message::{spawn_worker, MessageHandler, Request, Response, WorkerHandle};
pub use session::{Session, SessionError};
pub use settings::{Settings, SettingsError, SettingsStore};
pub use types::{CollectionStats, FilterConfig, JobRecord, MultiSelect, PageData, Website};
