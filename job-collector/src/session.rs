use futures::Stream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::message::{Request, Response, WorkerHandle};
use crate::query::build_query;
use crate::settings::{Settings, SettingsError};
use crate::types::{CollectionStats, FilterConfig, JobRecord};

/// Period of the background refresh.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A collection is already running")]
    Busy,
    #[error("数据采集失败，请检查网络或配置")]
    NoResponse,
    #[error("Collection rejected: '{0}'")]
    Rejected(String),
    #[error("Unexpected response to a job request")]
    UnexpectedResponse,
    #[error("Settings error: '{0}'")]
    Settings(#[from] SettingsError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone)]
struct State {
    config: FilterConfig,
    jobs: Vec<JobRecord>,
    stats: CollectionStats,
}

/// Releases the busy flag however the refresh ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Front-end state: the current filter, the last result set and its stats.
///
/// Every mutation is persisted immediately. Only one refresh runs at a time,
/// a second one started meanwhile is turned away with `SessionError::Busy`.
pub struct Session {
    settings: Settings,
    worker: WorkerHandle,
    state: Mutex<State>,
    loading: AtomicBool,
}

impl Session {
    pub async fn open(settings: Settings, worker: WorkerHandle) -> Result<Self> {
        let stored = settings.load_state().await?;
        log::info!(
            "session opened with {} stored jobs, last update: '{}'",
            stored.jobs.len(),
            stored.stats.last_update
        );
        Ok(Self {
            settings,
            worker,
            state: Mutex::new(State {
                config: stored.filter_config,
                jobs: stored.jobs,
                stats: stored.stats,
            }),
            loading: AtomicBool::new(false),
        })
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn config(&self) -> FilterConfig {
        self.state().config.clone()
    }

    pub fn jobs(&self) -> Vec<JobRecord> {
        self.state().jobs.clone()
    }

    pub fn stats(&self) -> CollectionStats {
        self.state().stats.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Apply `change` to the filter and persist the result.
    /// The session keeps the previous filter when the write fails.
    pub async fn update_config<F>(&self, change: F) -> Result<FilterConfig>
    where
        F: FnOnce(&mut FilterConfig),
    {
        let mut config = self.config();
        change(&mut config);
        self.settings.save_filter_config(&config).await?;
        self.state().config = config.clone();
        Ok(config)
    }

    pub async fn replace_config(&self, config: FilterConfig) -> Result<FilterConfig> {
        self.update_config(move |current| *current = config).await
    }

    /// Run one fetch cycle and replace the stored results with its outcome.
    ///
    /// Without any reply from the worker, or when storing the outcome fails,
    /// the previous results stay in place both in memory and in the store.
    pub async fn refresh(&self) -> Result<CollectionStats> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::Busy);
        }
        let _guard = LoadingGuard(&self.loading);

        let config = self.config();
        let params = build_query(&config);
        log::debug!("refreshing {} with params: {}", config.website, params);
        let response = self
            .worker
            .send(Request::FetchJobs {
                config: Some(config.clone()),
                params: Some(params),
            })
            .await;

        let jobs = match response {
            Some(Response::FetchJobs(resp)) if resp.success => resp.data,
            Some(Response::FetchJobs(resp)) => {
                let error = resp.error.unwrap_or_default();
                log::error!("collection rejected: {}", error);
                return Err(SessionError::Rejected(error));
            }
            Some(_) => return Err(SessionError::UnexpectedResponse),
            None => {
                log::error!("no response from worker, keeping previous results");
                return Err(SessionError::NoResponse);
            }
        };

        let stats = CollectionStats::new(jobs.len(), config.website);
        let previous_jobs = self.jobs();
        self.settings.save_jobs(&jobs).await?;
        if let Err(e) = self.settings.save_stats(&stats).await {
            log::error!("failed to store stats, restoring previous jobs: {}", e);
            if let Err(e) = self.settings.save_jobs(&previous_jobs).await {
                log::error!("failed to restore previous jobs: {}", e);
            }
            return Err(e.into());
        }
        {
            let mut state = self.state();
            state.jobs = jobs;
            state.stats = stats.clone();
        }
        log::info!("collected {} jobs at {}", stats.total, stats.last_update);
        Ok(stats)
    }

    /// Refresh every `period`, starting immediately.
    pub fn refresh_every(
        self: Arc<Self>,
        period: Duration,
    ) -> impl Stream<Item = Result<CollectionStats>> {
        async_stream::stream! {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                log::info!("running scheduled job fetch");
                yield self.refresh().await;
            }
        }
    }
}
