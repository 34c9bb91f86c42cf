use serde_json::Value;

use crate::boss::{self, BossClient};
use crate::config::CollectorConfig;
use crate::fallback;
use crate::normalize::normalize;
use crate::options::{default_cities, default_taxonomy, CityOption, TaxonomyNode};
use crate::types::{FilterConfig, JobRecord};

/// Where a result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Live,
    Sample,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub jobs: Vec<JobRecord>,
    pub origin: Origin,
}

impl Collection {
    fn sample(config: &FilterConfig) -> Self {
        Self {
            jobs: fallback::generate(config),
            origin: Origin::Sample,
        }
    }
}

/// Turn a job list body into records, or the sample catalog when it cannot be used.
pub fn resolve(body: Value, config: &FilterConfig) -> Collection {
    match normalize(body, config) {
        Ok(jobs) => Collection {
            jobs,
            origin: Origin::Live,
        },
        Err(e) => {
            log::warn!("unusable job list response, serving samples: {}", e);
            Collection::sample(config)
        }
    }
}

/// Fetch-normalize-fallback workflow for every supported site.
#[derive(Clone)]
pub struct Collector {
    client: BossClient,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> boss::Result<Self> {
        Ok(Self {
            client: BossClient::new(config)?,
        })
    }

    /// Never fails: network, timeout and schema problems all end in the
    /// sample catalog filtered by `config`.
    pub async fn collect(&self, config: &FilterConfig, query: &str) -> Collection {
        if !config.website.is_live() {
            log::info!("no live source for {}, serving samples", config.website);
            return Collection::sample(config);
        }
        match self.client.fetch_job_list(query).await {
            Ok(body) => {
                let collection = resolve(body, config);
                log::info!(
                    "collected {} jobs from {}, origin: {:?}",
                    collection.jobs.len(),
                    config.website,
                    collection.origin
                );
                collection
            }
            Err(e) => {
                log::error!("failed to fetch from {}: {}", config.website, e);
                Collection::sample(config)
            }
        }
    }

    pub async fn cities(&self) -> Vec<CityOption> {
        self.client.fetch_cities().await.unwrap_or_else(|e| {
            log::error!("failed to fetch cities: {}", e);
            default_cities()
        })
    }

    pub async fn taxonomy(&self, city_code: &str) -> Vec<TaxonomyNode> {
        self.client
            .fetch_positions(city_code)
            .await
            .unwrap_or_else(|e| {
                log::error!("failed to fetch job positions for {}: {}", city_code, e);
                default_taxonomy()
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::query::build_query;
    use crate::test_server::{self, Reply};
    use crate::types::Website;
    use serde_json::json;
    use std::time::Duration;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn collector_for(base_url: &str) -> Collector {
        let config = CollectorConfig::default()
            .with_base_url(base_url)
            .with_timeout(Duration::from_millis(300));
        Collector::new(config).unwrap()
    }

    fn react_config() -> FilterConfig {
        FilterConfig {
            city: "101010100".to_owned(),
            job_title: String::new(),
            skills: vec!["React".to_owned()],
            ..Default::default()
        }
    }

    #[test]
    fn test_rejected_code_equals_fallback() {
        let config = react_config();
        let collection = resolve(json!({"code": 1, "message": "error"}), &config);
        assert_eq!(collection.origin, Origin::Sample);
        assert_eq!(collection.jobs, fallback::generate(&config));
    }

    #[tokio::test]
    async fn test_live_results() {
        init();
        let body = r#"{"code": 0, "zpData": {"hasMore": false},
            "data": [{"encryptId": "x1", "positionName": "Rust", "cityName": "北京"}]}"#;
        let mut server = test_server::spawn(Reply::json(200, body)).await;
        let config = react_config();
        let query = build_query(&config);
        let collection = collector_for(&server.base_url).collect(&config, &query).await;
        assert_eq!(collection.origin, Origin::Live);
        assert_eq!(collection.jobs.len(), 1);
        assert_eq!(collection.jobs[0].match_score, 65);
        let head = server.requests.recv().await.unwrap();
        assert!(head.contains(&query));
    }

    #[tokio::test]
    async fn test_timeout_same_as_network_failure() {
        init();
        let config = react_config();
        let query = build_query(&config);
        let stalled = test_server::spawn(Reply::Stall).await;
        let timed_out = collector_for(&stalled.base_url).collect(&config, &query).await;
        let refused_url = test_server::closed_port_url().await;
        let refused = collector_for(&refused_url).collect(&config, &query).await;
        assert_eq!(timed_out, refused);
        assert_eq!(timed_out.origin, Origin::Sample);
        assert_eq!(timed_out.jobs.len(), 3);
    }

    #[tokio::test]
    async fn test_http_error_falls_back() {
        init();
        let server = test_server::spawn(Reply::json(500, "oops")).await;
        let config = react_config();
        let collection = collector_for(&server.base_url).collect(&config, "page=1").await;
        assert_eq!(collection, Collection::sample(&config));
    }

    #[tokio::test]
    async fn test_unsupported_site_skips_network() {
        init();
        let mut server = test_server::spawn(Reply::json(200, "{}")).await;
        let config = FilterConfig {
            website: Website::Liepin,
            ..react_config()
        };
        let collection = collector_for(&server.base_url).collect(&config, "page=1").await;
        assert_eq!(collection.origin, Origin::Sample);
        assert!(server.requests.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lookups_fall_back_to_defaults() {
        init();
        let url = test_server::closed_port_url().await;
        let collector = collector_for(&url);
        assert_eq!(collector.cities().await, default_cities());
        assert_eq!(collector.taxonomy("101010100").await, default_taxonomy());
    }
}
