//! Request/response boundary between the front end and the background worker
//! that performs collection.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::collector::Collector;
use crate::page::extract_page_data;
use crate::settings::Settings;
use crate::types::{FilterConfig, JobRecord, PageData};

pub const MISSING_PARAMS_ERROR: &str = "缺少必要的配置参数";
const WORKER_QUEUE: usize = 16;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "FETCH_JOBS")]
    FetchJobs {
        #[serde(default)]
        config: Option<FilterConfig>,
        #[serde(default)]
        params: Option<String>,
    },
    #[serde(rename = "GET_PAGE_DATA")]
    GetPageData {
        #[serde(default)]
        html: String,
    },
    #[serde(rename = "UPDATE_CONFIG")]
    UpdateConfig { config: FilterConfig },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchJobsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<JobRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PageDataResponse {
    pub data: Vec<PageData>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Response {
    FetchJobs(FetchJobsResponse),
    PageData(PageDataResponse),
    Ack(AckResponse),
}

/// Executes requests; owned by the worker task.
pub struct MessageHandler {
    collector: Collector,
    settings: Settings,
}

impl MessageHandler {
    pub fn new(collector: Collector, settings: Settings) -> Self {
        Self {
            collector,
            settings,
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::FetchJobs { config, params } => {
                let (config, params) = match (config, params) {
                    (Some(config), Some(params)) if !params.is_empty() => (config, params),
                    _ => {
                        log::warn!("FETCH_JOBS without config or params");
                        return Response::FetchJobs(FetchJobsResponse {
                            success: false,
                            data: Vec::new(),
                            error: Some(MISSING_PARAMS_ERROR.to_owned()),
                        });
                    }
                };
                let collection = self.collector.collect(&config, &params).await;
                Response::FetchJobs(FetchJobsResponse {
                    success: true,
                    data: collection.jobs,
                    error: None,
                })
            }
            Request::GetPageData { html } => Response::PageData(PageDataResponse {
                data: extract_page_data(&html),
            }),
            Request::UpdateConfig { config } => {
                match self.settings.save_filter_config(&config).await {
                    Ok(()) => Response::Ack(AckResponse {
                        success: true,
                        error: None,
                    }),
                    Err(e) => {
                        log::error!("failed to persist filter config: {}", e);
                        Response::Ack(AckResponse {
                            success: false,
                            error: Some(e.to_string()),
                        })
                    }
                }
            }
        }
    }
}

type Envelope = (Request, oneshot::Sender<Response>);

/// Sending side of the worker. Cloning shares the same worker.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WorkerHandle {
    /// `None` when the worker is gone or dropped the request without answering.
    pub async fn send(&self, request: Request) -> Option<Response> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send((request, reply_tx)).await.is_err() {
            log::error!("worker is not running, request dropped");
            return None;
        }
        reply_rx.await.ok()
    }

    /// A handle backed by a custom loop, for callers that need to control replies.
    pub fn from_sender(tx: mpsc::Sender<(Request, oneshot::Sender<Response>)>) -> Self {
        Self { tx }
    }
}

/// Run `handler` on its own task, processing one request at a time.
pub fn spawn_worker(handler: MessageHandler) -> WorkerHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(WORKER_QUEUE);
    tokio::spawn(async move {
        while let Some((request, reply)) = rx.recv().await {
            let response = handler.handle(request).await;
            if reply.send(response).is_err() {
                log::debug!("requester went away before the reply");
            }
        }
        log::debug!("worker stopped, all handles dropped");
    });
    WorkerHandle { tx }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::CollectorConfig;
    use crate::fallback;
    use crate::test_server;
    use crate::types::Website;
    use std::time::Duration;

    async fn offline_handler(settings: Settings) -> MessageHandler {
        let url = test_server::closed_port_url().await;
        let config = CollectorConfig::default()
            .with_base_url(&url)
            .with_timeout(Duration::from_millis(300));
        MessageHandler::new(Collector::new(config).unwrap(), settings)
    }

    #[test]
    fn test_deserialize_requests() {
        let fetch: Request = serde_json::from_str(
            r#"{"type": "FETCH_JOBS", "config": {"website": "zhaopin"}, "params": "page=1"}"#,
        )
        .unwrap();
        match fetch {
            Request::FetchJobs { config, params } => {
                assert_eq!(config.unwrap().website, Website::Zhaopin);
                assert_eq!(params.as_deref(), Some("page=1"));
            }
            other => panic!("unexpected request: {:?}", other),
        }
        let bare: Request = serde_json::from_str(r#"{"type": "FETCH_JOBS"}"#).unwrap();
        assert_eq!(
            bare,
            Request::FetchJobs {
                config: None,
                params: None
            }
        );
    }

    #[test]
    fn test_serialize_responses() {
        let resp = Response::FetchJobs(FetchJobsResponse {
            success: false,
            data: Vec::new(),
            error: Some(MISSING_PARAMS_ERROR.to_owned()),
        });
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"success":false,"data":[],"error":"缺少必要的配置参数"}"#
        );
    }

    #[tokio::test]
    async fn test_missing_params_rejected() {
        let handler = offline_handler(Settings::in_memory()).await;
        let config = Some(FilterConfig::default());
        for (config, params) in [
            (None, Some("page=1".to_owned())),
            (config.clone(), None),
            (config, Some(String::new())),
        ] {
            let resp = handler.handle(Request::FetchJobs { config, params }).await;
            match resp {
                Response::FetchJobs(r) => {
                    assert!(!r.success);
                    assert!(r.data.is_empty());
                    assert_eq!(r.error.as_deref(), Some(MISSING_PARAMS_ERROR));
                }
                other => panic!("unexpected response: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_worker_round_trip_absorbs_failures() {
        let worker = spawn_worker(offline_handler(Settings::in_memory()).await);
        let config = FilterConfig::default();
        let resp = worker
            .send(Request::FetchJobs {
                config: Some(config.clone()),
                params: Some("page=1".to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(
            resp,
            Response::FetchJobs(FetchJobsResponse {
                success: true,
                data: fallback::generate(&config),
                error: None,
            })
        );
    }

    #[tokio::test]
    async fn test_update_config_persists() {
        let settings = Settings::in_memory();
        let worker = spawn_worker(offline_handler(settings.clone()).await);
        let mut config = FilterConfig::default();
        config.add_skill("Rust");
        let resp = worker
            .send(Request::UpdateConfig {
                config: config.clone(),
            })
            .await;
        assert!(matches!(resp, Some(Response::Ack(AckResponse { success: true, .. }))));
        assert_eq!(settings.load_filter_config().await.unwrap(), Some(config));
    }

    #[tokio::test]
    async fn test_dropped_reply_is_none() {
        let (tx, mut rx) = mpsc::channel(1);
        tokio::spawn(async move {
            while let Some((_request, reply)) = rx.recv().await {
                drop::<oneshot::Sender<Response>>(reply);
            }
        });
        let worker = WorkerHandle::from_sender(tx);
        let resp = worker
            .send(Request::GetPageData {
                html: String::new(),
            })
            .await;
        assert!(resp.is_none());
    }
}
