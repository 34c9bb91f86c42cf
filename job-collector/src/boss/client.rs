use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE, REFERER, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::boss::types::{ApiResponse, CityList, PositionList, OK_CODE};
use crate::boss::{Error, Result};
use crate::config::CollectorConfig;
use crate::cookies::encode_cookies;
use crate::options::{CityOption, TaxonomyNode};

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(value.to_owned()))
}

/// A body that parsed as JSON but has the wrong shape is a schema error.
fn decode<T: DeserializeOwned>(body: Value, what: &'static str) -> Result<T> {
    serde_json::from_value(body).map_err(|e| {
        log::warn!("{}: {}", what, e);
        Error::Schema(what)
    })
}

/// Thin client over the BOSS Zhipin `wapi` endpoints.
///
/// Every call is a single attempt bounded by the configured timeout, there is
/// no retry.
#[derive(Clone)]
pub struct BossClient {
    client: Client,
    config: CollectorConfig,
}

impl BossClient {
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(REFERER, header_value(&config.referer)?);
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        if !config.cookies.is_empty() {
            let cookies = encode_cookies(config.cookies.iter().cloned());
            headers.insert(COOKIE, header_value(&cookies)?);
        }
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// GET `url` and parse the body as JSON.
    /// The whole exchange, body included, is dropped once the timeout elapses.
    async fn get_json(&self, url: &str) -> Result<Value> {
        log::debug!("GET {}", url);
        let request = async {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let error_body = resp.text().await;
                log::error!(
                    "request not successful, status code: {}, url: {}, body: {:?}",
                    status,
                    url,
                    error_body
                );
                return Err(Error::RequestNotOk {
                    url: url.to_owned(),
                    status: status.as_u16(),
                });
            }
            let body = resp.text().await?;
            Ok::<_, Error>(serde_json::from_str::<Value>(&body)?)
        };
        match tokio::time::timeout(self.config.timeout, request).await {
            Ok(result) => result,
            Err(_) => {
                log::error!("request cancelled after {:?}, url: {}", self.config.timeout, url);
                Err(Error::Timeout(self.config.timeout))
            }
        }
    }

    /// Raw job list body for an already encoded query string.
    pub async fn fetch_job_list(&self, query: &str) -> Result<Value> {
        let url = format!("{}?{}", self.config.job_list_url, query);
        self.get_json(&url).await
    }

    pub async fn fetch_cities(&self) -> Result<Vec<CityOption>> {
        let body = self.get_json(&self.config.city_list_url).await?;
        let resp: ApiResponse<CityList> = decode(body, "Invalid city data format")?;
        if resp.code != OK_CODE {
            log::warn!("city list rejected, code: {}, message: {:?}", resp.code, resp.message);
            return Err(Error::Schema("Invalid city data format"));
        }
        resp.zp_data
            .and_then(|data| data.hot_city_sites)
            .ok_or(Error::Schema("Invalid city data format"))
    }

    pub async fn fetch_positions(&self, city_code: &str) -> Result<Vec<TaxonomyNode>> {
        let url = format!(
            "{}?cityCode={}",
            self.config.position_url,
            urlencoding::encode(city_code)
        );
        let body = self.get_json(&url).await?;
        let resp: ApiResponse<PositionList> = decode(body, "Invalid position data format")?;
        if resp.code != OK_CODE {
            log::warn!("position list rejected, code: {}, message: {:?}", resp.code, resp.message);
            return Err(Error::Schema("Invalid position data format"));
        }
        resp.zp_data
            .and_then(|data| data.position)
            .ok_or(Error::Schema("Invalid position data format"))
    }
}
