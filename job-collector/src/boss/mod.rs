pub mod client;
pub(crate) mod types;

use std::time::Duration;
use thiserror::Error;

pub use client::BossClient;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request error: '{0}'")]
    Request(#[from] reqwest::Error),
    #[error("Request to '{url}' failed with status {status}")]
    RequestNotOk { url: String, status: u16 },
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Response body is not valid JSON: '{0}'")]
    InvalidBody(#[from] serde_json::Error),
    #[error("Invalid request header: '{0}'")]
    InvalidHeader(String),
    #[error("Unexpected response shape: {0}")]
    Schema(&'static str),
}
