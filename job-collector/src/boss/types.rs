use crate::options::{CityOption, TaxonomyNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope shared by every `wapi` endpoint, `code == 0` means success.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub code: i64,
    pub message: Option<String>,
    pub zp_data: Option<T>,
}

pub const OK_CODE: i64 = 0;

/// Job list payload: the items sit next to `zpData` rather than inside it.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Job>>,
    #[serde(default)]
    pub zp_data: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    pub encrypt_id: Option<String>,
    pub position_name: Option<String>,
    pub company_full_name: Option<String>,
    pub city_name: Option<String>,
    pub salary: Option<String>,
    /// Misspelled upstream, kept as is
    pub position_lables: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CityList {
    #[serde(default)]
    pub hot_city_sites: Option<Vec<CityOption>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PositionList {
    #[serde(default)]
    pub position: Option<Vec<TaxonomyNode>>,
}
