use crate::types::FilterConfig;

pub const PAGE: &str = "1";
pub const PAGE_SIZE: &str = "15";

pub type QueryParams = Vec<(&'static str, String)>;

/// Translate a filter into the flat parameter list the job list endpoint expects.
///
/// Order is stable so that identical configs produce identical query strings.
/// `industry` and `scale` are always sent empty: the endpoint expects the keys
/// even though no filter populates them.
pub fn build_params(config: &FilterConfig, timestamp_ms: i64) -> QueryParams {
    let mut params: QueryParams = vec![
        ("page", PAGE.to_owned()),
        ("pageSize", PAGE_SIZE.to_owned()),
        ("city", config.city.clone()),
        ("encryptExpectId", String::new()),
        ("mixExpectType", String::new()),
        ("expectInfo", String::new()),
    ];
    if let Some(expect_id) = expect_id(config) {
        params.push(("expectId", expect_id.to_owned()));
    }
    push_codes(&mut params, "salary", &config.salary);
    push_codes(&mut params, "degree", &config.degree);
    push_codes(&mut params, "jobType", &config.job_rec_type);
    push_codes(&mut params, "experience", &config.experience);
    params.push(("industry", String::new()));
    params.push(("scale", String::new()));
    params.push(("_", timestamp_ms.to_string()));
    params
}

/// The most specific taxonomy level selected, subtype before type.
pub fn expect_id(config: &FilterConfig) -> Option<&str> {
    [&config.job_sub_type, &config.job_type]
        .into_iter()
        .find(|code| !code.is_empty())
        .map(String::as_str)
}

// An empty selection means "no filter", so the key is left out entirely.
fn push_codes(params: &mut QueryParams, key: &'static str, codes: &[String]) {
    if !codes.is_empty() {
        params.push((key, codes.join(",")));
    }
}

pub fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn build_query_at(config: &FilterConfig, timestamp_ms: i64) -> String {
    encode_params(&build_params(config, timestamp_ms))
}

pub fn build_query(config: &FilterConfig) -> String {
    build_query_at(config, chrono::Utc::now().timestamp_millis())
}
