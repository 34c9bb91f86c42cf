use crate::cookies::parse_cookie_pairs;
use std::time::Duration;

pub const JOB_LIST_URL: &str = "https://www.zhipin.com/wapi/zpgeek/pc/recommend/job/list.json";
pub const CITY_LIST_URL: &str = "https://www.zhipin.com/wapi/zpgeek/common/data/city/site.json";
pub const POSITION_URL: &str = "https://www.zhipin.com/wapi/zpCommon/data/getCityShowPosition";
pub const REFERER: &str = "https://www.zhipin.com/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoints, headers and limits used when talking to the upstream site.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub job_list_url: String,
    pub city_list_url: String,
    pub position_url: String,
    pub referer: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Session cookies sent along with every request, the logged-in user's credentials
    pub cookies: Vec<(String, String)>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            job_list_url: JOB_LIST_URL.to_owned(),
            city_list_url: CITY_LIST_URL.to_owned(),
            position_url: POSITION_URL.to_owned(),
            referer: REFERER.to_owned(),
            user_agent: USER_AGENT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            cookies: Vec::new(),
        }
    }
}

impl CollectorConfig {
    /// Defaults overridden by `JOB_COLLECTOR_TIMEOUT_SECS` and `JOB_COLLECTOR_COOKIES`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(secs) = std::env::var("JOB_COLLECTOR_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => log::warn!(
                    "ignoring invalid JOB_COLLECTOR_TIMEOUT_SECS: '{}', using {:?}",
                    secs,
                    config.timeout
                ),
            }
        }
        if let Ok(raw) = std::env::var("JOB_COLLECTOR_COOKIES") {
            config.cookies = parse_cookie_pairs(&raw);
            log::debug!("loaded {} session cookies", config.cookies.len());
        }
        config
    }

    /// Point every endpoint at another host, keeping the paths.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.job_list_url = format!("{}/wapi/zpgeek/pc/recommend/job/list.json", base);
        self.city_list_url = format!("{}/wapi/zpgeek/common/data/city/site.json", base);
        self.position_url = format!("{}/wapi/zpCommon/data/getCityShowPosition", base);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
