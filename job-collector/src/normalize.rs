use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::boss::types::{Job, JobListResponse, OK_CODE};
use crate::types::{FilterConfig, JobRecord};

pub const DEFAULT_NAME: &str = "职位名称";
pub const DEFAULT_COMPANY: &str = "公司名称";
pub const DEFAULT_CITY: &str = "城市";
pub const DEFAULT_SALARY: &str = "面议";
pub const PENDING_SKILL: &str = "技能匹配中...";
pub const MAX_SKILLS: usize = 5;

const BASE_SCORE: u32 = 50;
const SALARY_BONUS: u32 = 20;
const CITY_BONUS: u32 = 15;
const COMPANY_BONUS: u32 = 15;
const MAX_SCORE: u32 = 100;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Upstream rejected the request, code: {code}, message: {message:?}")]
    UpstreamCode { code: i64, message: Option<String> },
    #[error("Response is missing '{0}'")]
    MissingPayload(&'static str),
    #[error("Response does not match the job list schema: '{0}'")]
    Schema(#[from] serde_json::Error),
}

/// Map a job list body into records.
///
/// Anything but `code == 0` with both `zpData` and a `data` array is an error,
/// so a malformed success looks the same to the caller as a failed request.
pub fn normalize(body: Value, config: &FilterConfig) -> Result<Vec<JobRecord>, NormalizeError> {
    let resp: JobListResponse = serde_json::from_value(body)?;
    if resp.code != OK_CODE {
        return Err(NormalizeError::UpstreamCode {
            code: resp.code,
            message: resp.message,
        });
    }
    if resp.zp_data.is_none() {
        return Err(NormalizeError::MissingPayload("zpData"));
    }
    let jobs = resp.data.ok_or(NormalizeError::MissingPayload("data"))?;
    Ok(jobs
        .into_iter()
        .enumerate()
        .map(|(index, job)| to_record(index, job, config))
        .collect())
}

// Upstream sends empty strings as often as it omits fields; both mean "unknown".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn to_record(index: usize, job: Job, config: &FilterConfig) -> JobRecord {
    let city = non_empty(job.city_name);
    let company = non_empty(job.company_full_name);
    let salary = non_empty(job.salary);
    let match_score = match_score(
        salary.as_deref(),
        city.as_deref(),
        company.as_deref(),
        config,
    );
    JobRecord {
        id: non_empty(job.encrypt_id).unwrap_or_else(|| format!("job_{}", index)),
        name: non_empty(job.position_name).unwrap_or_else(|| DEFAULT_NAME.to_owned()),
        company: company.unwrap_or_else(|| DEFAULT_COMPANY.to_owned()),
        city: city.unwrap_or_else(|| DEFAULT_CITY.to_owned()),
        salary: salary.unwrap_or_else(|| DEFAULT_SALARY.to_owned()),
        skills: extract_skills(job.position_lables),
        match_score,
    }
}

fn extract_skills(labels: Option<Vec<String>>) -> Vec<String> {
    let mut skills: Vec<String> = labels.unwrap_or_default();
    skills.truncate(MAX_SKILLS);
    if skills.is_empty() {
        skills.push(PENDING_SKILL.to_owned());
    }
    skills
}

/// Leading integer of the part before the first `-`, e.g. 25 for `25K-35K/月`.
/// Salaries without a leading number count as 0, oversized ones saturate.
pub fn salary_lower_bound(salary: &str) -> u64 {
    lazy_static! {
        static ref LEADING_INT: Regex = Regex::new(r"^\s*\+?(\d+)").unwrap();
    }
    let head = salary.split('-').next().unwrap_or_default();
    LEADING_INT
        .captures(head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Advisory relevance estimate in `[0, 100]`.
///
/// Base 50, +20 when the salary's lower bound falls inside the configured
/// window, +15 for a known city, +15 for a known company. The weights are
/// heuristic and carry no ranking guarantee.
pub fn match_score(
    salary: Option<&str>,
    city: Option<&str>,
    company: Option<&str>,
    config: &FilterConfig,
) -> u8 {
    let mut score = BASE_SCORE;
    let lower_bound = salary_lower_bound(salary.unwrap_or_default());
    if let (Some(min), Some(max)) = (config.min_salary, config.max_salary) {
        if (u64::from(min)..=u64::from(max)).contains(&lower_bound) {
            score += SALARY_BONUS;
        }
    }
    if city.map_or(false, |c| !c.is_empty()) {
        score += CITY_BONUS;
    }
    if company.map_or(false, |c| !c.is_empty()) {
        score += COMPANY_BONUS;
    }
    score.min(MAX_SCORE) as u8
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn window(min: u32, max: u32) -> FilterConfig {
        FilterConfig {
            min_salary: Some(min),
            max_salary: Some(max),
            ..Default::default()
        }
    }

    #[test]
    fn test_salary_lower_bound() {
        assert_eq!(salary_lower_bound("25K-35K/月"), 25);
        assert_eq!(salary_lower_bound("15-25K·13薪"), 15);
        assert_eq!(salary_lower_bound(" 8k"), 8);
        assert_eq!(salary_lower_bound("面议"), 0);
        assert_eq!(salary_lower_bound(""), 0);
        assert_eq!(salary_lower_bound("-5K"), 0);
        assert_eq!(salary_lower_bound("99999999999K"), 99999999999);
        assert_eq!(salary_lower_bound("99999999999999999999999K"), u64::MAX);
    }

    #[test]
    fn test_unknown_everything_scores_base() {
        assert_eq!(match_score(None, None, None, &FilterConfig::default()), 50);
        assert_eq!(match_score(None, Some(""), Some(""), &window(15, 25)), 50);
    }

    #[test]
    fn test_full_score() {
        let score = match_score(Some("20-30K"), Some("北京"), Some("某公司"), &window(15, 25));
        assert_eq!(score, 100);
    }

    #[test]
    fn test_salary_bonus_needs_window() {
        let config = FilterConfig::default();
        assert_eq!(match_score(Some("20-30K"), None, None, &config), 50);
        assert_eq!(match_score(Some("20-30K"), None, None, &window(20, 20)), 70);
        assert_eq!(match_score(Some("30-40K"), None, None, &window(15, 25)), 50);
        // unknown salary parses as 0, which a window starting at 0 accepts
        assert_eq!(match_score(None, None, None, &window(0, 10)), 70);
        // an oversized bound stays outside any window instead of reading as 0
        assert_eq!(match_score(Some("99999999999K"), None, None, &window(0, 10)), 50);
        assert_eq!(
            match_score(Some("99999999999K"), None, None, &window(0, u32::MAX)),
            50
        );
    }

    #[test]
    fn test_score_always_in_range() {
        let configs = [FilterConfig::default(), window(0, u32::MAX), window(10, 5)];
        let salaries = [None, Some(""), Some("0-1K"), Some("4294967295-0")];
        for config in &configs {
            for salary in salaries {
                for city in [None, Some("北京")] {
                    for company in [None, Some("x")] {
                        let score = match_score(salary, city, company, config);
                        assert!(score <= 100);
                        assert!(score >= 50);
                    }
                }
            }
        }
    }

    #[test]
    fn test_normalize_maps_items_with_defaults() {
        let body = json!({
            "code": 0,
            "message": "Success",
            "zpData": {"pageSize": 15, "pageNo": 1, "hasMore": false, "totalCount": 2},
            "data": [
                {
                    "encryptId": "e1",
                    "positionName": "Rust 开发工程师",
                    "companyFullName": "某科技有限公司",
                    "cityName": "北京",
                    "salary": "20-40K",
                    "positionLables": ["Rust", "Tokio", "gRPC", "Kafka", "Linux", "Docker"]
                },
                {
                    "encryptId": "",
                    "companyFullName": ""
                }
            ]
        });
        let jobs = normalize(body, &window(15, 25)).unwrap();
        assert_eq!(jobs.len(), 2);

        assert_eq!(jobs[0].id, "e1");
        assert_eq!(jobs[0].skills.len(), MAX_SKILLS);
        assert_eq!(jobs[0].skills[4], "Linux");
        assert_eq!(jobs[0].match_score, 100);

        assert_eq!(jobs[1].id, "job_1");
        assert_eq!(jobs[1].name, DEFAULT_NAME);
        assert_eq!(jobs[1].company, DEFAULT_COMPANY);
        assert_eq!(jobs[1].city, DEFAULT_CITY);
        assert_eq!(jobs[1].salary, DEFAULT_SALARY);
        assert_eq!(jobs[1].skills, vec![PENDING_SKILL]);
        assert_eq!(jobs[1].match_score, 50);
    }

    #[test]
    fn test_normalize_rejects_bad_shapes() {
        let config = FilterConfig::default();
        let rejected = json!({"code": 37, "message": "您的访问行为异常"});
        assert!(matches!(
            normalize(rejected, &config),
            Err(NormalizeError::UpstreamCode { code: 37, .. })
        ));
        let no_payload = json!({"code": 0, "data": []});
        assert!(matches!(
            normalize(no_payload, &config),
            Err(NormalizeError::MissingPayload("zpData"))
        ));
        let no_items = json!({"code": 0, "zpData": {}});
        assert!(matches!(
            normalize(no_items, &config),
            Err(NormalizeError::MissingPayload("data"))
        ));
        let not_an_array = json!({"code": 0, "zpData": {}, "data": {"a": 1}});
        assert!(matches!(normalize(not_an_array, &config), Err(NormalizeError::Schema(_))));
        assert!(matches!(normalize(json!([1, 2]), &config), Err(NormalizeError::Schema(_))));
    }
}
