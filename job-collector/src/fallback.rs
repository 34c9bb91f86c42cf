//! Built-in sample catalog served whenever live data is unavailable.

use crate::options::FALLBACK_CITY_NAMES;
use crate::types::{FilterConfig, JobRecord};

struct Sample {
    id: &'static str,
    name: &'static str,
    company: &'static str,
    city: &'static str,
    salary: &'static str,
    skills: &'static [&'static str],
    match_score: u8,
}

const SAMPLE_JOBS: [Sample; 6] = [
    Sample {
        id: "job_1",
        name: "React 高级开发工程师",
        company: "腾讯科技有限公司",
        city: "北京",
        salary: "25K-35K/月",
        skills: &["React", "TypeScript", "Node.js", "WebSocket"],
        match_score: 92,
    },
    Sample {
        id: "job_2",
        name: "Node.js 服务端开发",
        company: "阿里巴巴集团",
        city: "杭州",
        salary: "20K-30K/月",
        skills: &["Node.js", "Express", "MongoDB", "Redis"],
        match_score: 88,
    },
    Sample {
        id: "job_3",
        name: "Vue.js 前端工程师",
        company: "美团点评",
        city: "北京",
        salary: "18K-28K/月",
        skills: &["Vue.js", "JavaScript", "Webpack"],
        match_score: 85,
    },
    Sample {
        id: "job_4",
        name: "Python 数据分析师",
        company: "字节跳动",
        city: "北京",
        salary: "22K-32K/月",
        skills: &["Python", "Pandas", "NumPy", "SQL"],
        match_score: 78,
    },
    Sample {
        id: "job_5",
        name: "全栈工程师",
        company: "小米集团",
        city: "北京",
        salary: "25K-40K/月",
        skills: &["React", "Node.js", "MySQL", "DevOps"],
        match_score: 90,
    },
    Sample {
        id: "job_6",
        name: "JavaScript 开发工程师",
        company: "京东集团",
        city: "北京",
        salary: "18K-26K/月",
        skills: &["JavaScript", "React", "CSS3", "HTML5"],
        match_score: 82,
    },
];

impl From<&Sample> for JobRecord {
    fn from(sample: &Sample) -> Self {
        JobRecord {
            id: sample.id.to_owned(),
            name: sample.name.to_owned(),
            company: sample.company.to_owned(),
            city: sample.city.to_owned(),
            salary: sample.salary.to_owned(),
            skills: sample.skills.iter().map(|s| s.to_string()).collect(),
            match_score: sample.match_score,
        }
    }
}

/// Whether a record passes the title, city and skill filters of `config`.
///
/// Skills use OR semantics: one configured skill found inside any of the
/// record's skills is enough. All comparisons are case-sensitive substring
/// matches.
pub fn matches(config: &FilterConfig, job: &JobRecord) -> bool {
    if !config.job_title.is_empty() && !job.name.contains(&config.job_title) {
        return false;
    }
    if let Some(city_name) = FALLBACK_CITY_NAMES.get(config.city.as_str()) {
        if !job.city.contains(city_name) {
            return false;
        }
    }
    if !config.skills.is_empty() {
        let has_matching_skill = config
            .skills
            .iter()
            .any(|skill| job.skills.iter().any(|job_skill| job_skill.contains(skill.as_str())));
        if !has_matching_skill {
            return false;
        }
    }
    true
}

pub fn filter(config: &FilterConfig, jobs: Vec<JobRecord>) -> Vec<JobRecord> {
    jobs.into_iter().filter(|job| matches(config, job)).collect()
}

pub fn sample_jobs() -> Vec<JobRecord> {
    SAMPLE_JOBS.iter().map(JobRecord::from).collect()
}

/// The sample catalog narrowed down by `config`.
pub fn generate(config: &FilterConfig) -> Vec<JobRecord> {
    filter(config, sample_jobs())
}
