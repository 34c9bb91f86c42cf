use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Recruitment sites a `FilterConfig` can target.
/// Only `Boss` has a live data source, the others are served from samples.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Website {
    #[default]
    #[serde(rename = "boss")]
    Boss,
    #[serde(rename = "liepin")]
    Liepin,
    #[serde(rename = "51job")]
    Job51,
    #[serde(rename = "zhaopin")]
    Zhaopin,
    #[serde(rename = "maimengaoping")]
    Maimai,
}

impl Website {
    pub const ALL: [Website; 5] = [
        Website::Boss,
        Website::Liepin,
        Website::Job51,
        Website::Zhaopin,
        Website::Maimai,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Website::Boss => "boss",
            Website::Liepin => "liepin",
            Website::Job51 => "51job",
            Website::Zhaopin => "zhaopin",
            Website::Maimai => "maimengaoping",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Website::Boss => "BOSS直聘",
            Website::Liepin => "猎聘",
            Website::Job51 => "51Job",
            Website::Zhaopin => "智联招聘",
            Website::Maimai => "脉脉高聘",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Website::Boss)
    }
}

impl TryFrom<&str> for Website {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim().to_lowercase();
        Website::ALL
            .into_iter()
            .find(|site| site.code() == s)
            .ok_or_else(|| format!("unknown website: {}", s))
    }
}

impl Display for Website {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Search criteria chosen by the user.
///
/// Serialized with the same camelCase keys the settings blob has always used,
/// so a stored config survives a reload unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    pub website: Website,
    pub city: String,
    pub district: String,
    pub job_title: String,
    pub job_category: String,
    pub job_type: String,
    pub job_sub_type: String,
    pub salary: Vec<String>,
    pub degree: Vec<String>,
    pub job_rec_type: Vec<String>,
    pub experience: Vec<String>,
    pub min_age: u32,
    pub max_age: u32,
    pub skills: Vec<String>,
    /// Expected monthly salary window in K, only consulted by the match score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<u32>,
}

pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 65;

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            website: Website::Boss,
            city: "101010100".to_owned(),
            district: String::new(),
            job_title: String::new(),
            job_category: String::new(),
            job_type: String::new(),
            job_sub_type: String::new(),
            salary: Vec::new(),
            degree: Vec::new(),
            job_rec_type: Vec::new(),
            experience: Vec::new(),
            min_age: 25,
            max_age: 35,
            skills: vec!["React".to_owned(), "Vue".to_owned(), "Node.js".to_owned()],
            min_salary: None,
            max_salary: None,
        }
    }
}

/// The multi-select fields of a `FilterConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiSelect {
    Salary,
    Degree,
    JobRecType,
    Experience,
}

impl FilterConfig {
    /// District and taxonomy are scoped to a city, so both reset on change.
    pub fn set_city(&mut self, city: impl Into<String>) {
        let city = city.into();
        if city == self.city {
            return;
        }
        self.city = city;
        self.district.clear();
        self.job_type.clear();
        self.job_sub_type.clear();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if category == self.job_category {
            return;
        }
        self.job_category = category;
        self.job_type.clear();
        self.job_sub_type.clear();
    }

    pub fn set_job_type(&mut self, job_type: impl Into<String>) {
        let job_type = job_type.into();
        if job_type == self.job_type {
            return;
        }
        self.job_type = job_type;
        self.job_sub_type.clear();
    }

    /// A subtype only makes sense below a selected type; ignored otherwise.
    pub fn set_job_sub_type(&mut self, sub_type: impl Into<String>) -> bool {
        if self.job_type.is_empty() {
            return false;
        }
        self.job_sub_type = sub_type.into();
        true
    }

    /// Ages are clamped into `[MIN_AGE, MAX_AGE]` and the opposite bound is
    /// dragged along so `min_age <= max_age` always holds.
    pub fn set_min_age(&mut self, age: u32) {
        self.min_age = age.clamp(MIN_AGE, MAX_AGE);
        if self.max_age < self.min_age {
            self.max_age = self.min_age;
        }
    }

    pub fn set_max_age(&mut self, age: u32) {
        self.max_age = age.clamp(MIN_AGE, MAX_AGE);
        if self.min_age > self.max_age {
            self.min_age = self.max_age;
        }
    }

    /// Returns false when the skill is blank or already present.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_owned());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|s| s != skill);
        before != self.skills.len()
    }

    pub fn selection(&self, field: MultiSelect) -> &[String] {
        match field {
            MultiSelect::Salary => &self.salary,
            MultiSelect::Degree => &self.degree,
            MultiSelect::JobRecType => &self.job_rec_type,
            MultiSelect::Experience => &self.experience,
        }
    }

    fn selection_mut(&mut self, field: MultiSelect) -> &mut Vec<String> {
        match field {
            MultiSelect::Salary => &mut self.salary,
            MultiSelect::Degree => &mut self.degree,
            MultiSelect::JobRecType => &mut self.job_rec_type,
            MultiSelect::Experience => &mut self.experience,
        }
    }

    /// Adds the code if missing, removes it otherwise.
    /// Returns whether the code is selected afterwards.
    pub fn toggle(&mut self, field: MultiSelect, code: &str) -> bool {
        let codes = self.selection_mut(field);
        if let Some(pos) = codes.iter().position(|c| c == code) {
            codes.remove(pos);
            false
        } else {
            codes.push(code.to_owned());
            true
        }
    }

    /// Replaces a selection, dropping duplicates while keeping first-seen order.
    pub fn set_selection<I, S>(&mut self, field: MultiSelect, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = self.selection_mut(field);
        target.clear();
        for code in codes {
            let code = code.into();
            if !target.contains(&code) {
                target.push(code);
            }
        }
    }

    pub fn set_salary_window(&mut self, min: Option<u32>, max: Option<u32>) {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => {
                self.min_salary = Some(hi);
                self.max_salary = Some(lo);
            }
            _ => {
                self.min_salary = min;
                self.max_salary = max;
            }
        }
    }
}

/// A normalized job posting, produced either from upstream data or from the sample catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub name: String,
    pub company: String,
    pub city: String,
    pub salary: String,
    pub skills: Vec<String>,
    pub match_score: u8,
}

pub const DISPLAYED_SKILLS: usize = 3;

impl JobRecord {
    /// First few skills for display and how many were left out.
    pub fn skill_badges(&self) -> (&[String], usize) {
        let shown = self.skills.len().min(DISPLAYED_SKILLS);
        (&self.skills[..shown], self.skills.len() - shown)
    }
}

impl Display for JobRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (badges, rest) = self.skill_badges();
        write!(
            f,
            "{} | {} | {} | {} | 匹配度: {}% | {}",
            self.name,
            self.company,
            self.salary,
            self.city,
            self.match_score,
            badges.join(", ")
        )?;
        if rest > 0 {
            write!(f, " +{}", rest)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total: usize,
    pub last_update: String,
    pub source: String,
}

impl CollectionStats {
    pub fn new(total: usize, source: Website) -> Self {
        Self {
            total,
            last_update: Local::now().format("%Y/%-m/%-d %H:%M:%S").to_string(),
            source: source.label().to_owned(),
        }
    }

    pub fn empty(source: Website) -> Self {
        Self {
            total: 0,
            last_update: String::new(),
            source: source.label().to_owned(),
        }
    }
}

/// A job entry scraped from a rendered listing page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PageData {
    pub title: String,
    pub company: String,
    pub salary: String,
    pub location: String,
}
