//! Static code tables used to build filters and to label them for display.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type OptionTable = &'static [(&'static str, &'static str)];

pub const SALARY_OPTIONS: OptionTable = &[
    ("402", "3K以下"),
    ("403", "3-5K"),
    ("404", "5-10K"),
    ("405", "10-20K"),
    ("406", "20-50K"),
    ("407", "50K以上"),
];

pub const DEGREE_OPTIONS: OptionTable = &[
    ("209", "初中及以下"),
    ("208", "中专/中技"),
    ("206", "高中"),
    ("202", "大专"),
    ("203", "本科"),
    ("204", "硕士"),
    ("205", "博士"),
];

pub const JOB_REC_TYPE_OPTIONS: OptionTable = &[("0", "不限"), ("1901", "全职"), ("1903", "兼职")];

pub const EXPERIENCE_OPTIONS: OptionTable = &[
    ("0", "不限"),
    ("108", "在校生"),
    ("102", "应届生"),
    ("101", "经验不限"),
    ("103", "1年以内"),
    ("104", "1-3年"),
    ("105", "3-5年"),
    ("106", "5-10年"),
    ("107", "10年以上"),
];

pub const CITY_OPTIONS: OptionTable = &[
    ("101010100", "北京"),
    ("101020100", "上海"),
    ("101210100", "深圳"),
    ("101280100", "杭州"),
    ("101190400", "南京"),
];

pub fn label_for(table: OptionTable, code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(value, _)| *value == code)
        .map(|(_, label)| *label)
}

/// Districts selectable for a city, empty for cities without a district list.
pub fn districts(city: &str) -> OptionTable {
    match city {
        "101010100" => &[
            ("1", "朝阳区"),
            ("2", "海淀区"),
            ("3", "东城区"),
            ("4", "西城区"),
            ("5", "丰台区"),
        ],
        "101020100" => &[
            ("1", "浦东新区"),
            ("2", "静安区"),
            ("3", "黄浦区"),
            ("4", "长宁区"),
        ],
        "101210100" => &[
            ("1", "南山区"),
            ("2", "福田区"),
            ("3", "罗湖区"),
            ("4", "龙华区"),
        ],
        _ => &[],
    }
}

lazy_static! {
    /// City names the sample catalog can be filtered by. Codes outside this
    /// map leave the sample catalog unfiltered by city.
    pub static ref FALLBACK_CITY_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("101010100", "北京"),
        ("101020100", "上海"),
        ("101210100", "深圳"),
        ("101280100", "杭州"),
    ]);
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CityOption {
    pub name: String,
    pub code: u64,
    #[serde(default)]
    pub url: String,
}

impl CityOption {
    fn new(name: &str, code: u64, url: &str) -> Self {
        Self {
            name: name.to_owned(),
            code,
            url: url.to_owned(),
        }
    }
}

pub fn default_cities() -> Vec<CityOption> {
    vec![
        CityOption::new("全国", 100010000, "/?city=100010000"),
        CityOption::new("北京", 101010100, "/beijing/"),
        CityOption::new("上海", 101020100, "/shanghai/"),
        CityOption::new("深圳", 101210100, "/shenzhen/"),
        CityOption::new("杭州", 101280100, "/hangzhou/"),
        CityOption::new("南京", 101190400, "/nanjing/"),
    ]
}

/// One level of the category -> type -> subtype job taxonomy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyNode {
    pub code: u64,
    pub name: String,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub sub_level_model_list: Option<Vec<TaxonomyNode>>,
}

impl TaxonomyNode {
    fn branch(code: u64, name: &str, children: Vec<TaxonomyNode>) -> Self {
        Self {
            code,
            name: name.to_owned(),
            tip: None,
            sub_level_model_list: Some(children),
        }
    }

    fn leaf(code: u64, name: &str) -> Self {
        Self {
            code,
            name: name.to_owned(),
            tip: None,
            sub_level_model_list: None,
        }
    }

    pub fn children(&self) -> &[TaxonomyNode] {
        self.sub_level_model_list.as_deref().unwrap_or(&[])
    }

    pub fn child(&self, code: &str) -> Option<&TaxonomyNode> {
        self.children().iter().find(|n| n.code.to_string() == code)
    }
}

pub fn default_taxonomy() -> Vec<TaxonomyNode> {
    vec![TaxonomyNode::branch(
        1010000,
        "互联网/AI",
        vec![
            TaxonomyNode::branch(
                1000020,
                "后端开发",
                vec![
                    TaxonomyNode::leaf(100101, "Java"),
                    TaxonomyNode::leaf(100109, "Python"),
                    TaxonomyNode::leaf(100116, "Golang"),
                ],
            ),
            TaxonomyNode::branch(
                1000030,
                "前端/移动开发",
                vec![
                    TaxonomyNode::leaf(100901, "前端开发工程师"),
                    TaxonomyNode::leaf(100202, "Android"),
                    TaxonomyNode::leaf(100203, "iOS"),
                ],
            ),
        ],
    )]
}

pub fn find_category<'a>(tree: &'a [TaxonomyNode], code: &str) -> Option<&'a TaxonomyNode> {
    tree.iter().find(|n| n.code.to_string() == code)
}

/// Types selectable under a category, empty when nothing is selected.
pub fn job_types<'a>(tree: &'a [TaxonomyNode], category: &str) -> &'a [TaxonomyNode] {
    find_category(tree, category)
        .map(TaxonomyNode::children)
        .unwrap_or(&[])
}

pub fn job_sub_types<'a>(
    tree: &'a [TaxonomyNode],
    category: &str,
    job_type: &str,
) -> &'a [TaxonomyNode] {
    find_category(tree, category)
        .and_then(|c| c.child(job_type))
        .map(TaxonomyNode::children)
        .unwrap_or(&[])
}
