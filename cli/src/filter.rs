use clap::{Args, Subcommand};
use job_collector::options::{
    districts, label_for, OptionTable, CITY_OPTIONS, DEGREE_OPTIONS, EXPERIENCE_OPTIONS,
    JOB_REC_TYPE_OPTIONS, SALARY_OPTIONS,
};
use job_collector::query::build_query;
use job_collector::{FilterConfig, MultiSelect, Session, Website};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the stored filter and the query it produces
    Show {},
    /// Change filter fields, unspecified fields are kept
    Set(SetArgs),
    /// Restore the default filter
    Reset {},
}

#[derive(Args, Debug, Default)]
pub struct SetArgs {
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    district: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long = "type")]
    job_type: Option<String>,
    #[arg(long = "subtype")]
    job_sub_type: Option<String>,
    /// Salary band codes, comma separated; an empty value clears the selection
    #[arg(long, value_delimiter = ',')]
    salary: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',')]
    degree: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',')]
    rec_type: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',')]
    experience: Option<Vec<String>>,
    #[arg(long)]
    min_age: Option<u32>,
    #[arg(long)]
    max_age: Option<u32>,
    /// Expected monthly salary window in K, used for the match score
    #[arg(long)]
    min_salary: Option<u32>,
    #[arg(long)]
    max_salary: Option<u32>,
    #[arg(long)]
    add_skill: Vec<String>,
    #[arg(long)]
    remove_skill: Vec<String>,
}

fn checked_codes(
    field: &str,
    table: OptionTable,
    codes: Vec<String>,
) -> Result<Vec<String>, String> {
    let codes: Vec<String> = codes
        .into_iter()
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
        .collect();
    match codes.iter().find(|c| label_for(table, c).is_none()) {
        Some(unknown) => Err(format!("unknown {} code: {}", field, unknown)),
        None => Ok(codes),
    }
}

/// Apply `args` in dependency order: a city before its district, a category
/// before its type, a type before its subtype.
pub fn apply(config: &mut FilterConfig, args: SetArgs) -> Result<(), String> {
    if let Some(website) = args.website {
        config.website = Website::try_from(website.as_str())?;
    }
    if let Some(city) = args.city {
        config.set_city(city.trim());
    }
    if let Some(district) = args.district {
        let district = district.trim();
        let known = districts(&config.city);
        if !district.is_empty() && !known.is_empty() && label_for(known, district).is_none() {
            return Err(format!("unknown district {} for city {}", district, config.city));
        }
        config.district = district.to_owned();
    }
    if let Some(title) = args.title {
        config.job_title = title.trim().to_owned();
    }
    if let Some(category) = args.category {
        config.set_category(category.trim());
    }
    if let Some(job_type) = args.job_type {
        config.set_job_type(job_type.trim());
    }
    if let Some(sub_type) = args.job_sub_type {
        if !config.set_job_sub_type(sub_type.trim()) {
            return Err("a job subtype needs a job type".to_owned());
        }
    }
    let selections = [
        (MultiSelect::Salary, "salary", SALARY_OPTIONS, args.salary),
        (MultiSelect::Degree, "degree", DEGREE_OPTIONS, args.degree),
        (MultiSelect::JobRecType, "rec-type", JOB_REC_TYPE_OPTIONS, args.rec_type),
        (MultiSelect::Experience, "experience", EXPERIENCE_OPTIONS, args.experience),
    ];
    for (field, name, table, codes) in selections {
        if let Some(codes) = codes {
            config.set_selection(field, checked_codes(name, table, codes)?);
        }
    }
    if let Some(age) = args.min_age {
        config.set_min_age(age);
    }
    if let Some(age) = args.max_age {
        config.set_max_age(age);
    }
    if args.min_salary.is_some() || args.max_salary.is_some() {
        config.set_salary_window(
            args.min_salary.or(config.min_salary),
            args.max_salary.or(config.max_salary),
        );
    }
    for skill in &args.remove_skill {
        if !config.remove_skill(skill.trim()) {
            log::warn!("Skill {} was not selected", skill);
        }
    }
    for skill in &args.add_skill {
        if !config.add_skill(skill) {
            log::warn!("Skipping blank or duplicate skill '{}'", skill);
        }
    }
    Ok(())
}

fn labels(table: OptionTable, codes: &[String]) -> String {
    codes
        .iter()
        .map(|c| label_for(table, c).unwrap_or(c.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn show(config: &FilterConfig) {
    let city = label_for(CITY_OPTIONS, &config.city).unwrap_or(config.city.as_str());
    println!("网站: {}", config.website);
    println!("城市: {} ({})", city, config.city);
    if !config.district.is_empty() {
        let district = label_for(districts(&config.city), &config.district)
            .unwrap_or(config.district.as_str());
        println!("区域: {}", district);
    }
    println!("职位: {}", config.job_title);
    println!(
        "职位类别: {} / {} / {}",
        config.job_category, config.job_type, config.job_sub_type
    );
    println!("薪资: {}", labels(SALARY_OPTIONS, &config.salary));
    println!("学历: {}", labels(DEGREE_OPTIONS, &config.degree));
    println!("求职类型: {}", labels(JOB_REC_TYPE_OPTIONS, &config.job_rec_type));
    println!("经验: {}", labels(EXPERIENCE_OPTIONS, &config.experience));
    println!("年龄: {}-{}", config.min_age, config.max_age);
    if let (Some(min), Some(max)) = (config.min_salary, config.max_salary) {
        println!("期望薪资: {}-{}K", min, max);
    }
    println!("技能: {}", config.skills.join(", "));
    println!("查询: {}", build_query(config));
}

pub async fn run(session: Session, command: ConfigCommand) -> crate::Result<()> {
    match command {
        ConfigCommand::Show {} => show(&session.config()),
        ConfigCommand::Set(args) => {
            let mut config = session.config();
            apply(&mut config, args)?;
            let config = session.replace_config(config).await?;
            log::info!("Filter config saved");
            show(&config);
        }
        ConfigCommand::Reset {} => {
            let config = session.replace_config(FilterConfig::default()).await?;
            show(&config);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_apply_in_dependency_order() {
        let mut config = FilterConfig::default();
        let args = SetArgs {
            city: Some("101020100".to_owned()),
            district: Some("2".to_owned()),
            category: Some("1010000".to_owned()),
            job_type: Some("1000020".to_owned()),
            job_sub_type: Some("100101".to_owned()),
            salary: Some(vec!["405".to_owned(), "406".to_owned(), "405".to_owned()]),
            add_skill: vec!["Rust".to_owned(), "React".to_owned()],
            remove_skill: vec!["Vue".to_owned()],
            min_age: Some(40),
            ..Default::default()
        };
        apply(&mut config, args).unwrap();
        assert_eq!(config.city, "101020100");
        assert_eq!(config.district, "2");
        assert_eq!(config.job_type, "1000020");
        assert_eq!(config.job_sub_type, "100101");
        assert_eq!(config.salary, vec!["405", "406"]);
        assert_eq!(config.skills, vec!["React", "Node.js", "Rust"]);
        assert_eq!((config.min_age, config.max_age), (40, 40));
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = FilterConfig::default();
        let bad_code = SetArgs {
            degree: Some(vec!["999".to_owned()]),
            ..Default::default()
        };
        assert!(apply(&mut config, bad_code).is_err());
        let orphan_subtype = SetArgs {
            job_sub_type: Some("100101".to_owned()),
            ..Default::default()
        };
        assert!(apply(&mut config, orphan_subtype).is_err());
        let bad_site = SetArgs {
            website: Some("monster".to_owned()),
            ..Default::default()
        };
        assert!(apply(&mut config, bad_site).is_err());
    }

    #[test]
    fn test_empty_selection_clears() {
        let mut config = FilterConfig::default();
        config.toggle(MultiSelect::Experience, "104");
        let args = SetArgs {
            experience: Some(vec![String::new()]),
            ..Default::default()
        };
        apply(&mut config, args).unwrap();
        assert!(config.experience.is_empty());
    }
}
