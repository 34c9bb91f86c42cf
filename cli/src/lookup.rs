use job_collector::options::{
    districts, OptionTable, TaxonomyNode, CITY_OPTIONS, DEGREE_OPTIONS, EXPERIENCE_OPTIONS,
    JOB_REC_TYPE_OPTIONS, SALARY_OPTIONS,
};
use job_collector::page::extract_page_data;
use job_collector::{Collector, Settings, SettingsError, Website};
use std::path::Path;

fn print_table(title: &str, table: OptionTable) {
    println!("{}:", title);
    for (code, label) in table {
        println!("  {:<10} {}", code, label);
    }
}

pub fn options() {
    println!("网站:");
    for site in Website::ALL {
        let live = if site.is_live() { "" } else { " (示例数据)" };
        println!("  {:<10} {}{}", site.code(), site.label(), live);
    }
    print_table("城市", CITY_OPTIONS);
    for (code, name) in CITY_OPTIONS {
        let table = districts(code);
        if !table.is_empty() {
            print_table(&format!("{} 区域", name), table);
        }
    }
    print_table("薪资", SALARY_OPTIONS);
    print_table("学历", DEGREE_OPTIONS);
    print_table("求职类型", JOB_REC_TYPE_OPTIONS);
    print_table("经验", EXPERIENCE_OPTIONS);
}

pub async fn cities(collector: &Collector) {
    for city in collector.cities().await {
        println!("{:<10} {}", city.code, city.name);
    }
}

fn print_node(node: &TaxonomyNode, depth: usize) {
    println!("{}{:<8} {}", "  ".repeat(depth), node.code, node.name);
    for child in node.children() {
        print_node(child, depth + 1);
    }
}

/// City of the stored filter. Reads only, nothing is written on first use.
pub async fn stored_city(settings: &Settings) -> Result<String, SettingsError> {
    let config = settings.load_filter_config().await?.unwrap_or_default();
    Ok(config.city)
}

pub async fn positions(collector: &Collector, city: &str) {
    for category in collector.taxonomy(city).await {
        print_node(&category, 0);
    }
}

pub async fn page_data(file: &Path) -> crate::Result<()> {
    let html = tokio::fs::read_to_string(file).await?;
    let jobs = extract_page_data(&html);
    log::info!("Extracted {} jobs from {}", jobs.len(), file.display());
    println!("{}", serde_json::to_string_pretty(&jobs)?);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use job_collector::settings::{MemorySettingsStore, SettingsStore, FILTER_CONFIG_KEY};
    use job_collector::FilterConfig;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stored_city_leaves_store_untouched() {
        let store = Arc::new(MemorySettingsStore::new());
        let settings = Settings::new(store.clone());
        let city = stored_city(&settings).await.unwrap();
        assert_eq!(city, FilterConfig::default().city);
        assert_eq!(store.get(FILTER_CONFIG_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stored_city_reads_saved_filter() {
        let settings = Settings::in_memory();
        let mut config = FilterConfig::default();
        config.set_city("101280100");
        settings.save_filter_config(&config).await.unwrap();
        assert_eq!(stored_city(&settings).await.unwrap(), "101280100");
    }
}
