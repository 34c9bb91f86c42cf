use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::types::PageData;

lazy_static! {
    static ref JOB_SELECTOR: Selector =
        Selector::parse(r#"[class*="job-card"], [class*="position"], [class*="job-list"] li"#)
            .unwrap();
    static ref TITLE_SELECTOR: Selector =
        Selector::parse(r#"h2, .position-name, [class*="title"]"#).unwrap();
    static ref COMPANY_SELECTOR: Selector =
        Selector::parse(r#".company, [class*="company"]"#).unwrap();
    static ref SALARY_SELECTOR: Selector =
        Selector::parse(r#".salary, [class*="salary"]"#).unwrap();
    static ref LOCATION_SELECTOR: Selector =
        Selector::parse(r#".city, [class*="location"]"#).unwrap();
}

fn first_text(el: &ElementRef, selector: &Selector) -> String {
    el.select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_owned())
        .unwrap_or_default()
}

/// Job entries visible on a rendered listing page, in document order.
/// Elements without a title are skipped.
pub fn extract_page_data(html: &str) -> Vec<PageData> {
    let doc = Html::parse_document(html);
    let jobs: Vec<PageData> = doc
        .select(&JOB_SELECTOR)
        .map(|el| PageData {
            title: first_text(&el, &TITLE_SELECTOR),
            company: first_text(&el, &COMPANY_SELECTOR),
            salary: first_text(&el, &SALARY_SELECTOR),
            location: first_text(&el, &LOCATION_SELECTOR),
        })
        .filter(|job| !job.title.is_empty())
        .collect();
    log::debug!("extracted {} jobs from page", jobs.len());
    jobs
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extract_job_cards() {
        let html = r#"
            <html><body>
            <ul class="jobs">
                <li class="job-card">
                    <h2> Rust 开发工程师 </h2>
                    <span class="company">某科技有限公司</span>
                    <span class="salary">20-40K</span>
                    <span class="city">北京·海淀区</span>
                </li>
                <li class="job-card">
                    <h2>Go 后端</h2>
                    <span class="salary">15-25K</span>
                </li>
                <li class="job-card"><span class="company">no title</span></li>
            </ul>
            </body></html>
        "#;
        let jobs = extract_page_data(html);
        assert_eq!(
            jobs,
            vec![
                PageData {
                    title: "Rust 开发工程师".to_owned(),
                    company: "某科技有限公司".to_owned(),
                    salary: "20-40K".to_owned(),
                    location: "北京·海淀区".to_owned(),
                },
                PageData {
                    title: "Go 后端".to_owned(),
                    company: String::new(),
                    salary: "15-25K".to_owned(),
                    location: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_job_list_items() {
        let html = r#"<div class="job-list-box"><li><div class="job-title">前端开发</div></li></div>"#;
        let jobs = extract_page_data(html);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "前端开发");
    }

    #[test]
    fn test_empty_page() {
        assert!(extract_page_data("<html><body><p>登录</p></body></html>").is_empty());
    }
}
