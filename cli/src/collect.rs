use futures::StreamExt;
use job_collector::{session::DEFAULT_REFRESH_PERIOD, JobRecord, Session};
use std::sync::Arc;
use std::time::Duration;

fn print_jobs(jobs: &[JobRecord]) {
    if jobs.is_empty() {
        println!("暂无职位数据");
        return;
    }
    for job in jobs {
        println!("{}", job);
    }
}

pub async fn collect(session: Session) -> crate::Result<()> {
    let stats = session.refresh().await?;
    print_jobs(&session.jobs());
    println!(
        "共 {} 个职位 | 来源: {} | 更新时间: {}",
        stats.total, stats.source, stats.last_update
    );
    Ok(())
}

/// Longest accepted watch period, one year.
const MAX_WATCH_MINUTES: u64 = 365 * 24 * 60;

/// Refresh period for `--minutes`, zero picks the default.
fn refresh_period(minutes: u64) -> Duration {
    if minutes == 0 {
        DEFAULT_REFRESH_PERIOD
    } else {
        Duration::from_secs(minutes.min(MAX_WATCH_MINUTES).saturating_mul(60))
    }
}

pub async fn watch(session: Session, minutes: u64) -> crate::Result<()> {
    let period = refresh_period(minutes);
    log::info!("Collecting every {:?}", period);
    let session = Arc::new(session);
    let updates = session.clone().refresh_every(period);
    tokio::pin!(updates);
    while let Some(result) = updates.next().await {
        match result {
            Ok(stats) => {
                print_jobs(&session.jobs());
                println!("共 {} 个职位 | 更新时间: {}", stats.total, stats.last_update);
            }
            Err(e) => log::error!("Scheduled collection failed: {}", e),
        }
    }
    Ok(())
}
