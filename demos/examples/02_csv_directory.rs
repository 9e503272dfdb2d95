use std::time::Duration;

use trendline::{CsvDirSink, KeywordQuery, Throttle, Trends, TrendsError};
use trendline_demos::common::{credentials, get_connector, use_mock};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    // Keywords from the command line, or a default pair.
    let mut words: Vec<String> = std::env::args().skip(1).collect();
    if words.is_empty() {
        words = vec!["Apple".into(), "Tesla".into()];
    }

    let throttle = if use_mock() {
        Throttle::None
    } else {
        Throttle::random_default()
    };
    let trends = Trends::builder()
        .with_connector(get_connector()?)
        .throttle(throttle)
        .category("0-7-107")
        .quota_cooldown(Duration::from_secs(3600))
        .build()?;

    let dir = std::env::temp_dir().join("trendline-out");
    std::fs::create_dir_all(&dir)?;
    let mut sink = CsvDirSink::new(&dir).with_category("0-7-107");

    match trends
        .run(&credentials()?, words.into_iter().map(KeywordQuery::new), &mut sink)
        .await
    {
        Ok(report) => println!("missing quarters per keyword: {:?}", report.missing_quarters()),
        Err(e @ TrendsError::QuotaExceeded { .. }) => println!("stopped early: {e}"),
        Err(e) => return Err(e.into()),
    }
    for path in sink.written() {
        println!("wrote {}", path.display());
    }
    Ok(())
}
