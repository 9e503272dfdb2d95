use chrono::NaiveDate;
use trendline::{CsvSink, KeywordQuery, Trends};
use trendline_demos::common::{credentials, get_connector};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,trendline=trace,trendline_portal=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let trends = Trends::builder().with_connector(get_connector()?).build()?;

    let filing = NaiveDate::from_ymd_opt(2014, 5, 17).ok_or("bad date")?;
    let keywords = [KeywordQuery::new("Apple").with_filing_date(filing)];

    let mut sink = CsvSink::new(std::io::stdout());
    let report = trends.run(&credentials()?, keywords, &mut sink).await?;
    sink.into_inner()?;

    tracing::info!(keywords = report.keywords.len(), "done");
    Ok(())
}
