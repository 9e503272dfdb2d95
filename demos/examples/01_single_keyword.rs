use chrono::NaiveDate;
use trendline::{KeywordQuery, MergedSeries, OutputSink, Trends, TrendsError};
use trendline_demos::common::{credentials, get_connector};

/// Prints a short summary instead of the full series.
struct Summary;

impl OutputSink for Summary {
    fn write(&mut self, query: &KeywordQuery, merged: &MergedSeries) -> Result<(), TrendsError> {
        let (Some(first), Some(last)) = (merged.series.first(), merged.series.last()) else {
            println!("{query}: no data");
            return Ok(());
        };
        println!(
            "{query}: {} days from {} to {}, rescaled={}",
            merged.series.len(),
            first.date,
            last.date,
            merged.rescaled
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let trends = Trends::builder().with_connector(get_connector()?).build()?;

    let filing = NaiveDate::from_ymd_opt(2014, 5, 17).ok_or("bad date")?;
    let keywords = ["Apple", "Goldman Sachs Securities", "Pizza Hut"]
        .into_iter()
        .map(|k| KeywordQuery::new(k).with_filing_date(filing));

    let report = trends.run(&credentials()?, keywords, &mut Summary).await?;
    for kw in &report.keywords {
        println!(
            "{} -> {} [{}], all-zero quarters: {}",
            kw.keyword, kw.topic, kw.descriptor, kw.all_zero_quarters
        );
    }
    Ok(())
}
