use chrono::{Months, NaiveDate, Utc};
use trendline_core::connector::QueryTransport;
use trendline_core::{
    Credentials, DateWindow, KeywordQuery, KeywordReport, MergedSeries, Observation, OutputSink,
    QuarterWindow, QueryParams, RunReport, Session, TrendsError, merge_quarters,
    normalize_window, plan_quarters, window_around,
};

use crate::batch::KeywordBatcher;
use crate::core::Trends;

/// Readings of one window plus whether they are a placeholder.
struct WindowFetch {
    observations: Vec<Observation>,
    unavailable: bool,
}

impl Trends {
    /// Run the pipeline for every keyword in `keywords`, writing each merged
    /// series to `sink`.
    ///
    /// One session is acquired for the run and released before returning,
    /// whatever the outcome.
    ///
    /// # Errors
    /// - `Auth` when the session cannot be acquired.
    /// - `QuotaExceeded` when the portal refuses further calls; keywords
    ///   already handed to the sink stay there.
    /// - `Format`, `Data`, `Connector`, or `Sink` errors from any keyword.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendline::run",
            skip(self, credentials, keywords, sink),
            fields(connector = self.connector.name()),
        )
    )]
    pub async fn run<K>(
        &self,
        credentials: &Credentials,
        keywords: K,
        sink: &mut dyn OutputSink,
    ) -> Result<RunReport, TrendsError>
    where
        K: IntoIterator<Item = KeywordQuery>,
    {
        let sessions = self
            .connector
            .as_session_provider()
            .ok_or_else(|| TrendsError::unsupported("session"))?;
        let session = sessions.acquire(credentials).await?;
        #[cfg(feature = "tracing")]
        tracing::info!(domain = %session.domain, "session acquired");

        let outcome = self.run_batches(&session, keywords, sink).await;
        let released = sessions.release(session).await;
        #[cfg(feature = "tracing")]
        tracing::info!(ok = released.is_ok(), "session released");

        let report = outcome?;
        released?;
        Ok(report)
    }

    async fn run_batches<K>(
        &self,
        session: &Session,
        keywords: K,
        sink: &mut dyn OutputSink,
    ) -> Result<RunReport, TrendsError>
    where
        K: IntoIterator<Item = KeywordQuery>,
    {
        let mut batcher = KeywordBatcher::new(keywords);
        let mut report = RunReport::default();
        loop {
            let batch = match batcher.next_batch() {
                Ok(b) => b,
                Err(e) if e.is_end_of_input() => break,
                Err(e) => return Err(e),
            };
            for query in batch {
                let (query, merged, kw) = self.process_keyword(session, query).await?;
                sink.write(&query, &merged)?;
                report.keywords.push(kw);
            }
        }
        Ok(report)
    }

    /// Resolve, query, and merge a single keyword.
    ///
    /// # Errors
    /// Propagates every connector error except windows reported unavailable.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendline::keyword",
            skip(self, session, query),
            fields(keyword = %query.raw_text),
        )
    )]
    pub async fn process_keyword(
        &self,
        session: &Session,
        query: KeywordQuery,
    ) -> Result<(KeywordQuery, MergedSeries, KeywordReport), TrendsError> {
        let query = match self.connector.as_entity_lookup() {
            Some(lookup) => self.matcher.resolve(lookup, session, query).await?,
            None => query,
        };
        #[cfg(feature = "tracing")]
        tracing::info!(entity = %query, "querying");

        let transport = self
            .connector
            .as_query_transport()
            .ok_or_else(|| TrendsError::unsupported("fetch"))?;
        let span = self.span_for(&query)?;
        let category = self.cfg.category.as_deref();

        let long = self
            .fetch_window(transport, session, &query, span, category)
            .await?;
        let mut unavailable_windows = usize::from(long.unavailable);

        let mut quarters = Vec::new();
        for window in plan_quarters(span, self.cfg.window.quarter_months)? {
            let fetched = self
                .fetch_window(transport, session, &query, window, category)
                .await?;
            unavailable_windows += usize::from(fetched.unavailable);
            let quarter = QuarterWindow::new(window, fetched.observations);
            #[cfg(feature = "tracing")]
            if quarter.is_all_zero {
                tracing::debug!(start = %window.start(), end = %window.end(), "all-zero quarter");
            }
            quarters.push(quarter);
        }

        let merged = merge_quarters(&long.observations, &quarters)?;
        let report = KeywordReport {
            keyword: query.raw_text.clone(),
            topic: query.topic().to_string(),
            descriptor: query.descriptor().to_string(),
            points: merged.series.len(),
            all_zero_quarters: merged.all_zero_quarters,
            unavailable_windows,
        };
        Ok((query, merged, report))
    }

    async fn fetch_window(
        &self,
        transport: &dyn QueryTransport,
        session: &Session,
        query: &KeywordQuery,
        window: DateWindow,
        category: Option<&str>,
    ) -> Result<WindowFetch, TrendsError> {
        let params = QueryParams::for_query(query, window, category);
        match transport.fetch(&params, session).await {
            Ok(body) => Ok(WindowFetch {
                observations: normalize_window(&body, window)?,
                unavailable: false,
            }),
            Err(e) if e.is_recoverable_window() => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    date = %params.date_param(),
                    error = %e,
                    "window unavailable; substituting zero interest"
                );
                Ok(WindowFetch {
                    observations: QuarterWindow::zero_filled(window).observations,
                    unavailable: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Long query span for `query`.
    ///
    /// Centred on the filing date, else on the configured anchor date, else it
    /// ends at the start of the current month.
    pub(crate) fn span_for(&self, query: &KeywordQuery) -> Result<DateWindow, TrendsError> {
        let offset = self.cfg.window.offset_months;
        let anchor = match query.filing_date.or(self.anchor) {
            Some(date) => date,
            None => trailing_anchor(Utc::now().date_naive(), offset)?,
        };
        window_around(anchor, offset)
    }
}

fn trailing_anchor(today: NaiveDate, offset_months: u32) -> Result<NaiveDate, TrendsError> {
    today
        .checked_sub_months(Months::new(offset_months))
        .ok_or_else(|| TrendsError::InvalidArg(format!("date out of range: {today}")))
}
