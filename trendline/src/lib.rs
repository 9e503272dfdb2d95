//! trendline reconstructs long, daily search-interest series for a list of keywords.
//!
//! Overview
//! - Acquires one portal session per run and releases it on every exit path.
//! - Resolves each keyword to a portal entity (when the connector can look
//!   entities up) so the query targets a topic rather than a literal string.
//! - Queries a long span around the keyword's filing date, then the same span
//!   in quarter windows, and rescales the long span by the quarters' daily
//!   dynamics.
//! - Hands each merged series to an [`OutputSink`] and returns a [`RunReport`].
//!
//! Key behaviors
//! - Keywords are processed strictly one at a time: the portal rescales every
//!   request to 0-100, so batching keywords would yield relative frequencies.
//! - A quota error from any call ends the whole run; the session is still released.
//! - A window the portal reports as unavailable is replaced by a zero-interest
//!   placeholder and counted in the keyword's report.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use trendline::{CsvSink, Trends};
//! use trendline_core::{Credentials, KeywordQuery, Throttle};
//!
//! let trends = Trends::builder()
//!     .with_connector(Arc::new(my_connector))
//!     .throttle(Throttle::random_default())
//!     .build()?;
//! let mut sink = CsvSink::new(std::io::stdout());
//! let report = trends
//!     .run(&Credentials::new("user", "pass"), [KeywordQuery::new("Apple")], &mut sink)
//!     .await?;
//! ```
#![warn(missing_docs)]

mod batch;
mod core;
mod pipeline;
mod sink;

pub use crate::batch::{KEYWORDS_PER_REQUEST, KeywordBatcher};
pub use crate::core::{Trends, TrendsBuilder};
pub use crate::sink::{CsvDirSink, CsvSink, csv_file_name};

pub use trendline_core::{
    Credentials, KeywordQuery, KeywordReport, MatcherConfig, MergedSeries, OutputSink, RunReport,
    Throttle, TrendsConfig, TrendsError, WindowConfig,
};
