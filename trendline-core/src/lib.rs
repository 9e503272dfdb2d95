//! trendline-core
//!
//! Core traits and algorithms shared across the trendline workspace.
//!
//! - `connector`: the `TrendsConnector` trait and its capability traits
//!   (session acquisition, report export, entity lookup) plus the output sink.
//! - `matcher`: resolves free-text keywords to portal entities.
//! - `normalize`: turns raw export payloads into dated observations.
//! - `query`: plans query windows and encodes export parameters.
//! - `timeseries`: interpolation, zero smoothing, change multipliers, and the
//!   quarter/long-span merge.
//!
//! Async runtime
//! -------------
//! Connector traits are `async_trait` based and runtime agnostic; the
//! orchestrator and the portal connector run them on Tokio.
#![warn(missing_docs)]

/// Connector capability traits and the session handle.
pub mod connector;
/// Keyword to entity resolution.
pub mod matcher;
/// Export payload parsing.
pub mod normalize;
/// Query window planning and export parameters.
pub mod query;
/// Time-series reconciliation utilities.
pub mod timeseries;

pub use connector::{
    EntityLookup, OutputSink, QueryTransport, Session, SessionProvider, TrendsConnector,
};
pub use matcher::{EntityMatcher, partial_ratio};
pub use normalize::{
    ObservationRow, classify_response, normalize, normalize_first_column, normalize_window,
};
pub use query::{QueryParams, plan_quarters, window_around};
pub use timeseries::change::change_multipliers;
pub use timeseries::interpolate::{interpolate, interpolate_observations};
pub use timeseries::merge::{MergedSeries, merge_quarters, quarter_multipliers};
pub use timeseries::smooth::{smooth_values, smooth_zeros};
pub use trendline_types::*;
