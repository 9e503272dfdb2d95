//! trendline-middleware
//!
//! Wrappers that sit between the orchestrator and a raw connector:
//! [`ThrottledConnector`] spaces out portal calls and [`QuotaBlacklist`]
//! fails fast once the portal has reported quota exhaustion.
//! [`ConnectorBuilder`] composes them in the conventional order.

mod blacklist;
mod builder;
mod throttle;

pub use crate::blacklist::QuotaBlacklist;
pub use crate::builder::ConnectorBuilder;
pub use crate::throttle::{ThrottledConnector, throttle_delay};
