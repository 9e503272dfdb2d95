//! Trendline-specific value objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod entity;
mod error;
mod reports;
mod series;

pub use config::{
    Credentials, DEFAULT_BACKUP_TYPES, DEFAULT_PRIMARY_TYPES, MatcherConfig, Throttle,
    TrendsConfig, WindowConfig,
};
pub use entity::{Entity, KeywordQuery, SEARCH_TERM_DESCRIPTOR};
pub use error::TrendsError;
pub use reports::{KeywordReport, RunReport};
pub use series::{ChangeMultiplier, DateWindow, Observation, Point, QuarterWindow, Series};
