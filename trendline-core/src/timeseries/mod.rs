//! Time-series reconciliation.
//!
//! Modules include:
//! - `interpolate`: densify irregular samples to one point per day
//! - `smooth`: remove zero gaps ahead of ratio/log computations
//! - `change`: day-over-day log-scaled change multipliers
//! - `merge`: rescale a long-span series by quarter-window dynamics
/// Linear interpolation to daily resolution.
pub mod interpolate;
/// Merge of the long-span anchor with fine-grained quarter windows.
pub mod merge;
/// Zero-gap smoothing.
pub mod smooth;
/// Change multipliers between consecutive days.
pub mod change;
