use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the trendline workspace.
///
/// Covers portal quota exhaustion, payload format anomalies, session failures,
/// connector-tagged transport errors, and the normal end-of-input signal used by
/// keyword sources.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrendsError {
    /// The portal's rate limit or daily quota has been reached.
    ///
    /// Fatal for the current session: the outer keyword loop must stop.
    #[error("quota exceeded: {message}")]
    QuotaExceeded {
        /// Human-readable detail, usually derived from the portal response.
        message: String,
    },

    /// Unexpected payload shape, unparseable label, or unknown content type.
    #[error("format error: {0}")]
    Format(String),

    /// The portal answered with its "currently unavailable" page for a window.
    ///
    /// This is a format anomaly that callers may degrade to zero interest.
    #[error("data currently unavailable: {0}")]
    Unavailable(String),

    /// Session acquisition failed (credentials rejected or cookies missing).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The keyword source is exhausted. Signals normal loop termination.
    #[error("no more keywords")]
    NoMoreKeywords,

    /// A series invariant was violated (ordering, duplicates, empty input).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The output sink could not persist a series.
    #[error("output sink failed: {0}")]
    Sink(String),

    /// An individual connector failed at the transport level.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "lookup").
        capability: String,
    },
}

impl TrendsError {
    /// Helper: build a `QuotaExceeded` error with a message.
    pub fn quota(message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            message: message.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// True when the whole session is no longer usable and the batch must halt.
    #[must_use]
    pub const fn is_session_fatal(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. } | Self::Auth(_))
    }

    /// True when a single query window may be replaced by a zero-interest placeholder.
    #[must_use]
    pub const fn is_recoverable_window(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// True for the end-of-input signal raised by keyword sources.
    #[must_use]
    pub const fn is_end_of_input(&self) -> bool {
        matches!(self, Self::NoMoreKeywords)
    }
}
