use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::timeseries::merge::MergedSeries;
use crate::query::QueryParams;
use trendline_types::{Credentials, Entity, KeywordQuery, TrendsError};

/// Authenticated portal session: the resolved portal domain and its cookie set.
///
/// The orchestrator treats it as opaque; connectors decide what the cookies mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Portal domain the session was established against (e.g. `google.com.au`).
    pub domain: String,
    /// Cookie name to value.
    pub cookies: BTreeMap<String, String>,
}

impl Session {
    /// Build a session for `domain` with no cookies.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            cookies: BTreeMap::new(),
        }
    }

    /// Add or replace a cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Render the cookie set as a `Cookie` request header value.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Focused role trait for connectors that can establish a portal session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquire a session for `credentials`.
    ///
    /// # Errors
    /// Returns `TrendsError::Auth` when the credentials are rejected.
    async fn acquire(&self, credentials: &Credentials) -> Result<Session, TrendsError>;

    /// Release a session once the batch is finished. Default is a no-op.
    async fn release(&self, _session: Session) -> Result<(), TrendsError> {
        Ok(())
    }
}

/// Focused role trait for connectors that export interest-over-time reports.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Fetch the raw line-oriented export for `params`.
    ///
    /// # Errors
    /// `QuotaExceeded` when the portal rate-limits, `Unavailable` for its
    /// "currently unavailable" page, `Format` for any other unexpected content.
    async fn fetch(&self, params: &QueryParams, session: &Session) -> Result<String, TrendsError>;
}

/// Focused role trait for connectors that resolve keywords into candidate entities.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Look up candidate entities for a single keyword.
    ///
    /// Exactly one keyword per call: batching makes the portal report relative
    /// frequencies between the keywords.
    ///
    /// # Errors
    /// Returns `TrendsError::QuotaExceeded` when the response is not the expected JSON.
    async fn lookup(&self, keyword: &str, session: &Session) -> Result<Vec<Entity>, TrendsError>;
}

/// Consumer of finished series (file, stream, database...).
pub trait OutputSink {
    /// Accept the merged series produced for `query`.
    ///
    /// # Errors
    /// Implementations surface their own I/O failures as `TrendsError`.
    fn write(&mut self, query: &KeywordQuery, merged: &MergedSeries) -> Result<(), TrendsError>;
}

/// Primary connector interface. Capabilities are discovered via the `as_*` accessors.
pub trait TrendsConnector: Send + Sync {
    /// Stable connector name used in error messages.
    fn name(&self) -> &'static str;

    /// Human-readable vendor name.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Session acquisition capability, if supported.
    fn as_session_provider(&self) -> Option<&dyn SessionProvider> {
        None
    }

    /// Report export capability, if supported.
    fn as_query_transport(&self) -> Option<&dyn QueryTransport> {
        None
    }

    /// Entity lookup capability, if supported.
    fn as_entity_lookup(&self) -> Option<&dyn EntityLookup> {
        None
    }
}
