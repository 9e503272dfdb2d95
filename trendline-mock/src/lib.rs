//! Deterministic mock connector for tests and demos.
//!
//! `MockConnector` serves static fixtures and reacts to a few magic keywords:
//! `QUOTA` raises a quota error, `UNAVAILABLE` returns the portal's
//! "currently unavailable" page, `EMPTY` echoes a no-data payload and `FAIL`
//! produces a transport failure. The username `bad` is rejected at login.
//!
//! `DynamicMockConnector` defers every answer to a test-side controller and
//! records the calls it receives.
use async_trait::async_trait;
use trendline_core::connector::{EntityLookup, QueryTransport, SessionProvider, TrendsConnector};
use trendline_core::{Credentials, Entity, QueryParams, Session, TrendsError};

mod dynamic;
mod fixtures;

pub use dynamic::{CallLog, DynamicMockConnector, DynamicMockController, MockBehavior};

/// Domain reported by mock sessions.
pub const MOCK_DOMAIN: &str = "google.com";

/// Mock connector backed by static fixtures.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn maybe_fail(keyword: &str, capability: &'static str) -> Result<(), TrendsError> {
        match keyword {
            "QUOTA" => Err(TrendsError::quota(format!(
                "mock quota exhausted during {capability}"
            ))),
            "FAIL" => Err(TrendsError::connector(
                "trendline-mock",
                format!("forced failure: {capability}"),
            )),
            _ => Ok(()),
        }
    }
}

impl TrendsConnector for MockConnector {
    fn name(&self) -> &'static str {
        "trendline-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_session_provider(&self) -> Option<&dyn SessionProvider> {
        Some(self as &dyn SessionProvider)
    }

    fn as_query_transport(&self) -> Option<&dyn QueryTransport> {
        Some(self as &dyn QueryTransport)
    }

    fn as_entity_lookup(&self) -> Option<&dyn EntityLookup> {
        Some(self as &dyn EntityLookup)
    }
}

#[async_trait]
impl SessionProvider for MockConnector {
    async fn acquire(&self, credentials: &Credentials) -> Result<Session, TrendsError> {
        if credentials.username == "bad" {
            return Err(TrendsError::Auth(
                "portal rejected the mock credentials".into(),
            ));
        }
        Ok(Session::new(MOCK_DOMAIN)
            .with_cookie("SID", "mock-sid")
            .with_cookie("NID", "mock-nid")
            .with_cookie("I4SUserLocale", "en_US"))
    }
}

#[async_trait]
impl EntityLookup for MockConnector {
    async fn lookup(&self, keyword: &str, _session: &Session) -> Result<Vec<Entity>, TrendsError> {
        Self::maybe_fail(keyword, "lookup")?;
        Ok(fixtures::entities::by_keyword(keyword))
    }
}

#[async_trait]
impl QueryTransport for MockConnector {
    async fn fetch(&self, params: &QueryParams, _session: &Session) -> Result<String, TrendsError> {
        let topic = params.topics_param();
        Self::maybe_fail(&topic, "fetch")?;
        match topic.as_str() {
            "UNAVAILABLE" => Err(TrendsError::Unavailable(
                "mock report currently unavailable".into(),
            )),
            "EMPTY" => Ok(fixtures::payloads::no_interest(&topic, params.window)),
            _ => Ok(fixtures::payloads::interest(&topic, params.window)),
        }
    }
}
