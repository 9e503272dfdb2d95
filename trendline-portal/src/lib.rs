//! trendline-portal
//!
//! Connector for the search-interest web portal, built on `reqwest`.
//! Provides all three capabilities: session acquisition (password login
//! emulation by default, or a pre-established [`StaticSession`]), report
//! export, and entity lookup.
#![warn(missing_docs)]

mod builder;
/// Endpoint and client configuration.
pub mod config;
/// Session providers.
pub mod login;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use serde::Deserialize;
use trendline_core::connector::{EntityLookup, QueryTransport, SessionProvider, TrendsConnector};
use trendline_core::{Entity, QueryParams, Session, TrendsError, classify_response};

pub use crate::config::PortalConfig;
pub use crate::login::{PasswordLogin, StaticSession, domain_from_url};

const CONNECTOR_NAME: &str = "trendline-portal";

pub(crate) fn transport_error(e: reqwest::Error) -> TrendsError {
    TrendsError::connector(CONNECTOR_NAME, e.to_string())
}

#[derive(Deserialize)]
struct EntityList {
    #[serde(rename = "entityList")]
    entity_list: Vec<Entity>,
}

/// Public connector type. Construct with [`PortalConnector::new`] or the
/// middleware-wrapped [`PortalConnector::throttled`].
pub struct PortalConnector {
    client: Client,
    config: PortalConfig,
    sessions: Arc<dyn SessionProvider>,
}

impl PortalConnector {
    /// Build a connector whose sessions come from [`PasswordLogin`].
    ///
    /// # Errors
    /// Returns `TrendsError::Connector` if the HTTP client cannot be built.
    pub fn new(config: PortalConfig) -> Result<Self, TrendsError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(transport_error)?;
        let sessions = Arc::new(PasswordLogin::new(client.clone(), config.clone()));
        Ok(Self {
            client,
            config,
            sessions,
        })
    }

    /// Replace the session provider, e.g. with a [`StaticSession`].
    #[must_use]
    pub fn with_session_provider(mut self, sessions: Arc<dyn SessionProvider>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PortalConfig {
        &self.config
    }
}

impl TrendsConnector for PortalConnector {
    fn name(&self) -> &'static str {
        CONNECTOR_NAME
    }

    fn vendor(&self) -> &'static str {
        "Google Trends"
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
impl SessionProvider for PortalConnector {
    async fn acquire(
        &self,
        credentials: &trendline_core::Credentials,
    ) -> Result<Session, TrendsError> {
        self.sessions.acquire(credentials).await
    }

    async fn release(&self, session: Session) -> Result<(), TrendsError> {
        self.sessions.release(session).await
    }
}

#[async_trait]
impl QueryTransport for PortalConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendline::portal::fetch",
            skip(self, params, session),
            fields(q = %params.topics_param(), date = %params.date_param()),
        )
    )]
    async fn fetch(&self, params: &QueryParams, session: &Session) -> Result<String, TrendsError> {
        let url = PortalConfig::resolve(&self.config.trends_url, &session.domain)?;
        let resp = self
            .client
            .get(url)
            .query(&params.to_pairs())
            .header(COOKIE, session.cookie_header())
            .send()
            .await
            .map_err(transport_error)?;
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = resp.text().await.map_err(transport_error)?;
        classify_response(&content_type, body)
    }
}

#[async_trait]
impl EntityLookup for PortalConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "trendline::portal::lookup", skip(self, session))
    )]
    async fn lookup(&self, keyword: &str, session: &Session) -> Result<Vec<Entity>, TrendsError> {
        let url = PortalConfig::resolve(&self.config.entity_url, &session.domain)?;
        let body = self
            .client
            .get(url)
            .query(&[("q", keyword)])
            .header(COOKIE, session.cookie_header())
            .send()
            .await
            .map_err(transport_error)?
            .text()
            .await
            .map_err(transport_error)?;
        // Anything but the JSON entity list is the portal's automated-query page.
        serde_json::from_str::<EntityList>(&body)
            .map(|l| l.entity_list)
            .map_err(|_| {
                TrendsError::quota(
                    "entity lookup did not return JSON; the daily or rate-limit quota \
                     has probably been reached",
                )
            })
    }
}
