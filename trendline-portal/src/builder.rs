use std::sync::Arc;
use std::time::Duration;

use trendline_core::connector::TrendsConnector;
use trendline_core::{Throttle, TrendsError};
use trendline_middleware::ConnectorBuilder;

use crate::{PortalConfig, PortalConnector};

impl PortalConnector {
    /// Builder with the connector's recommended pacing: a random one to three
    /// second pause before every call and a permanent quota blacklist.
    ///
    /// # Errors
    /// Returns `TrendsError::Connector` if the HTTP client cannot be built.
    pub fn throttled(config: PortalConfig) -> Result<ConnectorBuilder, TrendsError> {
        Ok(Self::builder(config)?
            .with_throttle(Throttle::random_default())
            .with_blacklist(None))
    }

    /// Unwrapped builder; customize with the middleware methods before `.build()`.
    ///
    /// # Errors
    /// Returns `TrendsError::Connector` if the HTTP client cannot be built.
    pub fn builder(config: PortalConfig) -> Result<ConnectorBuilder, TrendsError> {
        let raw: Arc<dyn TrendsConnector> = Arc::new(Self::new(config)?);
        Ok(ConnectorBuilder::new(raw))
    }

    /// Builder with a fixed pause, for accounts with a known rate limit.
    ///
    /// # Errors
    /// Returns `TrendsError::Connector` if the HTTP client cannot be built.
    pub fn paced(config: PortalConfig, pause: Duration) -> Result<ConnectorBuilder, TrendsError> {
        Ok(Self::builder(config)?
            .with_throttle(Throttle::Fixed(pause))
            .with_blacklist(None))
    }
}
