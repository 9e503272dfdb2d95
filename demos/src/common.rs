use std::sync::Arc;

use trendline::{Credentials, TrendsError};
use trendline_core::connector::TrendsConnector;
use trendline_portal::{PortalConfig, PortalConnector};

/// Set to run the demos against the mock connector.
pub const USE_MOCK_ENV: &str = "TRENDLINE_DEMOS_USE_MOCK";

/// True when the demos should stay offline.
#[must_use]
pub fn use_mock() -> bool {
    std::env::var(USE_MOCK_ENV).is_ok()
}

/// Return a connector for the demos: the mock in CI, the portal otherwise.
///
/// The portal connector comes unwrapped; the orchestrator adds throttle and
/// blacklist layers itself.
///
/// # Errors
/// Returns `TrendsError::Connector` if the HTTP client cannot be built.
pub fn get_connector() -> Result<Arc<dyn TrendsConnector>, TrendsError> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        Ok(Arc::new(trendline_mock::MockConnector::new()))
    } else {
        Ok(Arc::new(PortalConnector::new(PortalConfig::default())?))
    }
}

/// Account credentials from `TRENDLINE_USER` and `TRENDLINE_PASSWORD`.
///
/// # Errors
/// Returns `TrendsError::InvalidArg` when either variable is missing outside mock mode.
pub fn credentials() -> Result<Credentials, TrendsError> {
    if use_mock() {
        return Ok(Credentials::new("demo@example.com", "demo"));
    }
    let var = |name: &str| {
        std::env::var(name).map_err(|_| TrendsError::InvalidArg(format!("{name} is not set")))
    };
    Ok(Credentials::new(
        var("TRENDLINE_USER")?,
        var("TRENDLINE_PASSWORD")?,
    ))
}
