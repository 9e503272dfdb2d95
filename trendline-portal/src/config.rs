use std::time::Duration;

use serde::{Deserialize, Serialize};
use trendline_core::TrendsError;
use url::Url;

/// Placeholder replaced by the session's portal domain in URL templates.
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// Endpoints and client settings of the portal connector.
///
/// Every URL except `login_url` may contain `{domain}`, which is replaced by
/// the domain the login page resolved to (e.g. `google.com.au`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Login page; its final host, minus `accounts.`, becomes the session domain.
    pub login_url: String,
    /// Credential form target.
    pub auth_url: String,
    /// Home page visited after login to collect the preference cookies.
    pub home_url: String,
    /// Report export endpoint.
    pub trends_url: String,
    /// Entity lookup endpoint.
    pub entity_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: "https://accounts.google.com.au/ServiceLogin".into(),
            auth_url: "https://accounts.{domain}/ServiceLoginAuth".into(),
            home_url: "https://www.{domain}".into(),
            trends_url: "http://www.{domain}/trends/trendsReport".into(),
            entity_url: "http://www.google.com/trends/entitiesQuery".into(),
            user_agent: concat!("trendline/", env!("CARGO_PKG_VERSION")).into(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl PortalConfig {
    /// All endpoints on one base URL, e.g. a local test server.
    ///
    /// The login page is `{base}/ServiceLogin` and the other endpoints hang off
    /// `http://{domain}`, so the domain discovered at login routes back to `base`.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            login_url: format!("{base}/ServiceLogin"),
            auth_url: "http://{domain}/ServiceLoginAuth".into(),
            home_url: "http://{domain}/".into(),
            trends_url: "http://{domain}/trends/trendsReport".into(),
            entity_url: "http://{domain}/trends/entitiesQuery".into(),
            ..Self::default()
        }
    }

    /// Substitute `domain` into `template` and parse the result.
    ///
    /// # Errors
    /// Returns `TrendsError::InvalidArg` if the result is not a valid URL.
    pub fn resolve(template: &str, domain: &str) -> Result<Url, TrendsError> {
        let raw = template.replace(DOMAIN_PLACEHOLDER, domain);
        Url::parse(&raw).map_err(|e| TrendsError::InvalidArg(format!("invalid portal url {raw}: {e}")))
    }
}
