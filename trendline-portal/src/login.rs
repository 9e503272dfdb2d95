//! Session providers: password login emulation and a pre-established cookie set.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, Response, StatusCode};
use trendline_core::connector::SessionProvider;
use trendline_core::{Credentials, Session, TrendsError};
use url::Url;

use crate::config::PortalConfig;
use crate::transport_error;

/// Cookies kept from the authentication and home page responses.
const SESSION_COOKIES: &[&str] = &["NID", "PREF", "SID"];
const LOCALE_COOKIE: (&str, &str) = ("I4SUserLocale", "en_US");

fn cookies_of(resp: &Response) -> BTreeMap<String, String> {
    resp.cookies()
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect()
}

fn cookie_header(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Portal domain of the page the login request landed on.
///
/// The host (with its port, if any) minus a leading `accounts.` label.
#[must_use]
pub fn domain_from_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("accounts.").unwrap_or(host);
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Session provider that emulates the portal's interactive password login.
///
/// 1. GET the login page for its `GALX`/`GAPS` cookies and the portal domain.
/// 2. POST the credentials to the auth endpoint; anything but 200 is rejected.
/// 3. GET the home page for the remaining preference cookies.
///
/// The session must end up with both `SID` and `NID`.
#[derive(Debug, Clone)]
pub struct PasswordLogin {
    client: Client,
    config: PortalConfig,
}

impl PasswordLogin {
    /// Build a login flow on an existing HTTP client.
    #[must_use]
    pub fn new(client: Client, config: PortalConfig) -> Self {
        Self { client, config }
    }

    async fn login_page(&self) -> Result<(String, String, String), TrendsError> {
        let url = PortalConfig::resolve(&self.config.login_url, "")?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let domain = domain_from_url(resp.url());
        let mut cookies = cookies_of(&resp);
        match (cookies.remove("GALX"), cookies.remove("GAPS")) {
            (Some(galx), Some(gaps)) => Ok((domain, galx, gaps)),
            _ => Err(TrendsError::Auth(
                "login page did not set the GALX/GAPS cookies".into(),
            )),
        }
    }
}

#[async_trait]
impl SessionProvider for PasswordLogin {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendline::portal::login",
            skip(self, credentials),
            fields(username = %credentials.username),
        )
    )]
    async fn acquire(&self, credentials: &Credentials) -> Result<Session, TrendsError> {
        let (domain, galx, gaps) = self.login_page().await?;

        let continue_url = format!("http://www.{domain}/trends");
        let form = [
            ("Email", credentials.username.as_str()),
            ("Passwd", credentials.password.as_str()),
            ("PersistentCookie", "yes"),
            ("GALX", galx.as_str()),
            ("continue", continue_url.as_str()),
        ];
        let auth = self
            .client
            .post(PortalConfig::resolve(&self.config.auth_url, &domain)?)
            .header(COOKIE, cookie_header(&[("GALX", galx.as_str()), ("GAPS", gaps.as_str())]))
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;
        if auth.status() != StatusCode::OK {
            return Err(TrendsError::Auth(format!(
                "portal login was unsuccessful, status code: {}",
                auth.status().as_u16()
            )));
        }
        let auth_cookies = cookies_of(&auth);

        let home = self
            .client
            .get(PortalConfig::resolve(&self.config.home_url, &domain)?)
            .send()
            .await
            .map_err(transport_error)?;
        let home_cookies = cookies_of(&home);

        let mut session = Session::new(domain).with_cookie(LOCALE_COOKIE.0, LOCALE_COOKIE.1);
        for jar in [auth_cookies, home_cookies] {
            for (name, value) in jar {
                if SESSION_COOKIES.contains(&name.as_str()) {
                    session = session.with_cookie(name, value);
                }
            }
        }

        if !(session.cookies.contains_key("SID") && session.cookies.contains_key("NID")) {
            return Err(TrendsError::Auth(
                "failed to read the necessary cookies; the login flow may have changed \
                 or the account information is incorrect"
                    .into(),
            ));
        }
        #[cfg(feature = "tracing")]
        tracing::info!(domain = %session.domain, "portal session acquired");
        Ok(session)
    }
}

/// Session provider that hands out a pre-established session.
///
/// Stands in for login flows that cannot be automated (e.g. a challenge that
/// needs a browser): the cookies are obtained elsewhere and supplied here.
#[derive(Debug, Clone)]
pub struct StaticSession {
    session: Session,
}

impl StaticSession {
    /// Wrap an existing session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn acquire(&self, _credentials: &Credentials) -> Result<Session, TrendsError> {
        if self.session.cookies.is_empty() {
            return Err(TrendsError::Auth("static session carries no cookies".into()));
        }
        Ok(self.session.clone())
    }
}
