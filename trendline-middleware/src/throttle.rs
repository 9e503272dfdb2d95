use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use trendline_core::connector::{EntityLookup, QueryTransport, SessionProvider, TrendsConnector};
use trendline_core::{Credentials, Entity, QueryParams, Session, Throttle, TrendsError};

/// Delay to wait before the next portal call under `throttle`.
///
/// A `Random` throttle with `max <= min` always waits `min`.
#[must_use]
pub fn throttle_delay(throttle: &Throttle) -> Duration {
    match *throttle {
        Throttle::Fixed(d) => d,
        Throttle::Random { min, max } if max > min => {
            let mut rng = rand::rng();
            let ms = rng.random_range(duration_ms(min)..=duration_ms(max));
            Duration::from_millis(ms)
        }
        Throttle::Random { min, .. } => min,
        _ => Duration::ZERO,
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Wrapper that sleeps before every report export and entity lookup.
///
/// Session acquisition and release pass straight through.
pub struct ThrottledConnector {
    inner: Arc<dyn TrendsConnector>,
    throttle: Throttle,
}

impl ThrottledConnector {
    /// Wrap `inner` with `throttle`.
    pub fn new(inner: Arc<dyn TrendsConnector>, throttle: Throttle) -> Self {
        Self { inner, throttle }
    }

    /// Access the inner connector.
    pub fn inner(&self) -> &Arc<dyn TrendsConnector> {
        &self.inner
    }

    async fn pause(&self) {
        let delay = throttle_delay(&self.throttle);
        if delay.is_zero() {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            connector = self.inner.name(),
            delay_ms = duration_ms(delay),
            "throttling portal call"
        );
        tokio::time::sleep(delay).await;
    }
}

impl TrendsConnector for ThrottledConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    fn as_session_provider(&self) -> Option<&dyn SessionProvider> {
        if self.inner.as_session_provider().is_some() {
            Some(self as &dyn SessionProvider)
        } else {
            None
        }
    }

    fn as_query_transport(&self) -> Option<&dyn QueryTransport> {
        if self.inner.as_query_transport().is_some() {
            Some(self as &dyn QueryTransport)
        } else {
            None
        }
    }

    fn as_entity_lookup(&self) -> Option<&dyn EntityLookup> {
        if self.inner.as_entity_lookup().is_some() {
            Some(self as &dyn EntityLookup)
        } else {
            None
        }
    }
}

#[async_trait]
impl SessionProvider for ThrottledConnector {
    async fn acquire(&self, credentials: &Credentials) -> Result<Session, TrendsError> {
        let inner = self
            .inner
            .as_session_provider()
            .ok_or_else(|| TrendsError::unsupported("session"))?;
        inner.acquire(credentials).await
    }

    async fn release(&self, session: Session) -> Result<(), TrendsError> {
        let inner = self
            .inner
            .as_session_provider()
            .ok_or_else(|| TrendsError::unsupported("session"))?;
        inner.release(session).await
    }
}

#[async_trait]
impl QueryTransport for ThrottledConnector {
    async fn fetch(&self, params: &QueryParams, session: &Session) -> Result<String, TrendsError> {
        let inner = self
            .inner
            .as_query_transport()
            .ok_or_else(|| TrendsError::unsupported("fetch"))?;
        self.pause().await;
        inner.fetch(params, session).await
    }
}

#[async_trait]
impl EntityLookup for ThrottledConnector {
    async fn lookup(&self, keyword: &str, session: &Session) -> Result<Vec<Entity>, TrendsError> {
        let inner = self
            .inner
            .as_entity_lookup()
            .ok_or_else(|| TrendsError::unsupported("lookup"))?;
        self.pause().await;
        inner.lookup(keyword, session).await
    }
}
