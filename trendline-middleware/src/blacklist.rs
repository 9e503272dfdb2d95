use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use trendline_core::connector::{EntityLookup, QueryTransport, SessionProvider, TrendsConnector};
use trendline_core::{Credentials, Entity, QueryParams, Session, TrendsError};

struct Tripped {
    error: TrendsError,
    until: Option<Instant>,
}

/// Middleware that refuses every portal call once the portal reported quota exhaustion.
///
/// The original `QuotaExceeded` error is replayed for refused calls, so callers
/// see the same session-fatal signal without another request reaching the portal.
/// Without a cooldown the wrapper stays tripped until [`QuotaBlacklist::reset`].
pub struct QuotaBlacklist {
    inner: Arc<dyn TrendsConnector>,
    state: Mutex<Option<Tripped>>,
    cooldown: Option<Duration>,
}

impl QuotaBlacklist {
    /// Wrap `inner`; a quota error blocks it until reset.
    pub fn new(inner: Arc<dyn TrendsConnector>) -> Self {
        Self {
            inner,
            state: Mutex::new(None),
            cooldown: None,
        }
    }

    /// Lift the block automatically after `cooldown`.
    #[must_use]
    pub const fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    /// Clear a tripped blacklist.
    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Error replayed while blacklisted, if any.
    pub fn blocked(&self) -> Option<TrendsError> {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = guard
            .as_ref()
            .and_then(|t| t.until)
            .is_some_and(|until| Instant::now() >= until);
        if expired {
            *guard = None;
        }
        guard.as_ref().map(|t| t.error.clone())
    }

    fn handle_error(&self, err: TrendsError) -> TrendsError {
        if matches!(err, TrendsError::QuotaExceeded { .. }) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                connector = self.inner.name(),
                error = %err,
                "quota exhausted; blacklisting connector"
            );
            let until = self.cooldown.map(|c| Instant::now() + c);
            *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(Tripped {
                error: err.clone(),
                until,
            });
        }
        err
    }

    fn guard(&self) -> Result<(), TrendsError> {
        self.blocked().map_or(Ok(()), Err)
    }
}

impl TrendsConnector for QuotaBlacklist {
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
impl SessionProvider for QuotaBlacklist {
    async fn acquire(&self, credentials: &Credentials) -> Result<Session, TrendsError> {
        self.guard()?;
        let inner = self
            .inner
            .as_session_provider()
            .ok_or_else(|| TrendsError::unsupported("session"))?;
        inner
            .acquire(credentials)
            .await
            .map_err(|e| self.handle_error(e))
    }

    // Release always reaches the portal so sessions are not leaked.
    async fn release(&self, session: Session) -> Result<(), TrendsError> {
        let inner = self
            .inner
            .as_session_provider()
            .ok_or_else(|| TrendsError::unsupported("session"))?;
        inner.release(session).await
    }
}

#[async_trait]
impl QueryTransport for QuotaBlacklist {
    async fn fetch(&self, params: &QueryParams, session: &Session) -> Result<String, TrendsError> {
        self.guard()?;
        let inner = self
            .inner
            .as_query_transport()
            .ok_or_else(|| TrendsError::unsupported("fetch"))?;
        inner
            .fetch(params, session)
            .await
            .map_err(|e| self.handle_error(e))
    }
}

#[async_trait]
impl EntityLookup for QuotaBlacklist {
    async fn lookup(&self, keyword: &str, session: &Session) -> Result<Vec<Entity>, TrendsError> {
        self.guard()?;
        let inner = self
            .inner
            .as_entity_lookup()
            .ok_or_else(|| TrendsError::unsupported("lookup"))?;
        inner
            .lookup(keyword, session)
            .await
            .map_err(|e| self.handle_error(e))
    }
}
