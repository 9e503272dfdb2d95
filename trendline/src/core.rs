use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use trendline_core::connector::TrendsConnector;
use trendline_core::{
    EntityMatcher, MatcherConfig, Throttle, TrendsConfig, TrendsError, WindowConfig,
};
use trendline_middleware::ConnectorBuilder;

/// Orchestrator that runs the keyword pipeline against one connector.
pub struct Trends {
    pub(crate) connector: Arc<dyn TrendsConnector>,
    pub(crate) cfg: TrendsConfig,
    pub(crate) matcher: EntityMatcher,
    pub(crate) anchor: Option<NaiveDate>,
}

/// Builder for constructing a [`Trends`] orchestrator with custom configuration.
pub struct TrendsBuilder {
    connector: Option<Arc<dyn TrendsConnector>>,
    cfg: TrendsConfig,
    anchor: Option<NaiveDate>,
    quota_cooldown: Option<Duration>,
    wrap: bool,
}

impl Default for TrendsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendsBuilder {
    /// Create a new builder with default configuration and no connector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: TrendsConfig::default(),
            anchor: None,
            quota_cooldown: None,
            wrap: true,
        }
    }

    /// Set the connector. A second call replaces the first.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn TrendsConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: TrendsConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Delay inserted before every portal call.
    #[must_use]
    pub const fn throttle(mut self, throttle: Throttle) -> Self {
        self.cfg.throttle = throttle;
        self
    }

    /// Entity matching policy.
    #[must_use]
    pub fn matcher(mut self, matcher: MatcherConfig) -> Self {
        self.cfg.matcher = matcher;
        self
    }

    /// Long-span offset and quarter length.
    #[must_use]
    pub const fn window(mut self, window: WindowConfig) -> Self {
        self.cfg.window = window;
        self
    }

    /// Category code applied to every export, e.g. `0-7-37`.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.cfg.category = Some(category.into());
        self
    }

    /// Date to centre the query span on for keywords without a filing date.
    ///
    /// Without one, such keywords use a span ending at the current month.
    #[must_use]
    pub const fn anchor_date(mut self, date: NaiveDate) -> Self {
        self.anchor = Some(date);
        self
    }

    /// Let the quota blacklist lift after `cooldown` instead of lasting the whole run.
    #[must_use]
    pub const fn quota_cooldown(mut self, cooldown: Duration) -> Self {
        self.quota_cooldown = Some(cooldown);
        self
    }

    /// Use the connector as given, without throttle or blacklist layers.
    ///
    /// For connectors that were already composed with `ConnectorBuilder`.
    #[must_use]
    pub const fn without_middleware(mut self) -> Self {
        self.wrap = false;
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` without a connector, or when the connector cannot
    /// acquire sessions or export reports, or when the quarter length is zero.
    pub fn build(self) -> Result<Trends, TrendsError> {
        let raw = self.connector.ok_or_else(|| {
            TrendsError::InvalidArg(
                "no connector registered; add one via with_connector(...)".into(),
            )
        })?;
        if raw.as_session_provider().is_none() || raw.as_query_transport().is_none() {
            return Err(TrendsError::InvalidArg(format!(
                "connector {} must provide sessions and report export",
                raw.name()
            )));
        }
        if self.cfg.window.quarter_months == 0 {
            return Err(TrendsError::InvalidArg(
                "quarter window must span at least one month".into(),
            ));
        }

        let connector = if self.wrap {
            ConnectorBuilder::new(raw)
                .with_throttle(self.cfg.throttle)
                .with_blacklist(self.quota_cooldown)
                .build()
        } else {
            raw
        };

        Ok(Trends {
            connector,
            matcher: EntityMatcher::new(&self.cfg.matcher),
            cfg: self.cfg,
            anchor: self.anchor,
        })
    }
}

impl Trends {
    /// Start building a new `Trends` instance.
    #[must_use]
    pub fn builder() -> TrendsBuilder {
        TrendsBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TrendsConfig {
        &self.cfg
    }

    /// The connector calls go through, including middleware layers.
    #[must_use]
    pub fn connector(&self) -> &Arc<dyn TrendsConnector> {
        &self.connector
    }
}
