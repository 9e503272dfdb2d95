//! Builder for composing connectors with middleware layers.
//!
//! Layers form an onion around the raw connector. The last layer added is the
//! outermost one: it sees each request first and each error last.
//!
//! ```text
//! builder.with_throttle(..).with_blacklist(..)
//!
//! Storage: [Blacklist, Throttle]  (outermost first)
//! Result:  QuotaBlacklist(ThrottledConnector(Raw))
//! ```
//!
//! With the blacklist outside the throttle, refused calls return at once
//! instead of sleeping first.

use std::sync::Arc;
use std::time::Duration;

use trendline_core::Throttle;
use trendline_core::connector::TrendsConnector;

use crate::blacklist::QuotaBlacklist;
use crate::throttle::ThrottledConnector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Throttle(Throttle),
    Blacklist { cooldown: Option<Duration> },
}

impl Layer {
    const fn name(&self) -> &'static str {
        match self {
            Self::Throttle(_) => "ThrottledConnector",
            Self::Blacklist { .. } => "QuotaBlacklist",
        }
    }

    fn apply(self, inner: Arc<dyn TrendsConnector>) -> Arc<dyn TrendsConnector> {
        match self {
            Self::Throttle(t) => Arc::new(ThrottledConnector::new(inner, t)),
            Self::Blacklist { cooldown } => {
                let b = QuotaBlacklist::new(inner);
                Arc::new(match cooldown {
                    Some(c) => b.with_cooldown(c),
                    None => b,
                })
            }
        }
    }
}

/// Middleware builder for composing a connector with layered wrappers.
pub struct ConnectorBuilder {
    raw: Arc<dyn TrendsConnector>,
    /// Outermost first; applied in reverse by `build()`.
    layers: Vec<Layer>,
}

impl ConnectorBuilder {
    /// Create a new builder from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn TrendsConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the throttle layer at the outermost position.
    ///
    /// `Throttle::None` removes the layer.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.layers.retain(|l| !matches!(l, Layer::Throttle(_)));
        if throttle != Throttle::None {
            self.layers.insert(0, Layer::Throttle(throttle));
        }
        self
    }

    /// Add or replace the quota blacklist at the outermost position.
    ///
    /// `None` keeps the connector blocked for the rest of its life.
    #[must_use]
    pub fn with_blacklist(mut self, cooldown: Option<Duration>) -> Self {
        self.layers.retain(|l| !matches!(l, Layer::Blacklist { .. }));
        self.layers.insert(0, Layer::Blacklist { cooldown });
        self
    }

    /// Remove the blacklist if present.
    #[must_use]
    pub fn without_blacklist(mut self) -> Self {
        self.layers.retain(|l| !matches!(l, Layer::Blacklist { .. }));
        self
    }

    /// Layer names, outermost first, ending with the raw connector's name.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.layers.iter().map(Layer::name).collect();
        names.push(self.raw.name());
        names
    }

    /// Build the wrapped connector, applying layers innermost first.
    #[must_use]
    pub fn build(self) -> Arc<dyn TrendsConnector> {
        let mut acc: Arc<dyn TrendsConnector> = Arc::clone(&self.raw);
        for layer in self.layers.into_iter().rev() {
            acc = layer.apply(acc);
        }
        acc
    }
}
