//! Configuration types shared across the orchestrator, matcher, and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Entity types accepted on the first matching pass.
pub const DEFAULT_PRIMARY_TYPES: &[&str] = &[
    "investment banking company",
    "financial services company",
    "finance company",
    "investment company",
    "commercial banking company",
    "conglomerate company",
    "consumer electronics company",
    "corporation",
    "retail company",
    "software company",
    "energy company",
    "health care company",
    "private equity company",
    "company",
];

/// Entity types accepted when no primary type matched.
pub const DEFAULT_BACKUP_TYPES: &[&str] = &[
    "business",
    "commercial bank business",
    "organization leader",
    "business operation",
    "restaurant",
    "brand",
    "investment",
    "website",
    "service",
    "designer",
];

/// Settings for resolving free-text keywords into portal entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Entity types accepted on the first pass (compared lowercase).
    pub primary_types: Vec<String>,
    /// Entity types accepted on the second pass.
    pub backup_types: Vec<String>,
    /// Substrings that also qualify a type on the first pass.
    pub primary_type_keywords: Vec<String>,
    /// Substring accepted on the last-resort pass.
    pub fallback_type_keyword: String,
    /// Minimum similarity score (0-100, exclusive) a candidate title must exceed.
    pub threshold: u8,
    /// Tokens removed from the keyword before scoring (e.g. "Securities").
    pub strip_tokens: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            primary_types: DEFAULT_PRIMARY_TYPES.iter().map(|s| (*s).to_string()).collect(),
            backup_types: DEFAULT_BACKUP_TYPES.iter().map(|s| (*s).to_string()).collect(),
            primary_type_keywords: vec!["company".to_string(), "business".to_string()],
            fallback_type_keyword: "company".to_string(),
            threshold: 65,
            strip_tokens: vec![
                "Securities".to_string(),
                "Investments".to_string(),
                "Partners".to_string(),
            ],
        }
    }
}

/// Delay inserted before every call to the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Throttle {
    /// No delay between calls.
    #[default]
    None,
    /// Fixed delay before each call.
    Fixed(Duration),
    /// Uniformly random delay in `[min, max]` before each call.
    Random {
        /// Lower bound of the delay.
        min: Duration,
        /// Upper bound of the delay (inclusive).
        max: Duration,
    },
}

impl Throttle {
    /// The original "random" throttle: one to three seconds between calls.
    #[must_use]
    pub const fn random_default() -> Self {
        Self::Random {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}

/// How the query span around a filing date is split into windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Months before and after the filing date covered by the long-span window.
    pub offset_months: u32,
    /// Length of each fine-grained sub-window in months.
    pub quarter_months: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            offset_months: 12,
            quarter_months: 3,
        }
    }
}

/// Account credentials handed to a session provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account user name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Build credentials from a user name and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Global configuration for the `Trends` orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendsConfig {
    /// Keyword disambiguation settings.
    pub matcher: MatcherConfig,
    /// Delay policy applied between portal calls.
    pub throttle: Throttle,
    /// Window planning around each keyword's filing date.
    pub window: WindowConfig,
    /// Optional portal category code, e.g. `0-7-107` for finance/investing.
    pub category: Option<String>,
}
