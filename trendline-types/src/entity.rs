use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Descriptor used when a keyword could not be resolved to an entity.
pub const SEARCH_TERM_DESCRIPTOR: &str = "Search term";

/// A disambiguated topic returned by the portal's entity lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Opaque topic identifier (e.g. `/m/0k8z`).
    #[serde(rename = "mid")]
    pub identifier: String,
    /// Display title, e.g. "Apple Inc".
    #[serde(rename = "title")]
    pub canonical_title: String,
    /// Free-text type, e.g. "consumer electronics company".
    #[serde(rename = "type")]
    pub type_descriptor: String,
}

impl Entity {
    /// Build an entity from its identifier, title, and type descriptor.
    pub fn new(
        identifier: impl Into<String>,
        canonical_title: impl Into<String>,
        type_descriptor: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            canonical_title: canonical_title.into(),
            type_descriptor: type_descriptor.into(),
        }
    }
}

/// A keyword to query, optionally resolved to an entity.
///
/// Until resolution succeeds the raw text doubles as topic and title with the
/// descriptor [`SEARCH_TERM_DESCRIPTOR`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordQuery {
    /// The keyword exactly as supplied by the caller.
    pub raw_text: String,
    /// Entity chosen by the matcher, if any.
    pub resolved_entity: Option<Entity>,
    /// Optional company registry tag carried through to the output.
    pub cik_tag: Option<String>,
    /// Optional filing date the query windows are centred on.
    pub filing_date: Option<NaiveDate>,
}

impl KeywordQuery {
    /// An unresolved query for `raw_text`.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            resolved_entity: None,
            cik_tag: None,
            filing_date: None,
        }
    }

    /// Attach a registry tag.
    #[must_use]
    pub fn with_cik(mut self, cik: impl Into<String>) -> Self {
        self.cik_tag = Some(cik.into());
        self
    }

    /// Attach the filing date the query windows should be centred on.
    #[must_use]
    pub const fn with_filing_date(mut self, date: NaiveDate) -> Self {
        self.filing_date = Some(date);
        self
    }

    /// Topic sent to the portal: the entity identifier, or the raw text.
    #[must_use]
    pub fn topic(&self) -> &str {
        self.resolved_entity
            .as_ref()
            .map_or(self.raw_text.as_str(), |e| e.identifier.as_str())
    }

    /// Human-readable title: the entity title, or the raw text.
    #[must_use]
    pub fn title(&self) -> &str {
        self.resolved_entity
            .as_ref()
            .map_or(self.raw_text.as_str(), |e| e.canonical_title.as_str())
    }

    /// Type descriptor: the entity type, or "Search term".
    #[must_use]
    pub fn descriptor(&self) -> &str {
        self.resolved_entity
            .as_ref()
            .map_or(SEARCH_TERM_DESCRIPTOR, |e| e.type_descriptor.as_str())
    }
}

impl std::fmt::Display for KeywordQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title(), self.descriptor())
    }
}
