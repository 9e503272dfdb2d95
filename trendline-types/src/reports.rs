use serde::{Deserialize, Serialize};

/// Outcome of one keyword's pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordReport {
    /// Keyword as supplied by the caller.
    pub keyword: String,
    /// Topic that was queried (entity identifier or raw text).
    pub topic: String,
    /// Entity type descriptor, or "Search term".
    pub descriptor: String,
    /// Number of daily points handed to the sink.
    pub points: usize,
    /// Number of quarter windows that returned no measurable interest.
    pub all_zero_quarters: usize,
    /// Number of quarter windows replaced by placeholders after an unavailable response.
    pub unavailable_windows: usize,
}

/// Outcome of a whole keyword batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Keywords processed to completion, in processing order.
    pub keywords: Vec<KeywordReport>,
}

impl RunReport {
    /// Per-keyword all-zero quarter counts, in processing order.
    #[must_use]
    pub fn missing_quarters(&self) -> Vec<usize> {
        self.keywords.iter().map(|k| k.all_zero_quarters).collect()
    }
}
