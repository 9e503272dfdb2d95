use trendline_core::{KeywordQuery, TrendsError};

/// Keywords sent per export request.
///
/// The portal scales every request to 0-100 across its topics, so more than
/// one keyword per request would report relative rather than absolute interest.
pub const KEYWORDS_PER_REQUEST: usize = 1;

/// Pulls keyword batches from a keyword source.
#[derive(Debug)]
pub struct KeywordBatcher<I> {
    source: I,
}

impl<I> KeywordBatcher<I>
where
    I: Iterator<Item = KeywordQuery>,
{
    /// Batch keywords from `source`.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            source: source.into_iter(),
        }
    }

    /// Next batch of at most [`KEYWORDS_PER_REQUEST`] keywords.
    ///
    /// Blank keywords are skipped.
    ///
    /// # Errors
    /// Returns `TrendsError::NoMoreKeywords` once the source is exhausted.
    pub fn next_batch(&mut self) -> Result<Vec<KeywordQuery>, TrendsError> {
        let batch: Vec<KeywordQuery> = self
            .source
            .by_ref()
            .filter(|k| !k.raw_text.trim().is_empty())
            .take(KEYWORDS_PER_REQUEST)
            .collect();
        if batch.is_empty() {
            Err(TrendsError::NoMoreKeywords)
        } else {
            Ok(batch)
        }
    }
}
