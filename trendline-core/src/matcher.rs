//! Keyword disambiguation.
//!
//! The portal's entity lookup returns many candidate topics per keyword. We keep
//! those whose type looks like a company (falling back to a looser type list),
//! then pick the candidate whose title is most similar to the keyword. Titles
//! often carry qualifiers ("Inc", "Corp"), so similarity is substring aware.

use trendline_types::{Entity, KeywordQuery, MatcherConfig, TrendsError};

use crate::connector::{EntityLookup, Session};

/// Substring-aware similarity on a 0-100 scale.
///
/// The shorter string is slid over every same-length window of the longer one
/// and the best normalized Levenshtein similarity is kept. Comparison is
/// case-insensitive; an empty input scores 0.
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let needle: String = shorter.iter().collect();

    let mut best = 0.0_f64;
    for start in 0..=(longer.len() - shorter.len()) {
        let window: String = longer[start..start + shorter.len()].iter().collect();
        let score = strsim::normalized_levenshtein(&needle, &window);
        if score > best {
            best = score;
        }
        if best >= 0.995 {
            return 100;
        }
    }
    // best is within [0, 1]
    (best * 100.0).round() as u8
}

/// Resolves keywords to entities according to a [`MatcherConfig`].
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    primary_types: Vec<String>,
    backup_types: Vec<String>,
    primary_type_keywords: Vec<String>,
    fallback_type_keyword: String,
    threshold: u8,
    strip_tokens: Vec<String>,
}

impl Default for EntityMatcher {
    fn default() -> Self {
        Self::new(&MatcherConfig::default())
    }
}

impl EntityMatcher {
    /// Build a matcher. Type lists are compared case-insensitively.
    #[must_use]
    pub fn new(cfg: &MatcherConfig) -> Self {
        let lower = |v: &[String]| v.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();
        Self {
            primary_types: lower(&cfg.primary_types),
            backup_types: lower(&cfg.backup_types),
            primary_type_keywords: lower(&cfg.primary_type_keywords),
            fallback_type_keyword: cfg.fallback_type_keyword.to_lowercase(),
            threshold: cfg.threshold,
            strip_tokens: cfg.strip_tokens.clone(),
        }
    }

    /// Similarity threshold a winning candidate must exceed.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    fn eligible<'c>(&self, candidates: &'c [Entity]) -> Vec<&'c Entity> {
        let kind = |e: &Entity| e.type_descriptor.to_lowercase();

        let primary: Vec<&Entity> = candidates
            .iter()
            .filter(|e| {
                let t = kind(e);
                self.primary_types.contains(&t)
                    || self.primary_type_keywords.iter().any(|k| t.contains(k.as_str()))
            })
            .collect();
        if !primary.is_empty() {
            return primary;
        }

        let backup: Vec<&Entity> = candidates
            .iter()
            .filter(|e| self.backup_types.contains(&kind(e)))
            .collect();
        if !backup.is_empty() {
            return backup;
        }

        candidates
            .iter()
            .filter(|e| kind(e).contains(self.fallback_type_keyword.as_str()))
            .collect()
    }

    /// Keyword with the configured filler tokens removed and whitespace collapsed.
    #[must_use]
    pub fn scoring_text(&self, keyword: &str) -> String {
        let mut text = keyword.to_string();
        for token in &self.strip_tokens {
            text = text.replace(token.as_str(), " ");
        }
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            keyword.trim().to_string()
        } else {
            collapsed
        }
    }

    /// Pick the best candidate for `keyword`, if any clears the threshold.
    ///
    /// Ties keep the earliest candidate in lookup order.
    #[must_use]
    pub fn select(&self, keyword: &str, candidates: &[Entity]) -> Option<Entity> {
        let text = self.scoring_text(keyword);
        let mut best: Option<(u8, &Entity)> = None;
        for e in self.eligible(candidates) {
            let score = partial_ratio(&text, &e.canonical_title);
            if best.is_none_or(|(s, _)| score > s) {
                best = Some((score, e));
            }
        }
        best.filter(|(score, _)| *score > self.threshold)
            .map(|(_, e)| e.clone())
    }

    /// Look up `query` and attach the selected entity.
    ///
    /// Below the threshold, or with no candidates, the query is returned
    /// unresolved so its raw text is used as a plain search term.
    ///
    /// # Errors
    /// Propagates lookup failures unchanged, notably `QuotaExceeded`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendline::matcher::resolve",
            skip(self, lookup, session),
            fields(keyword = %query.raw_text),
        )
    )]
    pub async fn resolve(
        &self,
        lookup: &dyn EntityLookup,
        session: &Session,
        mut query: KeywordQuery,
    ) -> Result<KeywordQuery, TrendsError> {
        let candidates = lookup.lookup(&query.raw_text, session).await?;
        query.resolved_entity = self.select(&query.raw_text, &candidates);
        #[cfg(feature = "tracing")]
        match &query.resolved_entity {
            Some(e) => tracing::info!(
                title = %e.canonical_title,
                kind = %e.type_descriptor,
                candidates = candidates.len(),
                "keyword resolved to entity"
            ),
            None => tracing::info!(
                candidates = candidates.len(),
                "no entity above threshold; using search term"
            ),
        }
        Ok(query)
    }
}
