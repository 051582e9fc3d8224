use std::sync::Arc;

use crate::cache::ExpiringCache;
use crate::{Photo, PhotoSetId, SearchOptions};

/// Trims and lowercases a query. Cache keys and scoring always use the normalized form.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// The lowercased text a photo is matched against: alt text plus attribution.
pub fn searchable_text(photo: &Photo) -> String {
    let mut text = String::with_capacity(photo.alt.len() + photo.photographer.len() + 1);
    text.push_str(&photo.alt);
    text.push(' ');
    text.push_str(&photo.photographer);
    text.to_lowercase()
}

struct QueryTerms<'q> {
    phrase: &'q str,
    tokens: Vec<&'q str>,
}

impl<'q> QueryTerms<'q> {
    fn new(normalized: &'q str, options: &SearchOptions) -> Self {
        let tokens = normalized
            .split_whitespace()
            .filter(|t| t.chars().count() >= options.min_token_len)
            .collect();
        Self {
            phrase: normalized,
            tokens,
        }
    }

    fn score(&self, photo: &Photo, options: &SearchOptions) -> u32 {
        let text = searchable_text(photo);
        let mut score = 0u32;
        if text.contains(self.phrase) {
            score = score.saturating_add(options.phrase_score);
        }
        for token in &self.tokens {
            if text.contains(token) {
                score = score.saturating_add(options.token_score);
            }
        }
        score
    }
}

/// Relevance of `photo` for `query` with the default weights (0 = no match).
pub fn score(photo: &Photo, query: &str) -> u32 {
    let options = SearchOptions::default();
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return 0;
    }
    QueryTerms::new(&normalized, &options).score(photo, &options)
}

fn ranked_indices(
    photos: &[Photo],
    terms: &QueryTerms<'_>,
    options: &SearchOptions,
    mut on_score: impl FnMut(),
) -> Vec<usize> {
    let mut scored: Vec<(usize, u32)> = photos
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            on_score();
            let s = terms.score(p, options);
            (s > 0).then_some((i, s))
        })
        .collect();
    // Stable: equal scores keep input order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(i, _)| i).collect()
}

/// Ranks `photos` against a free-text query.
///
/// An empty or whitespace-only query returns the input unchanged. Otherwise only matching photos
/// are returned, best first; ties keep their input order.
pub fn rank<'a>(photos: &'a [Photo], query: &str) -> Vec<&'a Photo> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return photos.iter().collect();
    }
    let options = SearchOptions::default();
    let terms = QueryTerms::new(&normalized, &options);
    ranked_indices(photos, &terms, &options, || {})
        .into_iter()
        .map(|i| &photos[i])
        .collect()
}

/// The result of a ranking: either the untouched list, or matching positions best-first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ranking {
    PassThrough,
    Matches(Arc<[usize]>),
}

impl Ranking {
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }

    /// Number of photos this ranking yields for a list of `total` photos.
    pub fn len(&self, total: usize) -> usize {
        match self {
            Self::PassThrough => total,
            Self::Matches(m) => m.len(),
        }
    }

    pub fn apply<'a>(&self, photos: &'a [Photo]) -> Vec<&'a Photo> {
        match self {
            Self::PassThrough => photos.iter().collect(),
            Self::Matches(m) => m.iter().filter_map(|&i| photos.get(i)).collect(),
        }
    }

    /// Owned copy of the ranked photos, suitable as layout input.
    pub fn to_photos(&self, photos: &[Photo]) -> Vec<Photo> {
        self.apply(photos).into_iter().cloned().collect()
    }
}

type SearchKey = (String, PhotoSetId);

/// Expiring cache of rankings keyed by normalized query and photo set.
#[derive(Debug)]
pub struct SearchCache {
    inner: ExpiringCache<SearchKey, Arc<[usize]>>,
}

impl SearchCache {
    pub fn new(capacity: usize, ttl_ms: u64) -> Self {
        Self {
            inner: ExpiringCache::new(capacity, ttl_ms),
        }
    }

    pub fn get(&mut self, query: &str, photos: PhotoSetId, now_ms: u64) -> Option<Arc<[usize]>> {
        self.inner
            .get(&(query.to_owned(), photos), now_ms)
            .cloned()
    }

    pub fn insert(&mut self, query: String, photos: PhotoSetId, ranking: Arc<[usize]>, now_ms: u64) {
        self.inner.insert((query, photos), ranking, now_ms);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// A search overlay with an owned, expiring result cache.
///
/// [`Self::score_runs`] counts how many photos were scored; cache hits score nothing.
#[derive(Debug)]
pub struct SearchOverlay {
    options: SearchOptions,
    cache: SearchCache,
    score_runs: u64,
}

impl Default for SearchOverlay {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl SearchOverlay {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            cache: SearchCache::new(options.cache_capacity, options.ttl_ms),
            options,
            score_runs: 0,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn score_runs(&self) -> u64 {
        self.score_runs
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn rank(&mut self, photos: &[Photo], query: &str, now_ms: u64) -> Ranking {
        self.rank_keyed(photos, PhotoSetId::of(photos), query, now_ms)
    }

    /// Same as [`Self::rank`], for callers that already know the photo set identity.
    pub fn rank_keyed(
        &mut self,
        photos: &[Photo],
        id: PhotoSetId,
        query: &str,
        now_ms: u64,
    ) -> Ranking {
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return Ranking::PassThrough;
        }
        if let Some(hit) = self.cache.get(&normalized, id, now_ms) {
            ptrace!(query = normalized.as_str(), "search cache hit");
            return Ranking::Matches(hit);
        }

        let terms = QueryTerms::new(&normalized, &self.options);
        let mut runs = 0u64;
        let ranked: Arc<[usize]> =
            ranked_indices(photos, &terms, &self.options, || runs += 1).into();
        self.score_runs = self.score_runs.saturating_add(runs);
        pdebug!(
            query = normalized.as_str(),
            photos = photos.len(),
            matches = ranked.len(),
            "search ranking"
        );
        self.cache
            .insert(normalized, id, Arc::clone(&ranked), now_ms);
        Ranking::Matches(ranked)
    }
}
