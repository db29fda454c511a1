//! Course aggregation pipeline.
//!
//! Sources are tried one at a time in priority order, each step gated on
//! whether the previous ones already produced enough courses:
//!
//! 1. structured provider, narrow (site-restricted) query
//! 2. structured provider, broad query
//! 3. HTML scrape, fallback query (over-fetching to absorb scrape noise)
//! 4. local override store, only when everything above came back empty
//!
//! The merged set is then normalized, ranked by rating with a Phase I
//! tie-break, deduplicated, and truncated.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use navigator_common::{Course, DedupKey, Level, NavigatorError, SearchConfig, SearchResult};
use tracing::{debug, info, warn};

use crate::extractor::extract_course;
use crate::query::QueryPlan;
use crate::scraper::{DuckDuckGoSearcher, GoogleSearcher, WebSearcher};
use crate::store::LocalCourseStore;

pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Raw candidates requested from the scrape adapter per wanted course.
const SCRAPE_OVERFETCH: usize = 2;

/// Caller-facing search parameters with the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub topic: String,
    pub level: Level,
    pub max_results: usize,
}

impl SearchRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            level: Level::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

pub struct CourseFinder {
    structured: Option<Arc<dyn WebSearcher>>,
    scrape: Option<Arc<dyn WebSearcher>>,
    overrides: LocalCourseStore,
}

impl CourseFinder {
    pub fn new(
        structured: Option<Arc<dyn WebSearcher>>,
        scrape: Option<Arc<dyn WebSearcher>>,
    ) -> Self {
        Self {
            structured,
            scrape,
            overrides: LocalCourseStore::default(),
        }
    }

    /// Wire the production adapters. The structured provider is only enabled
    /// when its credentials are configured.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let structured: Option<Arc<dyn WebSearcher>> = match &config.google {
            Some(creds) => {
                info!("Structured search enabled (Google Custom Search)");
                Some(Arc::new(GoogleSearcher::new(
                    creds,
                    &config.google_search_url,
                    config.timeout,
                )?))
            }
            None => {
                info!("No structured search credentials, using HTML scrape only");
                None
            }
        };

        let scrape: Arc<dyn WebSearcher> =
            Arc::new(DuckDuckGoSearcher::new(&config.scrape_search_url, config.timeout)?);

        Ok(Self::new(structured, Some(scrape)))
    }

    pub fn with_overrides(mut self, overrides: LocalCourseStore) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn has_structured_source(&self) -> bool {
        self.structured.is_some()
    }

    /// Search every available source for courses on `topic`.
    ///
    /// Never fails: an empty topic, a zero limit, or sources that are all
    /// unavailable produce an empty list.
    pub async fn search(&self, topic: &str, level: Level, max_results: usize) -> Vec<Course> {
        match self.try_search(topic, level, max_results).await {
            Ok(courses) => courses,
            Err(e) => {
                warn!(error = %e, "Course search skipped");
                Vec::new()
            }
        }
    }

    pub async fn search_request(&self, request: &SearchRequest) -> Vec<Course> {
        self.search(&request.topic, request.level, request.max_results)
            .await
    }

    /// Like [`search`](Self::search), but reports an empty topic as
    /// [`NavigatorError::EmptyTopic`] instead of an empty list.
    pub async fn try_search(
        &self,
        topic: &str,
        level: Level,
        max_results: usize,
    ) -> Result<Vec<Course>, NavigatorError> {
        let plan = QueryPlan::build(topic, level)?;
        if max_results == 0 {
            return Ok(Vec::new());
        }

        info!(topic = plan.topic.as_str(), level = %level, max_results, "Course search");

        let mut acc = Accumulator::new(level);

        if let Some(structured) = &self.structured {
            let raw = structured.search(&plan.narrow, max_results).await;
            let added = acc.extend(raw);
            info!(source = structured.name(), added, "Narrow query done");

            if acc.len() < max_results {
                let raw = structured.search(&plan.broad, max_results).await;
                let added = acc.extend(raw);
                info!(source = structured.name(), added, "Broad query done");
            }
        }

        if acc.len() < max_results {
            if let Some(scrape) = &self.scrape {
                let wanted = max_results.saturating_mul(SCRAPE_OVERFETCH);
                let raw = scrape.search(&plan.fallback, wanted).await;
                let added = acc.extend(raw);
                info!(source = scrape.name(), added, "Fallback query done");
            }
        }

        if acc.is_empty() && !self.overrides.is_empty() {
            let stored = self.overrides.lookup(&plan.topic);
            info!(count = stored.len(), "Using local course overrides");
            acc.courses.extend(stored);
        }

        let mut courses = rank(acc.courses);
        courses.truncate(max_results);

        info!(topic = plan.topic.as_str(), count = courses.len(), "Course search complete");
        Ok(courses)
    }
}

/// Courses gathered so far, with the identities already taken.
struct Accumulator {
    level: Level,
    courses: Vec<Course>,
    seen: HashSet<DedupKey>,
}

impl Accumulator {
    fn new(level: Level) -> Self {
        Self {
            level,
            courses: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn len(&self) -> usize {
        self.courses.len()
    }

    fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Extract and append one source batch. Records whose identity arrived in
    /// an earlier batch are skipped; duplicates within the batch are all kept
    /// so ranking can pick the best copy. Records without a title carry
    /// nothing to show and are dropped.
    fn extend(&mut self, raw: Vec<SearchResult>) -> usize {
        let before = self.courses.len();
        let total = raw.len();

        let batch: Vec<Course> = raw
            .iter()
            .filter(|r| !r.title.trim().is_empty())
            .map(|r| extract_course(r, self.level))
            .collect();

        let untitled = total - batch.len();
        if untitled > 0 {
            debug!(dropped = untitled, "Dropped untitled search records");
        }

        let fresh: Vec<Course> = batch
            .into_iter()
            .filter(|c| !self.seen.contains(&c.dedup_key()))
            .collect();
        self.seen.extend(fresh.iter().map(Course::dedup_key));
        self.courses.extend(fresh);

        self.courses.len() - before
    }
}

/// Normalize, order by `(rating, is Phase I)` descending, and keep the first
/// occurrence of each identity. The sort is stable, so equal keys keep their
/// arrival order.
pub fn rank(mut courses: Vec<Course>) -> Vec<Course> {
    for course in &mut courses {
        course.normalize();
    }

    courses.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.is_foundation().cmp(&a.is_foundation()))
    });

    let mut seen = HashSet::new();
    courses.retain(|c| seen.insert(c.dedup_key()));
    courses
}
