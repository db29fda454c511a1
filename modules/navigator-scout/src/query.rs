use navigator_common::{Level, NavigatorError};

/// Platforms the narrow query is restricted to via `site:` filters.
pub const PLATFORM_ALLOW_LIST: &[&str] = &[
    "coursera.org",
    "udemy.com",
    "edx.org",
    "udacity.com",
    "pluralsight.com",
];

/// The queries for one search, ordered from narrowest to broadest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub topic: String,
    pub level: Level,
    /// Base query restricted to the platform allow-list.
    pub narrow: String,
    /// Base query with no site restriction.
    pub broad: String,
    /// Sent to the scrape adapter. Same text as `broad`.
    pub fallback: String,
}

impl QueryPlan {
    pub fn build(topic: &str, level: Level) -> Result<Self, NavigatorError> {
        let topic = collapse(topic);
        if topic.is_empty() {
            return Err(NavigatorError::EmptyTopic);
        }

        let base = format!("{topic} {level} course");
        let sites = PLATFORM_ALLOW_LIST
            .iter()
            .map(|d| format!("site:{d}"))
            .collect::<Vec<_>>()
            .join(" OR ");

        Ok(Self {
            narrow: format!("{base} {sites}"),
            broad: base.clone(),
            fallback: base,
            topic,
            level,
        })
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
