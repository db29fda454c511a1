//! Text-pattern extraction of course attributes from a raw search record.
//!
//! Everything here is a best-effort heuristic. When a pattern does not match,
//! the field takes its sentinel (`"Varies"`, `0.0`, `"Unknown"`) instead of
//! failing.

use std::sync::LazyLock;

use navigator_common::{extract_host, Course, Level, SearchResult, UNKNOWN_PLATFORM, VARIES};
use regex::Regex;

use crate::phase;

static RE_FREE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:free|audit)\b").expect("valid regex"));

static RE_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+(?:,\d{3})*(?:\.\d{2})?").expect("valid regex"));

static RE_RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:/\s*5\b|stars?\b|rating)").expect("valid regex")
});

static RE_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\s*[-–]\s*\d+)?\s*weeks?\b").expect("valid regex")
});

/// Known course platforms, matched against the link host.
const PLATFORMS: &[(&str, &str)] = &[
    ("coursera.org", "Coursera"),
    ("udemy.com", "Udemy"),
    ("edx.org", "edX"),
    ("udacity.com", "Udacity"),
    ("pluralsight.com", "Pluralsight"),
    ("khanacademy.org", "Khan Academy"),
    ("codecademy.com", "Codecademy"),
    ("futurelearn.com", "FutureLearn"),
    ("linkedin.com", "LinkedIn Learning"),
    ("freecodecamp.org", "freeCodeCamp"),
    ("skillshare.com", "Skillshare"),
    ("datacamp.com", "DataCamp"),
    ("youtube.com", "YouTube"),
];

/// Build a normalized, phase-classified course from one raw record.
pub fn extract_course(raw: &SearchResult, level: Level) -> Course {
    let name = collapse_whitespace(&raw.title);
    let focus = collapse_whitespace(&raw.snippet);
    let phase = phase::classify(&format!("{name} {focus}"), level);

    let mut course = Course {
        platform: platform_for(&raw.link),
        price: extract_price(&focus),
        rating: extract_rating(&focus),
        duration_weeks: extract_duration(&focus),
        key_topics: focus.clone(),
        focus,
        name,
        phase,
        level,
        url: raw.link.trim().to_string(),
    };
    course.normalize();
    course
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Display name for the platform hosting `link`. Unknown hosts are returned
/// bare (without `www.`); an empty or unparseable link is `"Unknown"`.
pub fn platform_for(link: &str) -> String {
    let host = extract_host(link);
    if host.is_empty() {
        return UNKNOWN_PLATFORM.to_string();
    }

    PLATFORMS
        .iter()
        .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{domain}")))
        .map(|(_, name)| name.to_string())
        .unwrap_or(host)
}

pub fn extract_price(text: &str) -> String {
    if RE_FREE.is_match(text) {
        return "Free".to_string();
    }
    RE_PRICE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| VARIES.to_string())
}

/// First number followed by a rating marker that lies within `[0, 5]`.
/// Counts like "1,234 ratings" fall outside the range and are skipped.
pub fn extract_rating(text: &str) -> f64 {
    RE_RATING
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .find(|v| v.is_finite() && (0.0..=5.0).contains(v))
        .unwrap_or(0.0)
}

/// Duration token with whitespace removed, e.g. "4 - 8 weeks" becomes "4-8weeks".
pub fn extract_duration(text: &str) -> String {
    RE_DURATION
        .find(text)
        .map(|m| {
            m.as_str()
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| if c == '–' { '-' } else { c })
                .collect::<String>()
                .to_lowercase()
        })
        .unwrap_or_else(|| VARIES.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use navigator_common::Phase;

    #[test]
    fn free_course_with_range_and_stars() {
        let raw = SearchResult::new(
            "Python   Basics",
            "This free course covers basics in 4-8 weeks, rated 4.5 stars",
            "https://www.coursera.org/learn/python",
        );
        let course = extract_course(&raw, Level::Beginner);
        assert_eq!(course.price, "Free");
        assert_eq!(course.duration_weeks, "4-8weeks");
        assert_eq!(course.rating, 4.5);
        assert_eq!(course.name, "Python Basics");
        assert_eq!(course.platform, "Coursera");
        assert_eq!(course.phase, Phase::PhaseI);
        assert_eq!(course.focus, course.key_topics);
    }

    #[test]
    fn coursera_link_maps_to_coursera() {
        assert_eq!(platform_for("https://www.coursera.org/learn/x"), "Coursera");
        assert_eq!(platform_for("https://online.stanford.edu/courses"), "online.stanford.edu");
        assert_eq!(platform_for("https://www.realpython.com/"), "realpython.com");
        assert_eq!(platform_for(""), "Unknown");
        assert_eq!(platform_for("nonsense"), "Unknown");
    }

    #[test]
    fn platform_match_is_domain_not_substring() {
        assert_eq!(platform_for("https://learn.udemy.com/x"), "Udemy");
        assert_eq!(platform_for("https://notudemy.com/x"), "notudemy.com");
    }

    #[test]
    fn price_prefers_free_then_amount_then_sentinel() {
        assert_eq!(extract_price("Audit for FREE or pay"), "Free");
        assert_eq!(extract_price("You can audit this course"), "Free");
        assert_eq!(extract_price("Only $49.99 today, was $1,299"), "$49.99");
        assert_eq!(extract_price("Enroll at $1,299.00"), "$1,299.00");
        assert_eq!(extract_price("Enroll now"), "Varies");
        assert_eq!(extract_price("freeCodeCamp curriculum, $20"), "$20");
    }

    #[test]
    fn rating_needs_a_marker() {
        assert_eq!(extract_rating("Rated 4.8/5 by 10k learners"), 4.8);
        assert_eq!(extract_rating("4 star course"), 4.0);
        assert_eq!(extract_rating("4.6 rating"), 4.6);
        assert_eq!(extract_rating("Over 4.7 million learners"), 0.0);
        assert_eq!(extract_rating(""), 0.0);
    }

    #[test]
    fn rating_skips_out_of_range_counts() {
        assert_eq!(extract_rating("1,234 ratings, 4.4 stars"), 4.4);
        assert_eq!(extract_rating("100 stars"), 0.0);
    }

    #[test]
    fn duration_single_and_range() {
        assert_eq!(extract_duration("Takes 6 weeks"), "6weeks");
        assert_eq!(extract_duration("about 4 - 8 Weeks at 3 hrs"), "4-8weeks");
        assert_eq!(extract_duration("1 week sprint"), "1week");
        assert_eq!(extract_duration("self-paced"), "Varies");
    }

    #[test]
    fn empty_record_gets_sentinels() {
        let course = extract_course(&SearchResult::default(), Level::Advanced);
        assert_eq!(course.name, "");
        assert_eq!(course.platform, "Unknown");
        assert_eq!(course.price, "Varies");
        assert_eq!(course.duration_weeks, "Varies");
        assert_eq!(course.rating, 0.0);
        assert_eq!(course.phase, Phase::PhaseIII);
        assert_eq!(course.url, "");
    }
}
