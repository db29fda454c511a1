use navigator_common::{Level, Phase};

const FOUNDATION_KEYWORDS: &[&str] = &["intro", "introduction", "beginner", "basics", "fundamentals"];

const APPLICATION_KEYWORDS: &[&str] = &[
    "intermediate",
    "practical",
    "project",
    "application",
    "hands-on",
];

const ANALYSIS_KEYWORDS: &[&str] = &[
    "advanced",
    "analysis",
    "deep",
    "advanced topics",
    "reporting",
    "expert",
];

/// Assign a learning phase from the combined title and snippet.
///
/// Keyword groups are checked top to bottom (foundation, application,
/// analysis) and the first group with a hit wins, so text that mentions both
/// "beginner" and "advanced" lands in Phase I. Text with no keyword falls
/// back on the requested level.
pub fn classify(text: &str, level: Level) -> Phase {
    let text = text.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if hit(FOUNDATION_KEYWORDS) {
        Phase::PhaseI
    } else if hit(APPLICATION_KEYWORDS) {
        Phase::PhaseII
    } else if hit(ANALYSIS_KEYWORDS) {
        Phase::PhaseIII
    } else {
        match level {
            Level::Beginner => Phase::PhaseI,
            Level::Intermediate => Phase::PhaseII,
            Level::Advanced => Phase::PhaseIII,
        }
    }
}
