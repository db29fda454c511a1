//! Turning a learner's utterance into a course search.
//!
//! An LLM is asked for a JSON object shaped like [`CourseQuery`]; when there
//! is no generator, or its reply is unusable, a keyword heuristic takes over.

use std::sync::Arc;

use navigator_common::Level;
use navigator_scout::finder::DEFAULT_MAX_RESULTS;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::{Message, TextGenerator};

/// Upper bound on what a single conversational turn may ask for.
const MAX_RESULTS_CAP: usize = 15;

/// Search online courses on a specific topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CourseQuery {
    /// The subject or topic to search for (e.g. 'Python Programming', 'Accounting', 'Web Development').
    pub topic: String,
    /// Difficulty level: 'Beginner', 'Intermediate', or 'Advanced'.
    pub level: Level,
    /// Maximum number of courses to return (default: 10, recommended: 5-15).
    pub max_results: usize,
}

impl CourseQuery {
    pub fn new(topic: impl Into<String>, level: Level) -> Self {
        Self {
            topic: topic.into(),
            level,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// JSON schema of [`CourseQuery`], as handed to the model.
pub fn course_query_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(CourseQuery)).unwrap_or_default()
}

const INTERPRET_SYSTEM: &str = "You route learners to an online course search. \
Read the learner's message and reply with ONLY a JSON object matching this schema, \
no prose and no code fences. Use an empty topic when the message names no subject \
to learn. Pick the level from how the learner describes themselves; default to Beginner.";

pub struct QueryInterpreter {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl QueryInterpreter {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn heuristic() -> Self {
        Self::new(None)
    }

    /// Work out what to search for. `None` means the utterance names no
    /// subject.
    pub async fn interpret(&self, utterance: &str) -> Option<CourseQuery> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return None;
        }

        if let Some(generator) = &self.generator {
            let messages = [
                Message::system(format!("{}\n\n{}", INTERPRET_SYSTEM, course_query_schema())),
                Message::user(utterance),
            ];
            match generator.generate(&messages).await {
                Ok(reply) => match parse_llm_query(&reply) {
                    Some(query) => {
                        debug!(topic = query.topic.as_str(), level = %query.level, "Query from model");
                        return Some(query);
                    }
                    None if reply_declines_topic(&reply) => return None,
                    None => warn!("Model reply was not a usable query, using heuristic"),
                },
                Err(e) => warn!(error = %e, "Query interpretation failed, using heuristic"),
            }
        }

        parse_utterance(utterance)
    }
}

// --- Model reply ---

#[derive(Debug, Deserialize)]
struct RawQuery {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    max_results: Option<usize>,
}

/// The JSON object between the first `{` and the last `}`, which tolerates
/// code fences and stray prose around it.
fn json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

fn parse_raw(reply: &str) -> Option<RawQuery> {
    serde_json::from_str(json_object(reply)?).ok()
}

/// A usable query from a model reply: valid JSON with a non-blank topic.
/// Level is read leniently and the limit is clamped to `1..=15`.
pub fn parse_llm_query(reply: &str) -> Option<CourseQuery> {
    let raw = parse_raw(reply)?;
    let topic = raw.topic.split_whitespace().collect::<Vec<_>>().join(" ");
    if topic.is_empty() {
        return None;
    }

    Some(CourseQuery {
        topic,
        level: Level::from_option(raw.level.as_deref()),
        max_results: raw
            .max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, MAX_RESULTS_CAP),
    })
}

/// Well-formed reply whose topic is blank: the model saw no subject.
fn reply_declines_topic(reply: &str) -> bool {
    parse_raw(reply).is_some_and(|raw| raw.topic.trim().is_empty())
}

// --- Heuristic ---

/// Lead-ins that precede the subject. Checked in order; first hit wins.
const LEAD_INS: &[&str] = &[
    "i want to learn about",
    "i want to learn",
    "i wanna learn",
    "i'd like to learn about",
    "i'd like to learn",
    "i would like to learn about",
    "i would like to learn",
    "i need to learn",
    "help me learn",
    "teach me about",
    "teach me",
    "i'm interested in",
    "i am interested in",
    "interested in",
    "courses on",
    "courses about",
    "courses for",
    "courses in",
    "course on",
    "course about",
    "course for",
    "course in",
    "learn about",
    "learning about",
    "get into",
    "learn",
    "study",
];

/// Phrases after the subject that describe the learner, not the subject.
const TRAILERS: &[&str] = &[
    " as a ",
    " as an ",
    " at a ",
    " at an ",
    " at the ",
    " for beginners",
    " for a beginner",
    " for an ",
    " from scratch",
    " from the ground up",
    " since i",
    " because ",
    " i'm ",
    " i am ",
    ",",
    ".",
    "!",
    "?",
    ";",
];

/// Words dropped from either end of the subject.
const EDGE_WORDS: &[&str] = &[
    "a",
    "an",
    "the",
    "some",
    "about",
    "on",
    "in",
    "please",
    "beginner",
    "beginners",
    "beginner-level",
    "intermediate",
    "advanced",
    "expert",
    "level",
    "course",
    "courses",
    "basics",
    "basic",
];

/// Level implied by the wording. Intermediate and advanced are checked first
/// so "beginner to advanced" style phrasing does not get misread.
pub fn detect_level(utterance: &str) -> Level {
    let text = utterance.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| contains_phrase(&text, w));

    if has(&["intermediate"]) {
        Level::Intermediate
    } else if has(&["advanced", "expert"]) {
        Level::Advanced
    } else {
        // "beginner", "new to", "basics" and anything unqualified.
        Level::Beginner
    }
}

/// Best-effort query from the utterance alone.
pub fn parse_utterance(utterance: &str) -> Option<CourseQuery> {
    let topic = extract_topic(utterance);
    if topic.is_empty() {
        return None;
    }
    Some(CourseQuery::new(topic, detect_level(utterance)))
}

/// Subject words of the utterance, original casing preserved.
pub fn extract_topic(utterance: &str) -> String {
    // ASCII lowering keeps byte offsets aligned with the original.
    let lower = utterance.to_ascii_lowercase();

    let start = LEAD_INS
        .iter()
        .find_map(|lead| find_phrase(&lower, lead).map(|at| at + lead.len()))
        .unwrap_or(0);

    let rest_lower = &lower[start..];
    let end = TRAILERS
        .iter()
        .filter_map(|t| rest_lower.find(t))
        .min()
        .map(|at| start + at)
        .unwrap_or(lower.len());

    let words: Vec<&str> = utterance[start..end]
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && !"+#".contains(c)))
        .filter(|w| !w.is_empty())
        .collect();

    let is_edge = |w: &&str| EDGE_WORDS.contains(&w.to_ascii_lowercase().as_str());
    let first = words.iter().position(|w| !is_edge(w));
    let last = words.iter().rposition(|w| !is_edge(w));

    match (first, last) {
        (Some(first), Some(last)) => words[first..=last].join(" "),
        _ => String::new(),
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'\''
}

/// Byte offset of `phrase` in `text` where it stands as whole words.
fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    text.match_indices(phrase).map(|(at, _)| at).find(|&at| {
        let end = at + phrase.len();
        let before_ok = at == 0 || !is_word_byte(bytes[at - 1]);
        let after_ok = end == bytes.len() || !is_word_byte(bytes[end]);
        before_ok && after_ok
    })
}

fn contains_phrase(text: &str, phrase: &str) -> bool {
    find_phrase(text, phrase).is_some()
}
