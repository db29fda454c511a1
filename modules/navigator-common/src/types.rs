use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sentinel for a price or duration that could not be read from the source text.
pub const VARIES: &str = "Varies";

/// Sentinel for a platform that could not be derived from the result link.
pub const UNKNOWN_PLATFORM: &str = "Unknown";

// --- Level ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// Parse a free-form level string. Unrecognized or blank input falls back
    /// to `Beginner`.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "intermediate" => Level::Intermediate,
            "advanced" => Level::Advanced,
            _ => Level::Beginner,
        }
    }

    pub fn from_option(input: Option<&str>) -> Self {
        input.map(Level::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Phase ---

/// Pedagogical bucket a course belongs to in a learning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Phase {
    /// The Foundation: core concepts, terminology, basics.
    PhaseI,
    /// Core Application: practical, hands-on skills.
    PhaseII,
    /// Analysis & Reporting: advanced topics, real-world scenarios.
    PhaseIII,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::PhaseI, Phase::PhaseII, Phase::PhaseIII];

    pub fn title(&self) -> &'static str {
        match self {
            Phase::PhaseI => "The Foundation",
            Phase::PhaseII => "Core Application",
            Phase::PhaseIII => "Analysis & Reporting",
        }
    }

    /// Typical time to work through a phase.
    pub fn typical_duration(&self) -> &'static str {
        match self {
            Phase::PhaseI => "4-8 weeks",
            Phase::PhaseII => "6-10 weeks",
            Phase::PhaseIII => "8-12 weeks",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::PhaseI => write!(f, "Phase I"),
            Phase::PhaseII => write!(f, "Phase II"),
            Phase::PhaseIII => write!(f, "Phase III"),
        }
    }
}

// --- SearchResult ---

/// One raw record from a source adapter. Every adapter produces this shape,
/// whatever the upstream format was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
        }
    }
}

// --- Course ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub platform: String,
    pub focus: String,
    pub key_topics: String,
    pub price: String,
    pub rating: f64,
    pub duration_weeks: String,
    pub phase: Phase,
    pub level: Level,
    pub url: String,
}

/// Identity used for cross-source deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Url(String),
    NamePlatform(String, String),
}

impl Course {
    /// Fill every defaulted field with its sentinel so callers never see a
    /// blank price, duration, or platform, and clamp the rating to a finite
    /// value in `[0.0, 5.0]`.
    pub fn normalize(&mut self) {
        if self.price.trim().is_empty() {
            self.price = VARIES.to_string();
        }
        if self.duration_weeks.trim().is_empty() {
            self.duration_weeks = VARIES.to_string();
        }
        if self.platform.trim().is_empty() {
            self.platform = UNKNOWN_PLATFORM.to_string();
        }
        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            self.rating = 0.0;
        }
    }

    /// A non-empty url identifies the course; without one, fall back to the
    /// case-insensitive (name, platform) pair.
    pub fn dedup_key(&self) -> DedupKey {
        let url = self.url.trim();
        if !url.is_empty() {
            return DedupKey::Url(url.to_string());
        }
        DedupKey::NamePlatform(
            self.name.trim().to_lowercase(),
            self.platform.trim().to_lowercase(),
        )
    }

    pub fn is_foundation(&self) -> bool {
        self.phase == Phase::PhaseI
    }
}

/// Host of a URL, lowercased, with a leading `www.` removed. Empty when the
/// link is blank or cannot be parsed.
pub fn extract_host(link: &str) -> String {
    let link = link.trim();
    if link.is_empty() {
        return String::new();
    }
    let host = match url::Url::parse(link) {
        Ok(parsed) => parsed.host_str().unwrap_or("").to_lowercase(),
        Err(_) => return String::new(),
    };
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}
