use std::sync::Arc;

use navigator_common::{Course, NavigatorError};
use navigator_scout::CourseFinder;
use serde_json::json;
use tracing::{info, warn};

use crate::intent::{CourseQuery, QueryInterpreter};
use crate::llm::{Message, TextGenerator};
use crate::render;

pub const SYSTEM_PROMPT: &str = r#"You are the Knowledge Navigator Agent, an expert Academic Advisor specializing in curriculum design and personalized learning paths.

IMPORTANT OUTPUT FORMAT INSTRUCTIONS:
When a user asks to learn a subject, you MUST follow this exact structure:

1. INTRODUCTION (2-3 sentences):
   - Acknowledge the subject choice
   - Briefly explain why it's valuable
   - Mention that you've found and structured courses for them

2. LEARNING PATH TABLE (Must include):
   - Phase | Focus | Key Topics to Master | Estimated Duration
   - Phase I: The Foundation (core concepts, terminology, basics)
   - Phase II: Core Application (practical application, hands-on skills)
   - Phase III: Analysis & Reporting (advanced topics, real-world scenarios)

3. TOP 3 COURSES SECTION:
   - Header: "Top 3 Courses to Start Your Journey"
   - Table with columns: Course Name | Platform | Key Focus | Price (USD) | Rating
   - Only show courses from Phase I (Foundation phase)
   - Must be exactly 3 courses

4. NEXT STEPS:
   - Recommendation about which course to start with
   - Explanation of what to focus on
   - Offer to refine the search based on user preferences

TONE AND STYLE:
- Professional yet encouraging
- Use clear section headers (no asterisks or markdown symbols in terminal)
- Tables should be clean and readable
- Explain concepts in an accessible way
- Always emphasize building a strong foundation first

COURSE STRUCTURE:
- Always structure results into 3 phases
- Phase I focuses on foundations and basics (4-8 weeks)
- Phase II focuses on application and hands-on work (6-10 weeks)
- Phase III focuses on advanced topics and real-world scenarios (8-12 weeks)

Use only the courses provided with the learner's message. Each course carries its phase, price, and rating; do not invent courses, prices, or ratings.
Remember: You are guiding beginners, so always explain concepts in an accessible way."#;

/// Outcome of one conversational turn.
#[derive(Debug, Clone)]
pub struct AdvisorTurn {
    /// What was searched for, if the utterance named a subject.
    pub query: Option<CourseQuery>,
    pub courses: Vec<Course>,
    pub reply: String,
}

/// Interprets a learner's request, searches for courses, and narrates a
/// curriculum. Works with or without a text generator; without one every
/// step uses its deterministic fallback.
pub struct Advisor {
    finder: Arc<CourseFinder>,
    interpreter: QueryInterpreter,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Advisor {
    pub fn new(finder: Arc<CourseFinder>, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            finder,
            interpreter: QueryInterpreter::new(generator.clone()),
            generator,
        }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn respond(&self, utterance: &str, history: &[Message]) -> AdvisorTurn {
        let Some(query) = self.interpreter.interpret(utterance).await else {
            return AdvisorTurn {
                query: None,
                courses: Vec::new(),
                reply: render::ask_for_subject(),
            };
        };

        info!(topic = query.topic.as_str(), level = %query.level, "Advisor turn");

        let courses = match self
            .finder
            .try_search(&query.topic, query.level, query.max_results)
            .await
        {
            Ok(courses) => courses,
            Err(NavigatorError::EmptyTopic) => {
                return AdvisorTurn {
                    query: None,
                    courses: Vec::new(),
                    reply: render::ask_for_subject(),
                };
            }
            Err(e) => {
                warn!(error = %e, "Course search failed");
                Vec::new()
            }
        };

        if courses.is_empty() {
            return AdvisorTurn {
                reply: render::no_courses(&query.topic, query.level),
                query: Some(query),
                courses,
            };
        }

        let reply = self.narrate(utterance, history, &query, &courses).await;
        AdvisorTurn {
            query: Some(query),
            courses,
            reply,
        }
    }

    async fn narrate(
        &self,
        utterance: &str,
        history: &[Message],
        query: &CourseQuery,
        courses: &[Course],
    ) -> String {
        let fallback = || render::curriculum(&query.topic, query.level, courses);

        let Some(generator) = &self.generator else {
            return fallback();
        };

        let results = json!({
            "topic": query.topic,
            "level": query.level,
            "courses": courses,
        });

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(SYSTEM_PROMPT));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(format!(
            "{}\n\nCourse search results (JSON):\n{}",
            utterance,
            serde_json::to_string_pretty(&results).unwrap_or_default()
        )));

        match generator.generate(&messages).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Model returned an empty curriculum, rendering locally");
                fallback()
            }
            Err(e) => {
                warn!(error = %e, "Curriculum narration failed, rendering locally");
                fallback()
            }
        }
    }
}
