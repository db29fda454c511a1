use navigator_common::NavigatorError;
use tracing::info;

use crate::llm::{Message, TextGenerator};

const ROADMAP_PROMPT: &str = "You are an expert academic advisor. A user wants to learn about '{topic}'.
Your main goal is to help the student find the best courses for their needs, then provide a concise, actionable learning path.

Output structure:
1. Top Courses: List the best available courses for this topic (include course name, platform, and a short reason for recommendation).
2. Learning Path: Suggest a logical sequence or phases for mastering the topic. The number of phases is up to you; use as many as needed for clarity and effectiveness. For each phase, include:
   - Phase Name
   - Key Topics (2-4 bullet points)
   - Why It Matters (1 sentence)

Requirements:
- Be concise and to the point.
- Use clear section headers (no markdown symbols).
- Focus on practical, actionable steps.
- Avoid lengthy explanations or background information.";

pub fn roadmap_prompt(topic: &str) -> String {
    ROADMAP_PROMPT.replace("{topic}", topic)
}

/// Ask the model for a concise roadmap: top courses first, then phases with
/// key topics and why each matters.
pub async fn generate_learning_roadmap(
    generator: &dyn TextGenerator,
    topic: &str,
) -> Result<String, NavigatorError> {
    let topic = topic.split_whitespace().collect::<Vec<_>>().join(" ");
    if topic.is_empty() {
        return Err(NavigatorError::EmptyTopic);
    }

    info!(topic = topic.as_str(), "Generating learning roadmap");

    let text = generator
        .generate(&[Message::user(roadmap_prompt(&topic))])
        .await
        .map_err(|e| NavigatorError::Llm(format!("{e:#}")))?;

    if text.trim().is_empty() {
        return Err(NavigatorError::Llm("empty roadmap".to_string()));
    }
    Ok(text.trim().to_string())
}
