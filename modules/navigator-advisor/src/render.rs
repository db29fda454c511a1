//! Plain-text rendering for the terminal: course tables and the curriculum
//! layout used when no model is available to narrate.

use std::fmt::Write;

use navigator_common::{Course, Level, Phase};

const TOP_PICKS: usize = 3;

/// Shorten to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

fn rating_cell(rating: f64) -> String {
    if rating > 0.0 {
        format!("{:.1}", rating)
    } else {
        "-".to_string()
    }
}

/// Fixed-width table with a header rule. Cells are truncated to their column
/// width.
fn table(headers: &[(&str, usize)], rows: &[Vec<String>]) -> String {
    let mut out = String::new();

    let line = |cells: Vec<String>| -> String {
        cells
            .into_iter()
            .zip(headers.iter())
            .map(|(cell, (_, width))| {
                let cell = truncate(&cell, *width);
                format!("{:<width$}", cell, width = *width)
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header = line(headers.iter().map(|(h, _)| h.to_string()).collect());
    let _ = writeln!(out, "{}", header);
    let rule: Vec<String> = headers.iter().map(|(_, w)| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-|-"));
    for row in rows {
        let _ = writeln!(out, "{}", line(row.clone()));
    }
    out
}

/// Course Name | Platform | Key Focus | Price (USD) | Rating | Phase
pub fn course_table(courses: &[Course]) -> String {
    let headers = [
        ("Course Name", 40),
        ("Platform", 18),
        ("Key Focus", 40),
        ("Price (USD)", 11),
        ("Rating", 6),
        ("Phase", 9),
    ];
    let rows: Vec<Vec<String>> = courses
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.platform.clone(),
                c.focus.clone(),
                c.price.clone(),
                rating_cell(c.rating),
                c.phase.to_string(),
            ]
        })
        .collect();
    table(&headers, &rows)
}

/// Up to three Phase I courses in ranked order.
pub fn top_foundation_courses(courses: &[Course]) -> Vec<&Course> {
    courses
        .iter()
        .filter(|c| c.is_foundation())
        .take(TOP_PICKS)
        .collect()
}

/// Full advisor answer without a model: introduction, three-phase learning
/// path, top Phase I picks, and next steps.
pub fn curriculum(topic: &str, level: Level, courses: &[Course]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "INTRODUCTION");
    let _ = writeln!(
        out,
        "{} is a great choice. A structured path at the {} level will take you from core concepts to real-world work. \
I found {} course{} and arranged them into three phases below.",
        topic,
        level.as_str().to_lowercase(),
        courses.len(),
        if courses.len() == 1 { "" } else { "s" },
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "LEARNING PATH");
    let path_rows: Vec<Vec<String>> = Phase::ALL
        .iter()
        .map(|phase| {
            let in_phase: Vec<&str> = courses
                .iter()
                .filter(|c| c.phase == *phase)
                .map(|c| c.name.as_str())
                .take(2)
                .collect();
            let topics = if in_phase.is_empty() {
                default_topics(*phase).to_string()
            } else {
                in_phase.join("; ")
            };
            vec![
                phase.to_string(),
                phase.title().to_string(),
                topics,
                phase.typical_duration().to_string(),
            ]
        })
        .collect();
    out.push_str(&table(
        &[
            ("Phase", 9),
            ("Focus", 20),
            ("Key Topics to Master", 50),
            ("Estimated Duration", 18),
        ],
        &path_rows,
    ));
    let _ = writeln!(out);

    let picks = top_foundation_courses(courses);
    let _ = writeln!(out, "Top 3 Courses to Start Your Journey");
    if picks.is_empty() {
        let _ = writeln!(
            out,
            "None of the courses found are foundation-level. Consider starting with the Phase I topics above."
        );
    } else {
        let rows: Vec<Vec<String>> = picks
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.platform.clone(),
                    c.focus.clone(),
                    c.price.clone(),
                    rating_cell(c.rating),
                ]
            })
            .collect();
        out.push_str(&table(
            &[
                ("Course Name", 40),
                ("Platform", 18),
                ("Key Focus", 40),
                ("Price (USD)", 11),
                ("Rating", 6),
            ],
            &rows,
        ));
        if picks.len() < TOP_PICKS {
            let _ = writeln!(out, "Only {} foundation course(s) turned up for this topic.", picks.len());
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "NEXT STEPS");
    match picks.first() {
        Some(first) => {
            let _ = writeln!(
                out,
                "Start with \"{}\" on {}. Focus on the core terminology and basics before moving on to Phase II.",
                first.name, first.platform
            );
        }
        None => {
            let _ = writeln!(
                out,
                "Build a strong foundation first: look for an introductory {} course before the later phases.",
                topic
            );
        }
    }
    let _ = write!(
        out,
        "Want me to refine the search? Tell me a different level, a budget, or a platform you prefer."
    );

    out
}

fn default_topics(phase: Phase) -> &'static str {
    match phase {
        Phase::PhaseI => "Core concepts, terminology, basics",
        Phase::PhaseII => "Practical application, hands-on projects",
        Phase::PhaseIII => "Advanced topics, real-world scenarios",
    }
}

/// Reply when every source came back empty.
pub fn no_courses(topic: &str, level: Level) -> String {
    format!(
        "I couldn't find any {} courses for \"{}\" right now. \
Try a broader or differently worded topic, another level, or ask again in a moment.",
        level.as_str().to_lowercase(),
        topic
    )
}

/// Reply when the utterance names nothing to learn.
pub fn ask_for_subject() -> String {
    "What would you like to learn? Name a subject (for example \"Python Programming\" or \"Accounting\") \
and, if you like, your level: beginner, intermediate, or advanced."
        .to_string()
}
