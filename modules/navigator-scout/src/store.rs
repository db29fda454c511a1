use std::collections::HashMap;

use navigator_common::Course;

/// In-memory topic → courses overrides consulted only when every live source
/// came back empty. Empty unless the caller seeds it; never written during a
/// search.
#[derive(Debug, Clone, Default)]
pub struct LocalCourseStore {
    entries: HashMap<String, Vec<Course>>,
}

impl LocalCourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topic(mut self, topic: &str, courses: Vec<Course>) -> Self {
        self.entries
            .entry(topic.trim().to_lowercase())
            .or_default()
            .extend(courses);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Courses whose topic key contains `topic`, or is contained by it,
    /// case-insensitively. Keys are visited in sorted order so results are
    /// deterministic.
    pub fn lookup(&self, topic: &str) -> Vec<Course> {
        let topic = topic.trim().to_lowercase();
        if topic.is_empty() {
            return Vec::new();
        }

        let mut keys: Vec<&String> = self
            .entries
            .keys()
            .filter(|key| key.contains(topic.as_str()) || topic.contains(key.as_str()))
            .collect();
        keys.sort();

        keys.into_iter()
            .flat_map(|key| self.entries[key].iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navigator_common::{Level, Phase};

    fn course(name: &str) -> Course {
        Course {
            name: name.to_string(),
            platform: "Coursera".to_string(),
            focus: String::new(),
            key_topics: String::new(),
            price: "Free".to_string(),
            rating: 4.0,
            duration_weeks: "6weeks".to_string(),
            phase: Phase::PhaseI,
            level: Level::Beginner,
            url: String::new(),
        }
    }

    #[test]
    fn default_store_is_empty() {
        let store = LocalCourseStore::new();
        assert!(store.is_empty());
        assert!(store.lookup("python").is_empty());
    }

    #[test]
    fn lookup_matches_substrings_both_ways() {
        let store = LocalCourseStore::new()
            .with_topic("Python", vec![course("Py 101")])
            .with_topic("Machine Learning with Python", vec![course("ML 101")])
            .with_topic("Accounting", vec![course("Ledgers")]);

        let names: Vec<String> = store.lookup("python").into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["ML 101", "Py 101"]);

        let names: Vec<String> = store
            .lookup("Python Programming")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Py 101"]);
    }
}
