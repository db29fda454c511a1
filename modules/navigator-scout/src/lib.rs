pub mod extractor;
pub mod finder;
pub mod phase;
pub mod query;
pub mod scraper;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

pub use finder::{CourseFinder, SearchRequest};
pub use store::LocalCourseStore;
