pub mod advisor;
pub mod intent;
pub mod llm;
pub mod memory;
pub mod render;
pub mod roadmap;

pub use advisor::{Advisor, AdvisorTurn};
pub use intent::{CourseQuery, QueryInterpreter};
pub use llm::{Message, MessageRole, TextGenerator};
pub use memory::{ChatMemory, SessionSummary};
