pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LlmConfig, SearchConfig};
pub use error::NavigatorError;
pub use types::*;
