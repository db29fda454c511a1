use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("No query to run: topic is empty")]
    EmptyTopic,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
