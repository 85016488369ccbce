use thiserror::Error;
use vx_core::VxError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Unknown task kind: {0}")]
    UnknownTask(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Invalid select pattern: {0}")]
    InvalidSelect(#[from] regex::Error),
    #[error("Invalid task configuration: {0}")]
    InvalidConfig(String),
    #[error("Task '{kind}' returned {got} outputs for {expected} inputs")]
    ActionOutputMismatch {
        kind: String,
        expected: usize,
        got: usize,
    },
    #[error("Task '{kind}' failed: {message}")]
    Action { kind: String, message: String },
    #[error(transparent)]
    Config(#[from] VxError),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
