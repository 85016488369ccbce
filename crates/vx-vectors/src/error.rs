use std::path::PathBuf;

use thiserror::Error;
use vx_core::{RecordId, VxError};

/// Failure raised by an embedding function.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum VectorsError {
    #[error("Dimension mismatch for record {id}: expected {expected}, got {got}")]
    DimensionMismatch {
        id: RecordId,
        expected: usize,
        got: usize,
    },
    #[error("Zero-length embedding for record {id}")]
    ZeroDimension { id: RecordId },
    #[error("Model error for record {id}: {source}")]
    Model {
        id: RecordId,
        #[source]
        source: ModelError,
    },
    #[error("Stream sink unavailable at {}: {source}", .path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No records to index")]
    EmptyInput,
    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(usize),
    #[error("Unknown vectors method: {0}")]
    UnknownMethod(String),
    #[error("Corrupt stream: {0}")]
    Corrupt(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] VxError),
}

pub type Result<T> = std::result::Result<T, VectorsError>;
