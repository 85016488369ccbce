//! Shared data model, configuration and errors for the vectorix workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::{TaskConfig, VectorsConfig, VxConfig, WorkflowConfig};
pub use error::{Result, VxError};
pub use types::{Record, RecordId};
