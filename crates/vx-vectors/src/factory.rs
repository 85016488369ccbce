use vx_core::VectorsConfig;

use crate::embedding::ExternalVectors;
use crate::error::{Result, VectorsError};
use crate::indexer::Indexer;

/// Builds an indexer from a vectors configuration.
pub struct VectorsFactory;

impl VectorsFactory {
    /// Only the `external` method is buildable here: payloads are
    /// precomputed vectors. Model-backed methods wire their own
    /// embedding function through [`Indexer::from_config`].
    pub fn create(config: &VectorsConfig) -> Result<Indexer<ExternalVectors>> {
        match config.method.as_str() {
            "external" => Indexer::from_config(config, ExternalVectors),
            other => Err(VectorsError::UnknownMethod(other.to_string())),
        }
    }
}
