//! Vector indexing engine.
//!
//! Turns an ordered stream of records into fixed-dimension embeddings,
//! buffers them into bounded batches and stages every batch in a durable
//! stream file. The caller gets back the ids in submission order, the
//! discovered dimension, the number of batches written and a handle to the
//! staged stream.

pub mod batch;
pub mod dimension;
pub mod embedding;
pub mod error;
pub mod factory;
pub mod indexer;
pub mod stream;

pub use batch::{Batch, BatchAccumulator, BatchEntry};
pub use dimension::Dimension;
pub use embedding::{normalize_vector, EmbeddingFunction, ExternalVectors, Transform};
pub use error::{ModelError, Result, VectorsError};
pub use factory::VectorsFactory;
pub use indexer::{IndexSummary, Indexer, IndexerOptions};
pub use stream::{StreamHandle, StreamReader, StreamWriter};
pub use vx_core::{Record, RecordId};
