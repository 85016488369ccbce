//! Indexing orchestration: embed, batch, stage.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};
use vx_core::{Record, RecordId, VectorsConfig};

use crate::batch::{BatchAccumulator, BatchEntry};
use crate::dimension::Dimension;
use crate::embedding::{normalize_vector, EmbeddingFunction};
use crate::error::{Result, VectorsError};
use crate::stream::{StreamHandle, StreamWriter};

#[derive(Debug, Clone)]
pub struct IndexerOptions {
    /// Records per staged batch.
    pub batch_size: usize,
    pub normalize: bool,
    pub staging_dir: Option<PathBuf>,
}

impl Default for IndexerOptions {
    fn default() -> Self {
        Self {
            batch_size: 500,
            normalize: false,
            staging_dir: None,
        }
    }
}

impl From<&VectorsConfig> for IndexerOptions {
    fn from(config: &VectorsConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            normalize: config.normalize,
            staging_dir: config.staging_dir.clone(),
        }
    }
}

/// Result of one indexing call.
#[derive(Debug)]
pub struct IndexSummary {
    /// Ids in submission order.
    pub ids: Vec<RecordId>,
    pub dimension: usize,
    pub batch_count: usize,
    pub stream: StreamHandle,
}

impl IndexSummary {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Converts records into staged embedding batches.
///
/// The embedding function is shared behind an `Arc` and only borrowed,
/// so one model instance can serve any number of calls.
pub struct Indexer<E: ?Sized> {
    embedder: Arc<E>,
    options: IndexerOptions,
}

impl<E> Indexer<E> {
    pub fn new(embedder: E, options: IndexerOptions) -> Result<Self> {
        Self::from_shared(Arc::new(embedder), options)
    }

    pub fn from_config(config: &VectorsConfig, embedder: E) -> Result<Self> {
        Self::new(embedder, IndexerOptions::from(config))
    }
}

impl<E: ?Sized> Indexer<E> {
    pub fn from_shared(embedder: Arc<E>, options: IndexerOptions) -> Result<Self> {
        if options.batch_size == 0 {
            return Err(VectorsError::InvalidBatchSize(options.batch_size));
        }
        Ok(Self { embedder, options })
    }

    pub fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }

    pub fn options(&self) -> &IndexerOptions {
        &self.options
    }

    /// Index `records` in order.
    ///
    /// Every full batch is written to the stream as soon as it fills; a
    /// trailing partial batch is written at the end. Zero records is an
    /// [`VectorsError::EmptyInput`] error. On any error the partial stream
    /// file is deleted and no summary is returned.
    pub fn index<P, I>(&self, records: I) -> Result<IndexSummary>
    where
        I: IntoIterator<Item = Record<P>>,
        E: EmbeddingFunction<P>,
    {
        let mut records = records.into_iter().peekable();
        if records.peek().is_none() {
            return Err(VectorsError::EmptyInput);
        }

        let mut accumulator = BatchAccumulator::new(self.options.batch_size)?;
        let mut writer = StreamWriter::create(self.options.staging_dir.as_deref())?;
        let mut dimension = Dimension::Unset;
        let mut ids = Vec::new();

        for record in records {
            let mut vector = (*self.embedder)
                .embed(&record.payload)
                .map_err(|source| VectorsError::Model {
                    id: record.id.clone(),
                    source,
                })?;
            dimension.observe(&record.id, vector.len())?;
            if self.options.normalize {
                normalize_vector(&mut vector);
            }

            ids.push(record.id.clone());
            let entry = BatchEntry {
                id: record.id,
                vector,
                metadata: record.metadata,
            };
            if let Some(batch) = accumulator.add(entry) {
                writer.write(&batch)?;
                debug!(batch = writer.batches(), records = batch.len(), "flushed batch");
            }
        }

        if let Some(batch) = accumulator.flush() {
            writer.write(&batch)?;
            debug!(batch = writer.batches(), records = batch.len(), "flushed final batch");
        }

        let dimension = dimension.get().ok_or(VectorsError::EmptyInput)?;
        let batch_count = writer.batches();
        let stream = writer.finalize()?;
        info!(
            records = ids.len(),
            dimension,
            batches = batch_count,
            stream = %stream.path().display(),
            "indexed records"
        );

        Ok(IndexSummary {
            ids,
            dimension,
            batch_count,
            stream,
        })
    }
}
