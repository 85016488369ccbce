//! Bounded in-memory buffering of embedded records.

use serde_json::Value;
use vx_core::RecordId;

use crate::error::{Result, VectorsError};

/// One embedded record.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub id: RecordId,
    pub vector: Vec<f32>,
    pub metadata: Option<Value>,
}

/// An ordered group of entries flushed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub entries: Vec<BatchEntry>,
}

impl Batch {
    pub fn new(entries: Vec<BatchEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector length of the entries, `0` for an empty batch.
    pub fn dimension(&self) -> usize {
        self.entries.first().map(|e| e.vector.len()).unwrap_or(0)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.entries.iter().map(|e| &e.id)
    }
}

/// Collects entries until `capacity` is reached, then hands back a full batch.
#[derive(Debug)]
pub struct BatchAccumulator {
    capacity: usize,
    buffer: Vec<BatchEntry>,
}

impl BatchAccumulator {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(VectorsError::InvalidBatchSize(capacity));
        }
        Ok(Self {
            capacity,
            buffer: Vec::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Buffer an entry. Returns the full batch once the cap is hit.
    pub fn add(&mut self, entry: BatchEntry) -> Option<Batch> {
        self.buffer.push(entry);
        if self.buffer.len() >= self.capacity {
            self.flush()
        } else {
            None
        }
    }

    /// Drain whatever is buffered. `None` when empty.
    pub fn flush(&mut self) -> Option<Batch> {
        if self.buffer.is_empty() {
            return None;
        }
        let entries = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.capacity));
        Some(Batch::new(entries))
    }
}
