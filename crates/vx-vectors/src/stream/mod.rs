//! Durable staging of flushed batches.

mod codec;
mod reader;
mod writer;

pub use reader::StreamReader;
pub use writer::StreamWriter;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Reference to a finalized stream file. Owned by the caller; reading
/// through it never mutates the file.
#[derive(Debug, PartialEq, Eq)]
pub struct StreamHandle {
    path: PathBuf,
}

impl StreamHandle {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Size of the stream file in bytes.
    pub fn size(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    /// Open a fresh reader positioned at the first batch.
    pub fn open(&self) -> Result<StreamReader> {
        StreamReader::open(&self.path)
    }

    /// Delete the stream file.
    pub fn remove(self) -> Result<()> {
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for StreamHandle {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
