use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{codec, StreamHandle};
use crate::batch::Batch;
use crate::error::{Result, VectorsError};

/// Append-only sink for flushed batches.
///
/// The file lives as a named temp file until [`StreamWriter::finalize`]
/// persists it. A writer dropped before that deletes its partial file.
pub struct StreamWriter {
    file: Option<BufWriter<NamedTempFile>>,
    path: PathBuf,
    batches: usize,
    records: usize,
}

impl StreamWriter {
    /// Create a staging file in `dir`, or in the system temp dir.
    pub fn create(dir: Option<&Path>) -> Result<Self> {
        let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        let tmp = tempfile::Builder::new()
            .prefix("vx-stream-")
            .suffix(".vxs")
            .tempfile_in(&dir)
            .map_err(|source| VectorsError::SinkUnavailable { path: dir, source })?;
        let path = tmp.path().to_path_buf();

        let mut file = BufWriter::new(tmp);
        codec::write_header(&mut file)
            .and_then(|_| file.flush())
            .map_err(|source| sink_unavailable(&path, source))?;
        debug!(path = %path.display(), "created stream");

        Ok(Self {
            file: Some(file),
            path,
            batches: 0,
            records: 0,
        })
    }

    /// Append one batch. Empty batches are ignored and not counted.
    pub fn write(&mut self, batch: &Batch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let frame = codec::encode_batch(batch)?;
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| VectorsError::Corrupt("stream already finalized".into()))?;
        file.write_all(&frame)
            .and_then(|_| file.flush())
            .map_err(|source| sink_unavailable(&self.path, source))?;
        self.batches += 1;
        self.records += batch.len();
        Ok(())
    }

    /// Batches written so far.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush, sync and persist the file, giving up write access.
    pub fn finalize(mut self) -> Result<StreamHandle> {
        let path = self.path.clone();
        let file = self
            .file
            .take()
            .ok_or_else(|| VectorsError::Corrupt("stream already finalized".into()))?;
        let tmp = file
            .into_inner()
            .map_err(|e| sink_unavailable(&path, e.into_error()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|source| sink_unavailable(&path, source))?;
        let (_file, kept) = tmp
            .keep()
            .map_err(|e| sink_unavailable(&path, e.error))?;
        debug!(path = %kept.display(), batches = self.batches, records = self.records, "finalized stream");
        Ok(StreamHandle::new(kept))
    }
}

impl Drop for StreamWriter {
    fn drop(&mut self) {
        if self.file.is_some() {
            warn!(path = %self.path.display(), batches = self.batches, "discarding unfinished stream");
        }
    }
}

fn sink_unavailable(path: &Path, source: std::io::Error) -> VectorsError {
    VectorsError::SinkUnavailable {
        path: path.to_path_buf(),
        source,
    }
}
