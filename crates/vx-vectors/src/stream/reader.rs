use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::codec;
use crate::batch::Batch;
use crate::error::Result;

/// Iterates the batches of a finalized stream in write order.
pub struct StreamReader {
    inner: BufReader<File>,
    path: PathBuf,
    done: bool,
}

impl StreamReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut inner = BufReader::new(File::open(&path)?);
        codec::read_header(&mut inner)?;
        Ok(Self {
            inner,
            path,
            done: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for StreamReader {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match codec::read_batch(&mut self.inner) {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
