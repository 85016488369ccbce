use vx_core::RecordId;

use crate::error::{Result, VectorsError};

/// Embedding dimension of one indexing call: discovered from the first
/// vector, then enforced on every later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    #[default]
    Unset,
    Fixed(usize),
}

impl Dimension {
    /// Check `len` against the fixed dimension, fixing it on first use.
    pub fn observe(&mut self, id: &RecordId, len: usize) -> Result<usize> {
        match *self {
            Self::Unset => {
                if len == 0 {
                    return Err(VectorsError::ZeroDimension { id: id.clone() });
                }
                *self = Self::Fixed(len);
                Ok(len)
            }
            Self::Fixed(expected) if expected == len => Ok(len),
            Self::Fixed(expected) => Err(VectorsError::DimensionMismatch {
                id: id.clone(),
                expected,
                got: len,
            }),
        }
    }

    pub fn get(&self) -> Option<usize> {
        match self {
            Self::Unset => None,
            Self::Fixed(n) => Some(*n),
        }
    }
}
