//! Embedding boundary: payload in, fixed-length vector out.

use crate::error::ModelError;

/// Computes an embedding for a record payload.
///
/// Implementations are shared across indexing calls, so `embed` takes
/// `&self` and must not change observable state.
pub trait EmbeddingFunction<P: ?Sized>: Send + Sync {
    fn embed(&self, payload: &P) -> Result<Vec<f32>, ModelError>;
}

/// Payloads that already are vectors (the "external" method).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalVectors;

impl<P> EmbeddingFunction<P> for ExternalVectors
where
    P: AsRef<[f32]> + ?Sized,
{
    fn embed(&self, payload: &P) -> Result<Vec<f32>, ModelError> {
        Ok(payload.as_ref().to_vec())
    }
}

/// Wraps a caller-supplied transform function.
pub struct Transform<F> {
    f: F,
}

impl<F> Transform<F> {
    pub fn new<P>(f: F) -> Self
    where
        P: ?Sized,
        F: Fn(&P) -> Result<Vec<f32>, ModelError> + Send + Sync,
    {
        Self { f }
    }
}

impl<P, F> EmbeddingFunction<P> for Transform<F>
where
    P: ?Sized,
    F: Fn(&P) -> Result<Vec<f32>, ModelError> + Send + Sync,
{
    fn embed(&self, payload: &P) -> Result<Vec<f32>, ModelError> {
        (self.f)(payload)
    }
}

impl<P, E> EmbeddingFunction<P> for std::sync::Arc<E>
where
    P: ?Sized,
    E: EmbeddingFunction<P> + ?Sized,
{
    fn embed(&self, payload: &P) -> Result<Vec<f32>, ModelError> {
        (**self).embed(payload)
    }
}

/// Normalize a vector in-place (L2 normalization). Zero vectors are left as-is.
pub fn normalize_vector(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
