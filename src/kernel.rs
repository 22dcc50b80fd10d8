//! Distance kernel capability seam.
//!
//! Kernels are consumed only by
//! [`Dataset::spatial_split`](crate::Dataset::spatial_split); their
//! internals are the caller's concern.

use crate::error::Result;
use crate::value::Value;

/// A distance function between two rows.
pub trait Kernel: Send + Sync {
    /// Computes a non-negative distance between `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the distance is undefined for the inputs
    /// (e.g. mismatched dimensions).
    fn compute(&self, a: &[Value], b: &[Value]) -> Result<f64>;
}
