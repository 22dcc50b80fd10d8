//! Transformer capability seam.
//!
//! Transformers mutate a container's rows in place. Statefulness is an
//! explicit two-trait split decided at the type level rather than probed
//! at runtime: a plain [`Transform`] carries no fit state, while a
//! [`StatefulTransform`] must be fitted before (or during) its first
//! application. The containers fit an unfitted stateful transformer
//! exactly once per `apply_stateful` call, against their own rows.

use crate::dataset::Row;
use crate::error::Result;

/// A stateless row transformer.
pub trait Transform: Send + Sync {
    /// Mutates the rows in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform cannot be applied.
    fn transform(&self, rows: &mut Vec<Row>) -> Result<()>;
}

/// A transformer that must be fitted against a dataset's rows before it
/// can transform.
pub trait StatefulTransform: Transform {
    /// Fits the transformer against the given rows.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, rows: &[Row]) -> Result<()>;

    /// True once the transformer has been fitted.
    fn is_fitted(&self) -> bool;
}

impl Transform for Box<dyn Transform> {
    fn transform(&self, rows: &mut Vec<Row>) -> Result<()> {
        (**self).transform(rows)
    }
}
