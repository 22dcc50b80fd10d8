//! muestra - Typed In-Memory Datasets for Supervised Learning
//!
//! A small, self-contained container library for tabular training data.
//! Datasets hold fixed-width rows of continuous and categorical values,
//! optionally paired with one label per row, and offer the resampling,
//! partitioning, and stratification primitives that learners and
//! cross-validators are built on.
//!
//! # Design Principles
//!
//! 1. **Typed columns** - Every column is continuous or categorical,
//!    detected from the data and enforced at construction
//! 2. **Lockstep labels** - Labeled datasets reorder, subset, and
//!    extract rows and labels together, always
//! 3. **Reproducible randomness** - Every randomized operation takes an
//!    optional seed
//! 4. **Sublinear weighted sampling** - Two-level bucket sampler with
//!    integer weights, O(sqrt n) per draw
//!
//! # Quick Start
//!
//! ```
//! use muestra::{Dataset, Labeled, Value};
//!
//! let dataset = Labeled::new(
//!     vec![
//!         vec![Value::Float(5.1), Value::Float(3.5)],
//!         vec![Value::Float(4.9), Value::Float(3.0)],
//!         vec![Value::Float(6.2), Value::Float(2.9)],
//!         vec![Value::Float(6.4), Value::Float(3.2)],
//!     ],
//!     vec![
//!         Value::from("setosa"),
//!         Value::from("setosa"),
//!         Value::from("virginica"),
//!         Value::from("virginica"),
//!     ],
//! )
//! .unwrap();
//!
//! // Split preserving class proportions.
//! let (train, test) = dataset.stratified_split(0.5).unwrap();
//! assert_eq!(train.len(), 2);
//! assert_eq!(test.len(), 2);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::redundant_clone,
        clippy::too_many_lines,
        clippy::float_cmp,
        clippy::similar_names,
        clippy::unreadable_literal
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::module_name_repetitions)]

pub mod dataset;
pub mod error;
pub mod export;
pub mod kernel;
pub mod labeled;
pub mod stats;
pub mod transform;
pub mod unlabeled;
pub mod value;
pub mod weighted;

// Re-exports for convenience
pub use dataset::{Dataset, Row};
pub use error::{Error, Result};
pub use export::{Exporter, JsonLinesExporter};
pub use kernel::Kernel;
pub use labeled::Labeled;
pub use stats::{CategoryFrequency, ColumnSummary};
pub use transform::{StatefulTransform, Transform};
pub use unlabeled::Unlabeled;
pub use value::{Value, ValueKind};
pub use weighted::WeightedSampler;
