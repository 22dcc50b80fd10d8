//! Error types for muestra.

use crate::value::ValueKind;

/// Result type alias for muestra operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in muestra operations.
///
/// Every variant is raised synchronously at the point of detection and
/// carries enough context (offending offsets, expected vs. actual) to
/// diagnose the bad input without a debugger.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A row does not match the column count established by the first row.
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        /// Offset of the offending row.
        row: usize,
        /// Column count established by the first row.
        expected: usize,
        /// Column count of the offending row.
        actual: usize,
    },

    /// A value does not match the type established for its column.
    #[error("value at row {row}, column {column} is {actual}, expected {expected}")]
    TypeMismatch {
        /// Offset of the offending row.
        row: usize,
        /// Offset of the offending column.
        column: usize,
        /// Type established by the first row.
        expected: ValueKind,
        /// Detected type of the offending value.
        actual: ValueKind,
    },

    /// A value is neither continuous nor categorical (e.g. a non-finite
    /// float).
    #[error("value at row {row}, column {column} is neither continuous nor categorical")]
    InvalidValue {
        /// Offset of the offending row.
        row: usize,
        /// Offset of the offending column.
        column: usize,
    },

    /// Index out of bounds when accessing rows or columns.
    #[error("index {index} out of bounds for {len} {axis}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The actual extent of the axis.
        len: usize,
        /// The axis being indexed ("rows" or "columns").
        axis: &'static str,
    },

    /// A signed row offset resolves outside the container.
    #[error("offset {offset} out of bounds for {len} rows")]
    OffsetOutOfBounds {
        /// The offset as the caller passed it, sign included.
        offset: isize,
        /// Number of rows in the container.
        len: usize,
    },

    /// Label count does not match row count.
    #[error("{labels} labels provided for {rows} rows")]
    LabelCountMismatch {
        /// Number of labels provided.
        labels: usize,
        /// Number of rows in the container.
        rows: usize,
    },

    /// A label is not a valid continuous or categorical value, or does not
    /// match the label type established by the first label.
    #[error("label at offset {row} is {actual}, expected {expected}")]
    InvalidLabel {
        /// Offset of the offending label.
        row: usize,
        /// Label type established by the first label.
        expected: ValueKind,
        /// Detected type of the offending label.
        actual: ValueKind,
    },

    /// A label cannot be used as a stratum key.
    #[error("label at offset {row} is not categorical or integer-valued")]
    InvalidStratumLabel {
        /// Offset of the offending label.
        row: usize,
    },

    /// Label types differ between two containers being merged.
    #[error("label types differ: {expected} vs {actual}")]
    LabelKindMismatch {
        /// Label type of the left-hand container.
        expected: ValueKind,
        /// Label type of the right-hand container.
        actual: ValueKind,
    },

    /// Column counts differ between two non-empty containers being merged.
    #[error("column counts differ: {left} vs {right}")]
    ColumnCountMismatch {
        /// Column count of the left-hand container.
        left: usize,
        /// Column count of the right-hand container.
        right: usize,
    },

    /// Row counts differ between two containers being joined.
    #[error("row counts differ: {left} vs {right}")]
    RowCountMismatch {
        /// Row count of the left-hand container.
        left: usize,
        /// Row count of the right-hand container.
        right: usize,
    },

    /// Split ratio outside the unit interval.
    #[error("ratio {ratio} is outside [0, 1]")]
    InvalidRatio {
        /// The offending ratio.
        ratio: f64,
    },

    /// Weight count does not match row count.
    #[error("{weights} weights provided for {rows} rows")]
    WeightCountMismatch {
        /// Number of weights provided.
        weights: usize,
        /// Number of rows in the container.
        rows: usize,
    },

    /// A sampling weight is negative or non-finite.
    #[error("weight at offset {index} is invalid: {weight}")]
    InvalidWeight {
        /// Offset of the offending weight.
        index: usize,
        /// The offending weight.
        weight: f64,
    },

    /// The sampling weights sum outside the finite `f64` range.
    #[error("weights sum to {total}, expected a finite total")]
    InvalidTotalWeight {
        /// The computed sum.
        total: f64,
    },

    /// All sampling weights are zero.
    #[error("weights sum to zero")]
    ZeroTotalWeight,

    /// Operation attempted on an empty container where the result is
    /// undefined.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Invalid argument to an operation.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// Transformer capability error.
    #[error("transform error: {message}")]
    Transform {
        /// Description of the transform error.
        message: String,
    },

    /// Distance kernel capability error.
    #[error("kernel error: {message}")]
    Kernel {
        /// Description of the kernel error.
        message: String,
    },

    /// Export collaborator error.
    #[error("export error: {message}")]
    Export {
        /// Description of the export error.
        message: String,
    },
}

impl Error {
    /// Create an out-of-bounds error for a row offset.
    pub fn row_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index,
            len,
            axis: "rows",
        }
    }

    /// Create an out-of-bounds error for a column offset.
    pub fn column_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index,
            len,
            axis: "columns",
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a transform error.
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }

    /// Create a kernel error.
    pub fn kernel(message: impl Into<String>) -> Self {
        Self::Kernel {
            message: message.into(),
        }
    }

    /// Create an export error.
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }
}
