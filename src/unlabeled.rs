//! The unlabeled container.
//!
//! [`Unlabeled`] owns a row-major sample matrix and enforces the column
//! discipline: every row has the same width, and every value in a column
//! shares the type detected for that column in row 0. Construction is
//! either validated (O(rows × columns) scan) or trusted (caller
//! guarantees the invariant, used internally by derivations that cannot
//! break it).

use std::collections::HashSet;

use crate::dataset::{Dataset, Row};
use crate::error::{Error, Result};
use crate::export::Exporter;
use crate::stats::{summarize, ColumnSummary};
use crate::transform::{StatefulTransform, Transform};
use crate::value::{Value, ValueKey, ValueKind};

/// Scans rows for the container invariant: constant width, per-column
/// type homogeneity against row 0, no invalid values.
pub(crate) fn validate_rows(rows: &[Row]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    let width = first.len();
    let mut expected = Vec::with_capacity(width);
    for (column, value) in first.iter().enumerate() {
        let kind = ValueKind::of(value);
        if kind == ValueKind::Other {
            return Err(Error::InvalidValue { row: 0, column });
        }
        expected.push(kind);
    }

    for (row, values) in rows.iter().enumerate().skip(1) {
        if values.len() != width {
            return Err(Error::RaggedRow {
                row,
                expected: width,
                actual: values.len(),
            });
        }
        for (column, value) in values.iter().enumerate() {
            let actual = ValueKind::of(value);
            if actual != expected[column] {
                return Err(Error::TypeMismatch {
                    row,
                    column,
                    expected: expected[column],
                    actual,
                });
            }
        }
    }

    Ok(())
}

pub(crate) fn row_key(row: &[Value]) -> Vec<ValueKey> {
    row.iter().map(Value::key).collect()
}

/// An in-memory dataset of fixed-width sample rows.
///
/// # Example
///
/// ```
/// use muestra::{Dataset, Unlabeled, Value};
///
/// let dataset = Unlabeled::new(vec![
///     vec![Value::Int(1), Value::Int(2)],
///     vec![Value::Int(3), Value::Int(4)],
/// ])
/// .unwrap();
///
/// assert_eq!(dataset.shape(), (2, 2));
/// let (front, back) = dataset.split(0.5).unwrap();
/// assert_eq!(front.len(), 1);
/// assert_eq!(back.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unlabeled {
    rows: Vec<Row>,
}

impl Unlabeled {
    /// Validated construction: scans every row for the container
    /// invariant.
    ///
    /// # Errors
    ///
    /// Returns an error identifying the offending row (and column, for
    /// type mismatches) if any row is ragged, any value's type differs
    /// from its column's, or any value is invalid.
    pub fn new(rows: Vec<Row>) -> Result<Self> {
        validate_rows(&rows)?;
        Ok(Self { rows })
    }

    /// Trusted construction: stores the rows as given, no scan. The
    /// caller is responsible for the container invariant.
    pub fn trusted(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// A single row by offset.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is out of range.
    pub fn row(&self, offset: usize) -> Result<&Row> {
        self.rows
            .get(offset)
            .ok_or_else(|| Error::row_out_of_bounds(offset, self.rows.len()))
    }

    /// A single column by offset, gathered with a linear scan.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is out of range.
    pub fn column(&self, offset: usize) -> Result<Vec<Value>> {
        if offset >= self.columns() {
            return Err(Error::column_out_of_bounds(offset, self.columns()));
        }
        Ok(self.rows.iter().map(|row| row[offset].clone()).collect())
    }

    /// Per-column type vector, derived from row 0. Empty for an empty
    /// container.
    pub fn column_types(&self) -> Vec<ValueKind> {
        self.rows
            .first()
            .map(|row| row.iter().map(ValueKind::of).collect())
            .unwrap_or_default()
    }

    /// The type of one column.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is empty or `offset` is out of
    /// range.
    pub fn column_type(&self, offset: usize) -> Result<ValueKind> {
        let first = self.rows.first().ok_or(Error::EmptyDataset)?;
        first
            .get(offset)
            .map(ValueKind::of)
            .ok_or_else(|| Error::column_out_of_bounds(offset, first.len()))
    }

    /// The distinct column types present, in first-appearance order.
    pub fn types(&self) -> Vec<ValueKind> {
        let mut seen = Vec::new();
        for kind in self.column_types() {
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        seen
    }

    /// True if every column shares one type.
    pub fn homogeneous(&self) -> bool {
        self.types().len() == 1
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.columns())
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.len() * self.columns()
    }

    /// Full column-major copy of the data.
    pub fn transpose(&self) -> Vec<Vec<Value>> {
        (0..self.columns())
            .map(|column| self.rows.iter().map(|row| row[column].clone()).collect())
            .collect()
    }

    /// The columns whose type matches `kind`, in column order.
    pub fn columns_by_type(&self, kind: ValueKind) -> Vec<Vec<Value>> {
        self.column_types()
            .into_iter()
            .enumerate()
            .filter(|(_, k)| *k == kind)
            .map(|(offset, _)| self.rows.iter().map(|row| row[offset].clone()).collect())
            .collect()
    }

    /// Descriptive statistics per column: moments and percentiles for
    /// continuous columns, frequencies for categorical ones.
    ///
    /// # Errors
    ///
    /// Propagates column access failures; an empty container yields an
    /// empty vector.
    pub fn describe(&self) -> Result<Vec<ColumnSummary>> {
        (0..self.columns())
            .map(|offset| summarize(&self.column(offset)?))
            .collect()
    }

    /// Materializes `producer` over every row into a new validated
    /// container.
    ///
    /// # Errors
    ///
    /// Returns an error if the produced rows violate the container
    /// invariant.
    pub fn map<F>(&self, mut producer: F) -> Result<Self>
    where
        F: FnMut(&Row) -> Row,
    {
        Self::new(self.rows.iter().map(|row| producer(row)).collect())
    }

    /// New container holding the rows for which `predicate` returns true.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Row) -> bool,
    {
        Self::trusted(
            self.rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        )
    }

    /// Applies a stateless transformer to this container's own rows and
    /// returns the same instance for chaining.
    ///
    /// # Errors
    ///
    /// Propagates transformer failures.
    pub fn apply(&mut self, transform: &dyn Transform) -> Result<&mut Self> {
        transform.transform(&mut self.rows)?;
        Ok(self)
    }

    /// Applies a stateful transformer, fitting it against this
    /// container's rows first if it is not yet fitted.
    ///
    /// # Errors
    ///
    /// Propagates fit and transform failures.
    pub fn apply_stateful(&mut self, transform: &mut dyn StatefulTransform) -> Result<&mut Self> {
        if !transform.is_fitted() {
            transform.fit(&self.rows)?;
        }
        transform.transform(&mut self.rows)?;
        Ok(self)
    }

    /// Forward, single-pass iterator over copies of the rows. Restart by
    /// calling again.
    pub fn iter_rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.rows.iter().cloned()
    }

    /// Feeds every row to the export collaborator.
    ///
    /// # Errors
    ///
    /// Propagates exporter failures.
    pub fn export_to(&self, exporter: &mut dyn Exporter) -> Result<()> {
        exporter.export(&mut self.iter_rows())
    }

    /// Column-wise concatenation into a new container.
    ///
    /// # Errors
    ///
    /// Returns an error if the row counts differ.
    pub fn join(&self, other: &Self) -> Result<Self> {
        if self.len() != other.len() {
            return Err(Error::RowCountMismatch {
                left: self.len(),
                right: other.len(),
            });
        }

        Ok(Self::trusted(
            self.rows
                .iter()
                .zip(&other.rows)
                .map(|(a, b)| a.iter().chain(b).cloned().collect())
                .collect(),
        ))
    }

    /// Consumes the container and returns its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl Dataset for Unlabeled {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self::trusted(indices.iter().map(|&i| self.rows[i].clone()).collect())
    }

    fn extract(&mut self, offset: usize, n: usize) -> Self {
        Self::trusted(self.rows.drain(offset..offset + n).collect())
    }

    fn permute(&mut self, perm: &[usize]) -> &mut Self {
        let mut old = std::mem::take(&mut self.rows);
        self.rows = perm.iter().map(|&i| std::mem::take(&mut old[i])).collect();
        self
    }

    fn merge(&self, other: &Self) -> Result<Self> {
        if !self.is_empty() && !other.is_empty() && self.columns() != other.columns() {
            return Err(Error::ColumnCountMismatch {
                left: self.columns(),
                right: other.columns(),
            });
        }

        let mut rows = self.rows.clone();
        rows.extend(other.rows.iter().cloned());
        Ok(Self::trusted(rows))
    }

    fn deduplicate(&mut self) -> &mut Self {
        let mut seen = HashSet::new();
        let keep: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| seen.insert(row_key(row)))
            .map(|(i, _)| i)
            .collect();

        if keep.len() != self.rows.len() {
            *self = self.select(&keep);
        }
        self
    }
}
