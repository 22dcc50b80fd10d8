//! The labeled container.
//!
//! [`Labeled`] pairs a sample matrix with one outcome per row and keeps
//! the two in lockstep through every reorder, subset, and extraction.
//! Labels are continuous or categorical, never invalid, and all share
//! one type. Label identity is positional: labels travel with their
//! rows, never sorted or grouped independently.

use std::collections::HashMap;

use crate::dataset::{Dataset, Row};
use crate::error::{Error, Result};
use crate::export::Exporter;
use crate::stats::ColumnSummary;
use crate::transform::{StatefulTransform, Transform};
use crate::unlabeled::{row_key, validate_rows, Unlabeled};
use crate::value::{Value, ValueKey, ValueKind};

fn validate_labels(labels: &[Value], rows: usize) -> Result<()> {
    if labels.len() != rows {
        return Err(Error::LabelCountMismatch {
            labels: labels.len(),
            rows,
        });
    }

    let Some(first) = labels.first() else {
        return Ok(());
    };
    let expected = ValueKind::of(first);
    if expected == ValueKind::Other {
        return Err(Error::InvalidLabel {
            row: 0,
            expected: ValueKind::Continuous,
            actual: ValueKind::Other,
        });
    }

    for (row, label) in labels.iter().enumerate().skip(1) {
        let actual = ValueKind::of(label);
        if actual != expected {
            return Err(Error::InvalidLabel {
                row,
                expected,
                actual,
            });
        }
    }

    Ok(())
}

/// A dataset whose rows each carry an outcome.
///
/// # Example
///
/// ```
/// use muestra::{Dataset, Labeled, Value};
///
/// let dataset = Labeled::new(
///     vec![
///         vec![Value::Int(1), Value::Int(2)],
///         vec![Value::Int(3), Value::Int(4)],
///     ],
///     vec![Value::from("a"), Value::from("b")],
/// )
/// .unwrap();
///
/// let (front, back) = dataset.split(0.5).unwrap();
/// assert_eq!(front.labels(), &[Value::from("a")]);
/// assert_eq!(back.labels(), &[Value::from("b")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labeled {
    rows: Vec<Row>,
    labels: Vec<Value>,
}

impl Labeled {
    /// Validated construction: scans rows for the container invariant
    /// and labels for count and type homogeneity.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows violate the container invariant, the
    /// label count differs from the row count, any label is invalid, or
    /// the labels mix types.
    pub fn new(rows: Vec<Row>, labels: Vec<Value>) -> Result<Self> {
        validate_rows(&rows)?;
        validate_labels(&labels, rows.len())?;
        Ok(Self { rows, labels })
    }

    /// Trusted construction: no scan, the caller guarantees both
    /// invariants.
    pub fn trusted(rows: Vec<Row>, labels: Vec<Value>) -> Self {
        Self { rows, labels }
    }

    /// All labels, in row order.
    pub fn labels(&self) -> &[Value] {
        &self.labels
    }

    /// The label for one row.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is out of range.
    pub fn label(&self, offset: usize) -> Result<&Value> {
        self.labels
            .get(offset)
            .ok_or_else(|| Error::row_out_of_bounds(offset, self.labels.len()))
    }

    /// The type shared by all labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is empty.
    pub fn label_kind(&self) -> Result<ValueKind> {
        self.labels
            .first()
            .map(ValueKind::of)
            .ok_or(Error::EmptyDataset)
    }

    /// The distinct labels, in first-appearance order. Integer and
    /// integral-float labels of equal value count as one class.
    pub fn classes(&self) -> Vec<Value> {
        let mut seen = Vec::new();
        let mut classes = Vec::new();
        for label in &self.labels {
            let key = label.key();
            if !seen.contains(&key) {
                seen.push(key);
                classes.push(label.clone());
            }
        }
        classes
    }

    /// Rewrites every label through `producer`. The assignment is
    /// atomic: on failure the container keeps its original labels.
    ///
    /// # Errors
    ///
    /// Returns an error if any produced label is invalid or the produced
    /// labels mix types.
    pub fn transform_labels<F>(&mut self, mut producer: F) -> Result<&mut Self>
    where
        F: FnMut(&Value) -> Value,
    {
        let labels: Vec<Value> = self.labels.iter().map(|label| producer(label)).collect();
        validate_labels(&labels, self.rows.len())?;
        self.labels = labels;
        Ok(self)
    }

    /// Sorts rows and labels together by label value. Stable.
    pub fn sort_by_label(&mut self, descending: bool) -> &mut Self {
        let mut perm: Vec<usize> = (0..self.labels.len()).collect();
        perm.sort_by(|&a, &b| {
            let ord = self.labels[a].total_cmp(&self.labels[b]);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
        self.permute(&perm)
    }

    /// Groups rows by label into one container per distinct label, in
    /// first-appearance order. Row order within each stratum follows the
    /// source.
    ///
    /// # Errors
    ///
    /// Returns an error identifying the offending offset if any label is
    /// not categorical or integer-valued.
    pub fn stratify(&self) -> Result<Vec<(Value, Labeled)>> {
        let strata = self.strata_indices()?;
        Ok(strata
            .into_iter()
            .map(|(label, indices)| (label, self.select(&indices)))
            .collect())
    }

    /// Splits so that each side preserves the label proportions of the
    /// whole: every stratum is split at `floor(stratum_len * ratio)` and
    /// the per-stratum pieces are concatenated per side.
    ///
    /// # Errors
    ///
    /// Returns an error if `ratio` is outside `[0, 1]` or any label
    /// cannot form a stratum.
    pub fn stratified_split(&self, ratio: f64) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::InvalidRatio { ratio });
        }

        let mut left = Vec::new();
        let mut right = Vec::new();
        for (_, indices) in self.strata_indices()? {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let pivot = (indices.len() as f64 * ratio).floor() as usize;
            left.extend_from_slice(&indices[..pivot]);
            right.extend_from_slice(&indices[pivot..]);
        }

        Ok((self.select(&left), self.select(&right)))
    }

    /// Partitions into `k` folds of equal label proportions. Each
    /// stratum contributes `stratum_len / k` rows per fold; remainder
    /// rows are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `k < 2` or any label cannot form a stratum.
    pub fn stratified_fold(&self, k: usize) -> Result<Vec<Self>> {
        if k < 2 {
            return Err(Error::invalid_argument(format!(
                "cannot create {k} folds, need at least 2"
            )));
        }

        let strata = self.strata_indices()?;
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); k];
        for (_, indices) in &strata {
            let per_fold = indices.len() / k;
            for (fold, chunk) in folds.iter_mut().zip(indices.chunks(per_fold.max(1))) {
                if per_fold > 0 {
                    fold.extend_from_slice(chunk);
                }
            }
        }

        Ok(folds.iter().map(|indices| self.select(indices)).collect())
    }

    /// Descriptive statistics per column, computed separately for each
    /// stratum. Returns `(label, per-column summaries)` pairs in
    /// first-appearance order.
    ///
    /// # Errors
    ///
    /// Returns an error if any label cannot form a stratum or a summary
    /// cannot be computed.
    pub fn describe_by_label(&self) -> Result<Vec<(Value, Vec<ColumnSummary>)>> {
        self.stratify()?
            .into_iter()
            .map(|(label, stratum)| Ok((label, stratum.features().describe()?)))
            .collect()
    }

    /// Materializes `producer` over every row, keeping labels in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the produced rows violate the container
    /// invariant.
    pub fn map<F>(&self, mut producer: F) -> Result<Self>
    where
        F: FnMut(&Row) -> Row,
    {
        let rows: Vec<Row> = self.rows.iter().map(|row| producer(row)).collect();
        validate_rows(&rows)?;
        Ok(Self::trusted(rows, self.labels.clone()))
    }

    /// New container holding the row/label pairs for which `predicate`
    /// returns true.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Row, &Value) -> bool,
    {
        let (rows, labels) = self
            .rows
            .iter()
            .zip(&self.labels)
            .filter(|(row, label)| predicate(row, label))
            .map(|(row, label)| (row.clone(), label.clone()))
            .unzip();
        Self::trusted(rows, labels)
    }

    /// Applies a stateless transformer to the sample rows. Labels are
    /// untouched.
    ///
    /// # Errors
    ///
    /// Propagates transformer failures.
    pub fn apply(&mut self, transform: &dyn Transform) -> Result<&mut Self> {
        transform.transform(&mut self.rows)?;
        Ok(self)
    }

    /// Applies a stateful transformer, fitting it against the sample
    /// rows first if it is not yet fitted.
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

    /// Forward, single-pass iterator over copies of the rows with the
    /// label appended as the last element.
    pub fn iter_rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.rows.iter().zip(&self.labels).map(|(row, label)| {
            let mut joined = row.clone();
            joined.push(label.clone());
            joined
        })
    }

    /// Feeds every labeled row (label last) to the export collaborator.
    ///
    /// # Errors
    ///
    /// Propagates exporter failures.
    pub fn export_to(&self, exporter: &mut dyn Exporter) -> Result<()> {
        exporter.export(&mut self.iter_rows())
    }

    /// Column-wise concatenation with an unlabeled container, keeping
    /// this container's labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the row counts differ.
    pub fn join(&self, other: &Unlabeled) -> Result<Self> {
        if self.len() != other.len() {
            return Err(Error::RowCountMismatch {
                left: self.len(),
                right: other.len(),
            });
        }

        let rows = self
            .rows
            .iter()
            .zip(other.rows())
            .map(|(a, b)| a.iter().chain(b).cloned().collect())
            .collect();
        Ok(Self::trusted(rows, self.labels.clone()))
    }

    /// The sample rows alone, as an unlabeled container.
    pub fn features(&self) -> Unlabeled {
        Unlabeled::trusted(self.rows.clone())
    }

    /// Consumes the container and returns `(rows, labels)`.
    pub fn into_parts(self) -> (Vec<Row>, Vec<Value>) {
        (self.rows, self.labels)
    }

    /// Per-label row index groups in first-appearance order. Fails on
    /// labels without a discrete identity (non-integral floats).
    fn strata_indices(&self) -> Result<Vec<(Value, Vec<usize>)>> {
        let mut order: Vec<(Value, Vec<usize>)> = Vec::new();
        let mut by_key: HashMap<ValueKey, usize> = HashMap::new();

        for (row, label) in self.labels.iter().enumerate() {
            if !label.is_stratum_key() {
                return Err(Error::InvalidStratumLabel { row });
            }
            let key = label.key();
            if let Some(&slot) = by_key.get(&key) {
                order[slot].1.push(row);
            } else {
                by_key.insert(key, order.len());
                order.push((label.clone(), vec![row]));
            }
        }

        Ok(order)
    }
}

impl Dataset for Labeled {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self::trusted(
            indices.iter().map(|&i| self.rows[i].clone()).collect(),
            indices.iter().map(|&i| self.labels[i].clone()).collect(),
        )
    }

    fn extract(&mut self, offset: usize, n: usize) -> Self {
        Self::trusted(
            self.rows.drain(offset..offset + n).collect(),
            self.labels.drain(offset..offset + n).collect(),
        )
    }

    fn permute(&mut self, perm: &[usize]) -> &mut Self {
        let mut rows = std::mem::take(&mut self.rows);
        let mut labels = std::mem::take(&mut self.labels);
        self.rows = perm.iter().map(|&i| std::mem::take(&mut rows[i])).collect();
        self.labels = perm
            .iter()
            .map(|&i| std::mem::replace(&mut labels[i], Value::Int(0)))
            .collect();
        self
    }

    fn merge(&self, other: &Self) -> Result<Self> {
        if !self.is_empty() && !other.is_empty() {
            if self.columns() != other.columns() {
                return Err(Error::ColumnCountMismatch {
                    left: self.columns(),
                    right: other.columns(),
                });
            }
            let (expected, actual) = (self.label_kind()?, other.label_kind()?);
            if expected != actual {
                return Err(Error::LabelKindMismatch { expected, actual });
            }
        }

        let mut rows = self.rows.clone();
        rows.extend(other.rows.iter().cloned());
        let mut labels = self.labels.clone();
        labels.extend(other.labels.iter().cloned());
        Ok(Self::trusted(rows, labels))
    }

    fn deduplicate(&mut self) -> &mut Self {
        let mut seen = std::collections::HashSet::new();
        let keep: Vec<usize> = self
            .rows
            .iter()
            .zip(&self.labels)
            .enumerate()
            .filter(|(_, (row, label))| {
                let mut key = row_key(row);
                key.push(label.key());
                seen.insert(key)
            })
            .map(|(i, _)| i)
            .collect();

        if keep.len() != self.rows.len() {
            *self = self.select(&keep);
        }
        self
    }
}
