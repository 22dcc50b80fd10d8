//! The `Dataset` trait: derivation contracts shared by both containers.
//!
//! Concrete containers ([`Unlabeled`](crate::Unlabeled) and
//! [`Labeled`](crate::Labeled)) implement a narrow required core — row
//! access, index selection, destructive extraction, permutation, merge
//! and dedup — and inherit every resampling/partitioning contract as a
//! provided method. Because the provided methods express themselves
//! entirely through the core, a labeled container that keeps its labels
//! in lockstep inside `select`/`extract`/`permute` keeps them in
//! lockstep under every derivation for free.
//!
//! Derivations return new containers holding fresh storage; in-place
//! operations mutate owned storage and return `&mut Self` for chaining.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::value::{Value, ValueKind};
use crate::weighted::WeightedSampler;

/// One sample: an ordered, fixed-width sequence of scalar values.
pub type Row = Vec<Value>;

/// RNG shared by every randomized operation: seeded for reproducibility,
/// entropy-backed otherwise.
pub(crate) fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Resolves a possibly-negative offset against `len` and caps `n` to the
/// remaining extent.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn locate(len: usize, offset: isize, n: usize) -> Result<(usize, usize)> {
    let start = if offset < 0 {
        (len as isize).checked_add(offset)
    } else {
        Some(offset)
    };

    match start {
        Some(start) if start >= 0 && (start as usize) <= len => {
            let start = start as usize;
            Ok((start, n.min(len - start)))
        }
        _ => Err(Error::OffsetOutOfBounds { offset, len }),
    }
}

/// A container of fixed-width rows supporting the full family of
/// resampling, partitioning and subsetting derivations.
pub trait Dataset: Sized {
    /// Number of rows.
    fn len(&self) -> usize;

    /// The sample rows, in insertion order.
    fn rows(&self) -> &[Row];

    /// New container holding fresh copies of the rows at `indices`, in
    /// the given order. Indices must be in bounds; this is the trusted
    /// primitive every non-destructive derivation builds on.
    fn select(&self, indices: &[usize]) -> Self;

    /// Removes `n` rows starting at `offset` from this container and
    /// returns them as a new container. Range must be in bounds; this is
    /// the trusted primitive every destructive derivation builds on.
    fn extract(&mut self, offset: usize, n: usize) -> Self;

    /// Reorders rows in place so position `i` receives the row previously
    /// at `perm[i]`. `perm` must be a permutation of `0..len`.
    fn permute(&mut self, perm: &[usize]) -> &mut Self;

    /// Row-wise concatenation into a new container.
    ///
    /// # Errors
    ///
    /// Returns an error if both containers are non-empty and their column
    /// counts differ.
    fn merge(&self, other: &Self) -> Result<Self>;

    /// Removes rows that duplicate an earlier row, keeping the first
    /// occurrence and relative order. In place; idempotent.
    fn deduplicate(&mut self) -> &mut Self;

    /// True if the container holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns; 0 for an empty container.
    fn columns(&self) -> usize {
        self.rows().first().map_or(0, Vec::len)
    }

    /// First `n` rows (fewer if the container is smaller).
    ///
    /// # Errors
    ///
    /// Returns an error if `n` < 1.
    fn head(&self, n: usize) -> Result<Self> {
        require_at_least_one(n)?;
        let end = n.min(self.len());
        Ok(self.select(&index_range(0, end)))
    }

    /// Last `n` rows (fewer if the container is smaller).
    ///
    /// # Errors
    ///
    /// Returns an error if `n` < 1.
    fn tail(&self, n: usize) -> Result<Self> {
        require_at_least_one(n)?;
        let start = self.len().saturating_sub(n);
        Ok(self.select(&index_range(start, self.len())))
    }

    /// Removes the first `n` rows from this container and returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` < 1.
    fn take(&mut self, n: usize) -> Result<Self> {
        require_at_least_one(n)?;
        let n = n.min(self.len());
        Ok(self.extract(0, n))
    }

    /// Keeps the first `n` rows on this container and returns the rest.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` < 1.
    fn leave(&mut self, n: usize) -> Result<Self> {
        require_at_least_one(n)?;
        let start = n.min(self.len());
        Ok(self.extract(start, self.len() - start))
    }

    /// Non-destructive extraction of up to `n` rows starting at `offset`.
    /// Negative offsets count from the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved offset is out of bounds.
    fn slice(&self, offset: isize, n: usize) -> Result<Self> {
        let (start, count) = locate(self.len(), offset, n)?;
        Ok(self.select(&index_range(start, start + count)))
    }

    /// Destructive extraction of up to `n` rows starting at `offset`,
    /// removing them from this container. Negative offsets count from
    /// the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved offset is out of bounds.
    fn splice(&mut self, offset: isize, n: usize) -> Result<Self> {
        let (start, count) = locate(self.len(), offset, n)?;
        Ok(self.extract(start, count))
    }

    /// Uniformly permutes the row order in place.
    fn randomize(&mut self, seed: Option<u64>) -> &mut Self {
        let mut perm: Vec<usize> = (0..self.len()).collect();
        perm.shuffle(&mut rng_from(seed));
        self.permute(&perm)
    }

    /// Stable in-place reorder of all rows by the values of one column.
    ///
    /// # Errors
    ///
    /// Returns an error if `column` is out of bounds.
    fn sort_by_column(&mut self, column: usize, descending: bool) -> Result<&mut Self> {
        if column >= self.columns() {
            return Err(Error::column_out_of_bounds(column, self.columns()));
        }

        let rows = self.rows();
        let mut perm: Vec<usize> = (0..rows.len()).collect();
        perm.sort_by(|&a, &b| {
            let order = rows[a][column].total_cmp(&rows[b][column]);
            if descending {
                order.reverse()
            } else {
                order
            }
        });

        Ok(self.permute(&perm))
    }

    /// Splits into two new containers: the first holds
    /// `floor(ratio * len)` rows from the front, the second the rest.
    ///
    /// # Errors
    ///
    /// Returns an error if `ratio` is outside `[0, 1]`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn split(&self, ratio: f64) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::InvalidRatio { ratio });
        }

        let pivot = (ratio * self.len() as f64).floor() as usize;
        Ok((
            self.select(&index_range(0, pivot)),
            self.select(&index_range(pivot, self.len())),
        ))
    }

    /// Splits into `k` new containers of `floor(len / k)` rows each,
    /// consumed front-to-back from a working copy; remainder rows are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `k` < 1.
    fn fold(&self, k: usize) -> Result<Vec<Self>> {
        if k < 1 {
            return Err(Error::invalid_argument("k must be at least 1"));
        }

        let size = self.len() / k;
        let mut working = self.select(&index_range(0, self.len()));
        Ok((0..k).map(|_| working.extract(0, size)).collect())
    }

    /// Chunks the rows into containers of at most `n` rows; the last
    /// chunk may be smaller.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` < 1.
    fn batch(&self, n: usize) -> Result<Vec<Self>> {
        require_at_least_one(n)?;
        let indices: Vec<usize> = (0..self.len()).collect();
        Ok(indices.chunks(n).map(|chunk| self.select(chunk)).collect())
    }

    /// Left/right partition by one column: continuous columns send
    /// `row value <= value` left, categorical columns send exact matches
    /// left.
    ///
    /// # Errors
    ///
    /// Returns an error if `column` is out of bounds, or if the column is
    /// continuous and `value` is not numeric.
    fn split_by_column(&self, column: usize, value: &Value) -> Result<(Self, Self)> {
        if self.is_empty() {
            return Ok((self.select(&[]), self.select(&[])));
        }
        if column >= self.columns() {
            return Err(Error::column_out_of_bounds(column, self.columns()));
        }

        let rows = self.rows();
        let mut left = Vec::new();
        let mut right = Vec::new();

        match ValueKind::of(&rows[0][column]) {
            ValueKind::Continuous => {
                let threshold = value.as_f64().ok_or_else(|| {
                    Error::invalid_argument("threshold for a continuous column must be numeric")
                })?;
                for (i, row) in rows.iter().enumerate() {
                    match row[column].as_f64() {
                        Some(v) if v <= threshold => left.push(i),
                        _ => right.push(i),
                    }
                }
            }
            _ => {
                let key = value.key();
                for (i, row) in rows.iter().enumerate() {
                    if row[column].key() == key {
                        left.push(i);
                    } else {
                        right.push(i);
                    }
                }
            }
        }

        Ok((self.select(&left), self.select(&right)))
    }

    /// Left/right partition by which centroid each row is strictly closer
    /// to under `kernel`; ties go right.
    ///
    /// # Errors
    ///
    /// Propagates kernel failures.
    fn spatial_split(
        &self,
        left_centroid: &[Value],
        right_centroid: &[Value],
        kernel: &dyn Kernel,
    ) -> Result<(Self, Self)> {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for (i, row) in self.rows().iter().enumerate() {
            let to_left = kernel.compute(row, left_centroid)?;
            let to_right = kernel.compute(row, right_centroid)?;
            if to_left < to_right {
                left.push(i);
            } else {
                right.push(i);
            }
        }

        Ok((self.select(&left), self.select(&right)))
    }

    /// `n` distinct rows drawn uniformly at random without replacement.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` < 1 or `n` exceeds the row count.
    fn random_subset(&self, n: usize, seed: Option<u64>) -> Result<Self> {
        require_at_least_one(n)?;
        if n > self.len() {
            return Err(Error::invalid_argument(format!(
                "cannot draw {n} distinct rows from {} rows",
                self.len()
            )));
        }

        let mut rng = rng_from(seed);
        let indices: Vec<usize> = rand::seq::index::sample(&mut rng, self.len(), n).into_vec();
        Ok(self.select(&indices))
    }

    /// `n` rows drawn uniformly at random with replacement.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` < 1 or the container is empty.
    fn random_subset_with_replacement(&self, n: usize, seed: Option<u64>) -> Result<Self> {
        require_at_least_one(n)?;
        if self.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut rng = rng_from(seed);
        let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..self.len())).collect();
        Ok(self.select(&indices))
    }

    /// `n` rows drawn with replacement, each row's probability
    /// proportional to its weight, via the two-level bucket sampler in
    /// [`WeightedSampler`].
    ///
    /// # Errors
    ///
    /// Returns an error if `n` < 1, the weight count does not match the
    /// row count, any weight is negative or non-finite, or all weights
    /// are zero.
    fn random_weighted_subset_with_replacement(
        &self,
        n: usize,
        weights: &[f64],
        seed: Option<u64>,
    ) -> Result<Self> {
        require_at_least_one(n)?;
        if weights.len() != self.len() {
            return Err(Error::WeightCountMismatch {
                weights: weights.len(),
                rows: self.len(),
            });
        }

        let sampler = WeightedSampler::new(weights)?;
        let mut rng = rng_from(seed);
        let indices: Vec<usize> = (0..n).map(|_| sampler.sample(&mut rng)).collect();
        Ok(self.select(&indices))
    }
}

fn require_at_least_one(n: usize) -> Result<()> {
    if n < 1 {
        return Err(Error::invalid_argument("n must be at least 1"));
    }
    Ok(())
}

fn index_range(start: usize, end: usize) -> Vec<usize> {
    (start..end).collect()
}
