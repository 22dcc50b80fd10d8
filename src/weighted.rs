//! Weighted random sampling with replacement.
//!
//! [`WeightedSampler`] draws row offsets proportional to per-row weights
//! using a two-level bucket structure: weights are normalized onto a
//! fixed-point integer grid, partitioned into contiguous buckets of size
//! `round(sqrt(rows))`, and each bucket's subtotal is precomputed once.
//! A draw picks a uniform integer point below the grand total, skips
//! whole buckets by subtracting their subtotals, then scans inside the
//! owning bucket. Setup is O(rows); each draw is O(sqrt(rows)) expected,
//! versus O(rows) for a cumulative linear scan.
//!
//! Using integers instead of floats keeps repeated subtraction exact: a
//! point can never drift outside every bucket. Should a boundary draw
//! survive the walk anyway, it resolves deterministically to the last
//! row of the last non-empty bucket.

use rand::Rng;

use crate::error::{Error, Result};

/// Fixed-point grid resolution for normalized weights.
const SCALE: f64 = (1u64 << 32) as f64;

/// Two-level bucket sampler over non-negative per-row weights.
///
/// Weights are an immutable input to a single sampling pass; build a new
/// sampler if they change.
///
/// # Example
///
/// ```
/// use muestra::WeightedSampler;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let sampler = WeightedSampler::new(&[1.0, 2.0, 7.0]).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let offset = sampler.sample(&mut rng);
/// assert!(offset < 3);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    weights: Vec<u64>,
    subtotals: Vec<u64>,
    bucket_size: usize,
    total: u64,
}

impl WeightedSampler {
    /// Builds the bucket structure from raw weights.
    ///
    /// # Errors
    ///
    /// Returns an error if `weights` is empty, any weight is negative or
    /// non-finite, all weights are zero, or the weights sum outside the
    /// finite `f64` range.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(Error::EmptyDataset);
        }

        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidWeight { index, weight });
            }
        }

        let raw_total: f64 = weights.iter().sum();
        if !raw_total.is_finite() {
            return Err(Error::InvalidTotalWeight { total: raw_total });
        }
        if raw_total <= 0.0 {
            return Err(Error::ZeroTotalWeight);
        }

        let fixed: Vec<u64> = weights
            .iter()
            .map(|w| ((w / raw_total) * SCALE).round() as u64)
            .collect();

        let bucket_size = ((weights.len() as f64).sqrt().round() as usize).max(1);

        let subtotals: Vec<u64> = fixed
            .chunks(bucket_size)
            .map(|bucket| bucket.iter().sum())
            .collect();

        let total: u64 = subtotals.iter().sum();
        if total == 0 {
            return Err(Error::ZeroTotalWeight);
        }

        Ok(Self {
            weights: fixed,
            subtotals,
            bucket_size,
            total,
        })
    }

    /// Number of rows covered by the sampler.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if the sampler covers no rows.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Draws one row offset proportional to its weight.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut point = rng.gen_range(0..self.total);

        for (bucket, &subtotal) in self.subtotals.iter().enumerate() {
            if point < subtotal {
                let start = bucket * self.bucket_size;
                for (offset, &weight) in self.weights[start..].iter().enumerate() {
                    if point < weight {
                        return start + offset;
                    }
                    point -= weight;
                }
                break;
            }
            point -= subtotal;
        }

        self.last_weighted_row()
    }

    /// Last row of the last non-empty bucket, the deterministic target
    /// for a boundary draw.
    fn last_weighted_row(&self) -> usize {
        self.weights
            .iter()
            .rposition(|&w| w > 0)
            .unwrap_or(self.weights.len() - 1)
    }
}
