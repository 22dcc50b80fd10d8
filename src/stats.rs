//! Per-column descriptive statistics.
//!
//! [`summarize`] profiles a single column: continuous columns get the
//! first four standardized moments and a five-number percentile summary,
//! categorical columns get a frequency table sorted by descending
//! probability.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::{Value, ValueKind};

/// One category's count and empirical probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFrequency {
    /// The category, rendered as its string contents.
    pub category: String,
    /// Number of occurrences in the column.
    pub count: usize,
    /// `count / column length`.
    pub probability: f64,
}

/// Descriptive statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnSummary {
    /// Summary of a continuous (numeric) column.
    Continuous {
        /// Arithmetic mean.
        mean: f64,
        /// Population standard deviation.
        std_dev: f64,
        /// Third standardized moment; 0 for constant columns.
        skewness: f64,
        /// Excess kurtosis (normal = 0); 0 for constant columns.
        kurtosis: f64,
        /// Values at the 0/25/50/75/100th percentiles, linearly
        /// interpolated between closest ranks.
        percentiles: [f64; 5],
    },
    /// Summary of a categorical column, sorted by descending probability.
    Categorical {
        /// Per-category counts and probabilities.
        frequencies: Vec<CategoryFrequency>,
    },
}

/// Profiles one column of values.
///
/// The first value decides the branch: continuous columns are summarized
/// by moments and percentiles, categorical columns by frequencies.
///
/// # Errors
///
/// Returns an error if `values` is empty.
pub fn summarize(values: &[Value]) -> Result<ColumnSummary> {
    let first = values.first().ok_or(Error::EmptyDataset)?;

    match ValueKind::of(first) {
        ValueKind::Continuous => Ok(summarize_continuous(values)),
        _ => Ok(summarize_categorical(values)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize_continuous(values: &[Value]) -> ColumnSummary {
    let magnitudes: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
    let n = magnitudes.len() as f64;

    let mean = magnitudes.iter().sum::<f64>() / n;

    let mut m2 = 0.0;
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for &x in &magnitudes {
        let d = x - mean;
        m2 += d * d;
        m3 += d * d * d;
        m4 += d * d * d * d;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    let std_dev = m2.sqrt();
    let (skewness, kurtosis) = if m2 > 0.0 {
        (m3 / (std_dev * std_dev * std_dev), m4 / (m2 * m2) - 3.0)
    } else {
        (0.0, 0.0)
    };

    let mut sorted = magnitudes;
    sorted.sort_by(f64::total_cmp);
    let percentiles = [
        percentile(&sorted, 0.0),
        percentile(&sorted, 25.0),
        percentile(&sorted, 50.0),
        percentile(&sorted, 75.0),
        percentile(&sorted, 100.0),
    ];

    ColumnSummary::Continuous {
        mean,
        std_dev,
        skewness,
        kurtosis,
        percentiles,
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize_categorical(values: &[Value]) -> ColumnSummary {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    let total = values.len() as f64;
    let mut frequencies: Vec<CategoryFrequency> = counts
        .into_iter()
        .map(|(category, count)| CategoryFrequency {
            category,
            count,
            probability: count as f64 / total,
        })
        .collect();

    // Descending probability, category name breaks ties deterministically.
    frequencies.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.cmp(&b.category))
    });

    ColumnSummary::Categorical { frequencies }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - rank.floor())
}
