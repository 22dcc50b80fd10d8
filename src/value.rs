//! Scalar values and the type classifier.
//!
//! Every cell of a dataset holds a [`Value`]: an integer, a float, or a
//! string. [`ValueKind::of`] classifies a value as continuous (numeric),
//! categorical (string-valued), or other (invalid, e.g. a non-finite
//! float). Validation and branch-on-type operations go through the
//! classifier rather than inspecting variants directly.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar value in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// An integer, classified as continuous.
    Int(i64),
    /// A floating point number, classified as continuous when finite.
    Float(f64),
    /// A string, classified as categorical.
    Str(String),
}

/// The semantic kind of a value, as detected by the type classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Numeric: integers and finite floats.
    Continuous,
    /// Discrete, string-valued.
    Categorical,
    /// Neither continuous nor categorical; fails validation.
    Other,
}

impl ValueKind {
    /// Classifies a value. Pure and total.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Int(_) => Self::Continuous,
            Value::Float(v) if v.is_finite() => Self::Continuous,
            Value::Float(_) => Self::Other,
            Value::Str(_) => Self::Categorical,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continuous => write!(f, "continuous"),
            Self::Categorical => write!(f, "categorical"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Canonical identity key for a value, used by deduplication and
/// stratification instead of incidental numeric/string coercion.
///
/// Integers and integral floats share a key; non-integral floats key by
/// bit pattern (`-0.0` folds into `0.0`); strings key by exact contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    Int(i64),
    Bits(u64),
    Str(String),
}

impl Value {
    /// Returns the numeric magnitude of a continuous value, or `None` for
    /// a categorical one.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Str(_) => None,
        }
    }

    /// Total ordering used by column sorts: numeric values order by
    /// magnitude, strings lexicographically, numerics before strings.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Str(_), _) => Ordering::Greater,
            (_, Self::Str(_)) => Ordering::Less,
            (a, b) => a.float_lossy().total_cmp(&b.float_lossy()),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn float_lossy(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
            Self::Str(_) => f64::NAN,
        }
    }

    /// Canonical identity key; see [`ValueKey`].
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub(crate) fn key(&self) -> ValueKey {
        match self {
            Self::Int(v) => ValueKey::Int(*v),
            Self::Float(v) => {
                if v.is_finite()
                    && v.fract() == 0.0
                    && *v >= i64::MIN as f64
                    && *v <= i64::MAX as f64
                {
                    ValueKey::Int(*v as i64)
                } else {
                    ValueKey::Bits(v.to_bits())
                }
            }
            Self::Str(s) => ValueKey::Str(s.clone()),
        }
    }

    /// True if the value can serve as a stratum key: categorical, or an
    /// integer-valued continuous value.
    pub(crate) fn is_stratum_key(&self) -> bool {
        matches!(self.key(), ValueKey::Int(_) | ValueKey::Str(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}
