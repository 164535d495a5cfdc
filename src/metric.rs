//! Set and vector distances used by the incremental retrieval mode.
//!
//! Both distances are rounded to four decimal places (ties to even) so that
//! rankings are stable across platforms.

use crate::util::math::round4;
use crate::util::{HistMatchError, HistMatchResult};
use std::collections::HashSet;
use std::hash::Hash;

/// Distance used to compare two color-axis vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceMetric {
    /// Straight-line distance between the vectors.
    #[default]
    Euclidean,
    /// Jaccard distance between the sets of vector values.
    Jaccard,
}

impl DistanceMetric {
    /// Applies the metric to two float vectors.
    pub fn distance(self, a: &[f64], b: &[f64]) -> HistMatchResult<f64> {
        match self {
            DistanceMetric::Euclidean => euclidean_distance(a, b),
            DistanceMetric::Jaccard => jaccard_distance_f64(a, b),
        }
    }
}

/// Jaccard distance `1 - |A ∩ B| / |A ∪ B|` between two collections viewed as sets.
pub fn jaccard_distance<T, A, B>(a: A, b: B) -> HistMatchResult<f64>
where
    T: Eq + Hash,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let set_a: HashSet<T> = a.into_iter().collect();
    let set_b: HashSet<T> = b.into_iter().collect();
    let common = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - common;
    if union == 0 {
        return Err(HistMatchError::InvalidInput(
            "jaccard distance of two empty collections",
        ));
    }
    Ok(round4(1.0 - common as f64 / union as f64))
}

/// Jaccard distance over float values, compared by exact bit pattern.
///
/// `-0.0` is folded onto `0.0`; NaN has no set identity and is rejected.
pub fn jaccard_distance_f64(a: &[f64], b: &[f64]) -> HistMatchResult<f64> {
    let keys_a = float_keys(a)?;
    let keys_b = float_keys(b)?;
    jaccard_distance(keys_a, keys_b)
}

fn float_keys(values: &[f64]) -> HistMatchResult<Vec<u64>> {
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                Err(HistMatchError::TypeConversion {
                    reason: "NaN cannot be a set element",
                })
            } else if v == 0.0 {
                Ok(0.0f64.to_bits())
            } else {
                Ok(v.to_bits())
            }
        })
        .collect()
}

/// Euclidean distance `sqrt(Σ (a_i - b_i)^2)`.
///
/// The inputs must have the same length and contain only finite values.
pub fn euclidean_distance<T>(a: &[T], b: &[T]) -> HistMatchResult<f64>
where
    T: Copy + Into<f64>,
{
    if a.len() != b.len() {
        return Err(HistMatchError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut sum_sq = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x.into(), y.into());
        if !x.is_finite() || !y.is_finite() {
            return Err(HistMatchError::TypeConversion {
                reason: "non-finite value in distance input",
            });
        }
        let diff = x - y;
        sum_sq += diff * diff;
    }
    Ok(round4(sum_sq.sqrt()))
}
