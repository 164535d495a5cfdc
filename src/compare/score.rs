//! Percentage match scores from intersections.

use crate::compare::intersect::{intersect_with, RescalePolicy};
use crate::compare::Intersection;
use crate::histogram::Histogram;
use crate::util::{HistMatchError, HistMatchResult};

/// Converts an intersection into a match percentage in [0, 100].
///
/// Counts are normalized by the model's pixel count (its red channel, or its
/// grey channel). For color overlaps the weakest channel sets the score.
pub fn match_score(intersection: &Intersection, model: &Histogram) -> HistMatchResult<f64> {
    let total = model.total_pixels();
    if total == 0 {
        return Err(HistMatchError::InvalidHistogram {
            reason: "model histogram has no counts",
        });
    }
    let total = total as f64;
    let ratio_of = |channel: &[u64]| channel.iter().sum::<u64>() as f64 / total;

    let ratio = match intersection {
        Intersection::Color { red, green, blue } => {
            ratio_of(red).min(ratio_of(green)).min(ratio_of(blue))
        }
        Intersection::Grey(grey) => ratio_of(grey),
    };
    Ok(ratio * 100.0)
}

/// Intersects `image` with `model` and scores the overlap.
pub fn match_value(image: &Histogram, model: &Histogram) -> HistMatchResult<f64> {
    match_value_with(image, model, RescalePolicy::default())
}

/// Same as [`match_value`] with an explicit rescale policy.
pub fn match_value_with(
    image: &Histogram,
    model: &Histogram,
    policy: RescalePolicy,
) -> HistMatchResult<f64> {
    let overlap = intersect_with(image, model, policy)?;
    match_score(&overlap, model)
}

#[cfg(test)]
mod tests {
    use super::{match_score, match_value};
    use crate::compare::Intersection;
    use crate::histogram::Histogram;
    use crate::util::HistMatchError;

    #[test]
    fn weakest_color_channel_dominates() {
        let model = Histogram::from_color(vec![5, 5], vec![5, 5], vec![5, 5]).unwrap();
        let overlap = Intersection::Color {
            red: vec![5, 5],
            green: vec![2, 3],
            blue: vec![5, 4],
        };
        assert_eq!(match_score(&overlap, &model).unwrap(), 50.0);
    }

    #[test]
    fn grey_score_is_overlap_fraction() {
        let model = Histogram::from_grey(vec![2, 2]).unwrap();
        let score = match_score(&Intersection::Grey(vec![1, 0]), &model).unwrap();
        assert_eq!(score, 25.0);
    }

    #[test]
    fn self_match_is_full() {
        let hist = Histogram::from_color(vec![3, 1, 0], vec![0, 2, 2], vec![4, 0, 0]).unwrap();
        assert_eq!(match_value(&hist, &hist).unwrap(), 100.0);
    }

    #[test]
    fn empty_model_is_rejected() {
        let model = Histogram::from_grey(vec![0, 0]).unwrap();
        assert!(matches!(
            match_score(&Intersection::Grey(vec![0, 0]), &model),
            Err(HistMatchError::InvalidHistogram { .. })
        ));
    }
}
