//! Histogram intersection and match scoring.

mod intersect;
mod score;

pub use intersect::{intersect, intersect_with, RescalePolicy};
pub use score::{match_score, match_value, match_value_with};

/// Per-channel overlap between two histograms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intersection {
    /// Overlap of two color histograms.
    Color {
        red: Vec<u64>,
        green: Vec<u64>,
        blue: Vec<u64>,
    },
    /// Overlap of two grey histograms, or of a mixed pair reduced to grey.
    Grey(Vec<u64>),
}

impl Intersection {
    /// Number of bins per channel.
    pub fn len(&self) -> usize {
        match self {
            Intersection::Color { red, .. } => red.len(),
            Intersection::Grey(grey) => grey.len(),
        }
    }

    /// Returns true if the overlap has no bins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
