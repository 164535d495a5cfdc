//! Bounded top-K tracking for catalog matches.

use std::cmp::Ordering;

/// One ranked catalog match.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedMatch {
    /// Distance-like score; lower is better.
    pub score: f64,
    /// Catalog identifier of the matched entry.
    pub id: String,
}

/// Top-K container kept sorted ascending by score, with O(k) insertion cost.
///
/// Insertion is stable: an entry whose score equals existing ones is placed
/// after them. Once full, a new entry displaces the last one only when its
/// score is strictly lower.
#[derive(Clone, Debug)]
pub struct TopK {
    k: usize,
    items: Vec<RankedMatch>,
}

impl TopK {
    /// Creates a new Top-K collector.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Returns the capacity.
    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Returns the number of retained entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true once `k` entries are held.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.k
    }

    /// Score of the current last entry.
    pub fn worst_score(&self) -> Option<f64> {
        self.items.last().map(|m| m.score)
    }

    /// Offers a match; returns true if it was retained.
    pub fn push(&mut self, candidate: RankedMatch) -> bool {
        if self.k == 0 {
            return false;
        }
        if self.is_full() {
            match self.items.last() {
                Some(last) if candidate.score.total_cmp(&last.score) == Ordering::Less => {
                    self.items.pop();
                }
                _ => return false,
            }
        }
        let pos = self
            .items
            .partition_point(|m| m.score.total_cmp(&candidate.score) != Ordering::Greater);
        self.items.insert(pos, candidate);
        true
    }

    /// Offers every entry of `other`, in its order.
    pub fn merge(&mut self, other: TopK) {
        for item in other.items {
            self.push(item);
        }
    }

    /// Returns the retained entries, best first.
    pub fn as_slice(&self) -> &[RankedMatch] {
        &self.items
    }

    /// Consumes the collector and returns matches sorted ascending by score.
    pub fn into_sorted(self) -> Vec<RankedMatch> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::{RankedMatch, TopK};

    fn m(score: f64, id: &str) -> RankedMatch {
        RankedMatch {
            score,
            id: id.to_string(),
        }
    }

    #[test]
    fn keeps_k_lowest_in_order() {
        let mut topk = TopK::new(3);
        for (score, id) in [(5.0, "a"), (1.0, "b"), (4.0, "c"), (2.0, "d"), (9.0, "e")] {
            topk.push(m(score, id));
        }
        let ids: Vec<_> = topk.into_sorted().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["b", "d", "c"]);
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let mut topk = TopK::new(4);
        topk.push(m(1.0, "first"));
        topk.push(m(0.5, "best"));
        topk.push(m(1.0, "second"));
        topk.push(m(1.0, "third"));
        let ids: Vec<_> = topk.as_slice().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["best", "first", "second", "third"]);
    }

    #[test]
    fn full_buffer_requires_strict_improvement() {
        let mut topk = TopK::new(2);
        assert!(topk.push(m(1.0, "a")));
        assert!(topk.push(m(2.0, "b")));
        assert!(!topk.push(m(2.0, "c")));
        assert!(topk.push(m(1.5, "d")));
        assert_eq!(topk.worst_score(), Some(1.5));
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut topk = TopK::new(0);
        assert!(!topk.push(m(0.0, "a")));
        assert!(topk.is_empty());
    }

    #[test]
    fn merge_matches_single_pass() {
        let scores = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let mut single = TopK::new(4);
        for (i, &s) in scores.iter().enumerate() {
            single.push(m(s, &i.to_string()));
        }

        let mut left = TopK::new(4);
        let mut right = TopK::new(4);
        for (i, &s) in scores.iter().enumerate() {
            let target = if i < 4 { &mut left } else { &mut right };
            target.push(m(s, &i.to_string()));
        }
        left.merge(right);
        assert_eq!(left.into_sorted(), single.into_sorted());
    }
}
