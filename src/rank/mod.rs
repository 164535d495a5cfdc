//! Ranked result collection.
//!
//! Results are kept ascending by score (lower is better) in a bounded buffer.

pub(crate) mod topk;

pub use topk::{RankedMatch, TopK};
