//! Numeric helpers shared by the metrics and the binning code.

/// Rounds to four decimal places, ties to even.
pub(crate) fn round4(value: f64) -> f64 {
    (value * 1e4).round_ties_even() / 1e4
}

/// Maps an 8-bit sample onto one of `bins` equal-width buckets over [0, 255].
///
/// The last bucket is closed on the right, so 255 always lands in `bins - 1`.
/// `bins` must be non-zero.
#[inline]
pub(crate) fn bin_index(value: u8, bins: usize) -> usize {
    let idx = (value as usize * bins) / 255;
    idx.min(bins - 1)
}
