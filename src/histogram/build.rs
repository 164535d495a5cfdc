//! Direct binning of pixel samples into histograms.

use crate::histogram::{Channels, Histogram};
use crate::image::PixelArray;
use crate::util::math::bin_index;
use crate::util::{HistMatchError, HistMatchResult};
use std::sync::Arc;

/// Counts `samples` into `bins` equal-width buckets over [0, 255].
pub fn bin_counts<I>(samples: I, bins: usize) -> HistMatchResult<Vec<u64>>
where
    I: IntoIterator<Item = u8>,
{
    if bins == 0 {
        return Err(HistMatchError::InvalidHistogram {
            reason: "zero bins",
        });
    }
    let mut counts = vec![0u64; bins];
    for sample in samples {
        counts[bin_index(sample, bins)] += 1;
    }
    Ok(counts)
}

/// Builds a histogram from `pixels`.
///
/// The result is a grey histogram when `force_grey` is set or when the pixels
/// carry no chroma; otherwise it is a color histogram. Grey histograms count
/// the luma of each pixel. The histogram keeps a shared handle to the pixels.
pub fn build_histogram(
    pixels: impl Into<Arc<PixelArray>>,
    bins: usize,
    force_grey: bool,
) -> HistMatchResult<Histogram> {
    let pixels = pixels.into();
    if bins == 0 {
        return Err(HistMatchError::InvalidHistogram {
            reason: "zero bins",
        });
    }

    let channels = if force_grey || pixels.is_greyscale() {
        let grey = pixels.to_grey();
        Channels::Grey(bin_counts(grey.as_slice().iter().copied(), bins)?)
    } else {
        let mut red = vec![0u64; bins];
        let mut green = vec![0u64; bins];
        let mut blue = vec![0u64; bins];
        for [r, g, b] in pixels.rgb_pixels() {
            red[bin_index(r, bins)] += 1;
            green[bin_index(g, bins)] += 1;
            blue[bin_index(b, bins)] += 1;
        }
        Channels::Color { red, green, blue }
    };

    Ok(Histogram::from_parts(bins, channels, pixels))
}
