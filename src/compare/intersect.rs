//! Histogram intersection across bin counts and kinds.
//!
//! The finer histogram is folded onto the coarser one: for every bin `j` of
//! the coarser histogram a window of fine bins is summed and compared with
//! the coarse count, keeping the minimum. Mixed Color/Grey pairs are reduced to
//! Grey/Grey by recomputing the color side as grey at the smaller bin count.

use crate::compare::Intersection;
use crate::histogram::{Channels, Histogram};
use crate::util::math::bin_index;
use crate::util::HistMatchResult;
use std::ops::Range;

/// How fine bins are grouped under each coarse bin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RescalePolicy {
    /// Running scale factor alternating between ceiling (even bins) and floor
    /// (odd bins), starting from `min.bins / max.bins`.
    ///
    /// Kept for score compatibility with existing catalogs.
    #[default]
    Legacy,
    /// Each fine bin is folded into the coarse bin that holds its lowest
    /// intensity, so windows follow the intensity edges of both binnings and
    /// tile the fine histogram.
    Proportional,
}

/// Intersects two histograms with the default rescale policy.
pub fn intersect(image: &Histogram, model: &Histogram) -> HistMatchResult<Intersection> {
    intersect_with(image, model, RescalePolicy::default())
}

/// Intersects two histograms.
///
/// The result has one sequence per channel (three for Color/Color, one
/// otherwise), each `min(image.bins, model.bins)` long.
pub fn intersect_with(
    image: &Histogram,
    model: &Histogram,
    policy: RescalePolicy,
) -> HistMatchResult<Intersection> {
    image.validate()?;
    model.validate()?;

    let (min, max) = if image.bins() <= model.bins() {
        (image, model)
    } else {
        (model, image)
    };
    let bins = min.bins();

    let out = match (min.channels(), max.channels()) {
        (
            Channels::Color { red, green, blue },
            Channels::Color {
                red: max_red,
                green: max_green,
                blue: max_blue,
            },
        ) => {
            let windows = rescale_windows(bins, max.bins(), policy);
            Intersection::Color {
                red: overlap(red, max_red, &windows),
                green: overlap(green, max_green, &windows),
                blue: overlap(blue, max_blue, &windows),
            }
        }
        (Channels::Grey(grey), Channels::Grey(max_grey)) => {
            let windows = rescale_windows(bins, max.bins(), policy);
            Intersection::Grey(overlap(grey, max_grey, &windows))
        }
        (Channels::Color { .. }, Channels::Grey(max_grey)) => {
            let converted = min.to_grey(bins)?;
            let windows = rescale_windows(bins, max.bins(), policy);
            Intersection::Grey(overlap(grey_of(&converted), max_grey, &windows))
        }
        (Channels::Grey(grey), Channels::Color { .. }) => {
            let converted = max.to_grey(bins)?;
            let windows = rescale_windows(bins, bins, policy);
            Intersection::Grey(overlap(grey, grey_of(&converted), &windows))
        }
    };
    Ok(out)
}

fn grey_of(hist: &Histogram) -> &[u64] {
    match hist.channels() {
        Channels::Grey(grey) => grey,
        Channels::Color { red, .. } => red,
    }
}

/// Computes the fine-bin window for each of `min_bins` coarse bins.
///
/// Windows may run past `max_bins`; `overlap` clamps them.
pub(crate) fn rescale_windows(
    min_bins: usize,
    max_bins: usize,
    policy: RescalePolicy,
) -> Vec<Range<usize>> {
    match policy {
        RescalePolicy::Legacy => {
            let mut ratio = min_bins as f64 / max_bins as f64;
            (0..min_bins)
                .map(|j| {
                    ratio = if j % 2 == 0 { ratio.ceil() } else { ratio.floor() };
                    let step = ratio as usize;
                    step * j..step * (j + 1)
                })
                .collect()
        }
        RescalePolicy::Proportional => edge_windows(min_bins, max_bins),
    }
}

fn edge_windows(min_bins: usize, max_bins: usize) -> Vec<Range<usize>> {
    if min_bins == max_bins {
        return (0..min_bins).map(|j| j..j + 1).collect();
    }
    let mut windows = vec![0..0; min_bins];
    for i in 0..max_bins {
        // Lowest intensity v with bin_index(v, max_bins) == i.
        let lowest = (i * 255).div_ceil(max_bins).min(255) as u8;
        let window = &mut windows[bin_index(lowest, min_bins)];
        if window.is_empty() {
            *window = i..i + 1;
        } else {
            window.end = i + 1;
        }
    }
    windows
}

fn overlap(coarse: &[u64], fine: &[u64], windows: &[Range<usize>]) -> Vec<u64> {
    coarse
        .iter()
        .zip(windows)
        .map(|(&count, window)| {
            let start = window.start.min(fine.len());
            let end = window.end.min(fine.len());
            let folded: u64 = fine[start..end].iter().sum();
            count.min(folded)
        })
        .collect()
}
