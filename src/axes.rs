//! Opponent color-axis features for incremental matching.
//!
//! Each pixel is mapped onto three derived axes, `rg = R - G`,
//! `by = 2B - R - G` and `wb = R + G + B`, computed in wrapping 8-bit
//! arithmetic so that every value lies in [0, 255]. Each axis is binned and the
//! concatenated counts are normalized by the pixel count, giving a short vector
//! whose segments each sum to one.

use crate::histogram::{bin_counts, Histogram, HistogramKind};
use crate::util::{HistMatchError, HistMatchResult};

/// Bin counts for the three color axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisBins {
    /// Bins for the red-green axis.
    pub rg: usize,
    /// Bins for the blue-yellow axis.
    pub by: usize,
    /// Bins for the white-black axis.
    pub wb: usize,
}

impl Default for AxisBins {
    fn default() -> Self {
        Self {
            rg: 16,
            by: 16,
            wb: 8,
        }
    }
}

impl AxisBins {
    /// Total vector length.
    pub fn len(&self) -> usize {
        self.rg + self.by + self.wb
    }

    /// Returns true if all axes have zero bins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self) -> HistMatchResult<()> {
        if self.rg == 0 || self.by == 0 || self.wb == 0 {
            return Err(HistMatchError::InvalidInput("color axes need at least one bin each"));
        }
        Ok(())
    }
}

/// Normalized concatenation of the rg, by and wb axis histograms.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorAxisVector {
    values: Vec<f64>,
    bins: AxisBins,
}

impl ColorAxisVector {
    /// Wraps precomputed values; the length must match `bins`.
    pub fn from_values(values: Vec<f64>, bins: AxisBins) -> HistMatchResult<Self> {
        bins.validate()?;
        if values.len() != bins.len() {
            return Err(HistMatchError::DimensionMismatch {
                left: values.len(),
                right: bins.len(),
            });
        }
        Ok(Self { values, bins })
    }

    /// Returns all values in rg, by, wb order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the axis bin layout.
    pub fn bins(&self) -> AxisBins {
        self.bins
    }

    /// Red-green segment.
    pub fn rg(&self) -> &[f64] {
        &self.values[..self.bins.rg]
    }

    /// Blue-yellow segment.
    pub fn by(&self) -> &[f64] {
        &self.values[self.bins.rg..self.bins.rg + self.bins.by]
    }

    /// White-black segment.
    pub fn wb(&self) -> &[f64] {
        &self.values[self.bins.rg + self.bins.by..]
    }
}

/// Projects the pixels behind `histogram` onto the color axes.
///
/// Color histograms use the source RGB channels; grey histograms use their
/// luma samples for all three channels.
pub fn project_color_axes(histogram: &Histogram, bins: AxisBins) -> HistMatchResult<ColorAxisVector> {
    bins.validate()?;
    let pixels = histogram.pixels().ok_or(HistMatchError::MissingPixels {
        context: "color axis projection",
    })?;

    let grey_source;
    let source = match histogram.kind() {
        HistogramKind::Color => pixels,
        HistogramKind::Grey => {
            grey_source = pixels.to_grey();
            &grey_source
        }
    };

    let rg = bin_counts(source.rgb_pixels().map(|[r, g, _]| r.wrapping_sub(g)), bins.rg)?;
    let by = bin_counts(
        source
            .rgb_pixels()
            .map(|[r, g, b]| b.wrapping_mul(2).wrapping_sub(r).wrapping_sub(g)),
        bins.by,
    )?;
    let wb = bin_counts(
        source
            .rgb_pixels()
            .map(|[r, g, b]| r.wrapping_add(g).wrapping_add(b)),
        bins.wb,
    )?;

    let total = pixels.pixel_count() as f64;
    let values = rg
        .iter()
        .chain(&by)
        .chain(&wb)
        .map(|&count| count as f64 / total)
        .collect();
    Ok(ColorAxisVector { values, bins })
}

#[cfg(test)]
mod tests {
    use super::{project_color_axes, AxisBins, ColorAxisVector};
    use crate::histogram::{build_histogram, Histogram};
    use crate::image::PixelArray;
    use crate::util::HistMatchError;

    fn segment_sum(values: &[f64]) -> f64 {
        values.iter().sum()
    }

    #[test]
    fn segments_sum_to_one() {
        let mut data = Vec::new();
        for i in 0..64u32 {
            data.extend_from_slice(&[(i * 4) as u8, (i * 7 % 256) as u8, (255 - i * 3) as u8]);
        }
        let pixels = PixelArray::rgb(data, 8, 8).unwrap();
        let hist = build_histogram(pixels, 64, false).unwrap();
        let axes = project_color_axes(&hist, AxisBins::default()).unwrap();

        assert_eq!(axes.values().len(), 40);
        for segment in [axes.rg(), axes.by(), axes.wb()] {
            assert!((segment_sum(segment) - 1.0).abs() < 1e-12);
            assert!(segment.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn grey_pixels_fall_on_zero_opponent_bins() {
        let pixels = PixelArray::grey(vec![40u8; 12], 4, 3).unwrap();
        let hist = build_histogram(pixels, 255, false).unwrap();
        let axes = project_color_axes(&hist, AxisBins::default()).unwrap();

        assert_eq!(axes.rg()[0], 1.0);
        assert_eq!(axes.by()[0], 1.0);
        // wb = 120 falls in bin 120 * 8 / 255 = 3.
        assert_eq!(axes.wb()[3], 1.0);
    }

    #[test]
    fn projection_needs_pixels() {
        let hist = Histogram::from_grey(vec![1, 2, 3]).unwrap();
        assert_eq!(
            project_color_axes(&hist, AxisBins::default()).unwrap_err(),
            HistMatchError::MissingPixels {
                context: "color axis projection"
            }
        );
    }

    #[test]
    fn from_values_checks_length() {
        let bins = AxisBins { rg: 2, by: 2, wb: 1 };
        assert!(ColorAxisVector::from_values(vec![0.0; 5], bins).is_ok());
        assert_eq!(
            ColorAxisVector::from_values(vec![0.0; 4], bins).unwrap_err(),
            HistMatchError::DimensionMismatch { left: 4, right: 5 }
        );
    }
}
