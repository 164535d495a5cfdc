//! Append-only in-memory catalog.

use crate::axes::{project_color_axes, AxisBins, ColorAxisVector};
use crate::catalog::{Catalog, CatalogEntry, Cursor, Feature};
use crate::histogram::{build_histogram, Histogram};
use crate::image::PixelArray;
use crate::util::{HistMatchError, HistMatchResult};
use std::sync::Arc;

struct Record {
    id: String,
    histogram: Histogram,
    axes: Option<ColorAxisVector>,
    grey: Option<Histogram>,
}

/// Catalog that keeps every feature in memory.
///
/// Entries are yielded in insertion order. Histograms added without pixels
/// only appear in the axis and grey cursors when those features were supplied
/// or can be derived.
pub struct MemoryCatalog {
    bins: usize,
    axis_bins: AxisBins,
    records: Vec<Record>,
}

impl MemoryCatalog {
    /// Creates an empty catalog computing histograms with `bins` bins.
    pub fn new(bins: usize) -> HistMatchResult<Self> {
        if bins == 0 {
            return Err(HistMatchError::InvalidHistogram {
                reason: "zero bins",
            });
        }
        Ok(Self {
            bins,
            axis_bins: AxisBins::default(),
            records: Vec::new(),
        })
    }

    /// Sets the color-axis layout used for derived vectors.
    pub fn with_axis_bins(mut self, axis_bins: AxisBins) -> Self {
        self.axis_bins = axis_bins;
        self
    }

    /// Histogram bin count.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Color-axis layout.
    pub fn axis_bins(&self) -> AxisBins {
        self.axis_bins
    }

    /// Computes and appends all three features for one image.
    pub fn add(&mut self, id: impl Into<String>, pixels: impl Into<Arc<PixelArray>>) -> HistMatchResult<()> {
        let pixels = pixels.into();
        let histogram = build_histogram(Arc::clone(&pixels), self.bins, false)?;
        let axes = project_color_axes(&histogram, self.axis_bins)?;
        let grey = build_histogram(pixels, self.bins, true)?;
        self.records.push(Record {
            id: id.into(),
            histogram,
            axes: Some(axes),
            grey: Some(grey),
        });
        Ok(())
    }

    /// Appends a precomputed histogram and, optionally, its axis vector.
    ///
    /// Missing features are derived from the histogram's pixels when it has
    /// them.
    pub fn add_histogram(
        &mut self,
        id: impl Into<String>,
        histogram: Histogram,
        axes: Option<ColorAxisVector>,
    ) -> HistMatchResult<()> {
        histogram.validate()?;
        let has_pixels = histogram.pixels().is_some();
        let axes = match axes {
            Some(axes) => Some(axes),
            None if has_pixels => Some(project_color_axes(&histogram, self.axis_bins)?),
            None => None,
        };
        let grey = match histogram.grey() {
            Some(_) => Some(histogram.clone()),
            None if has_pixels => Some(histogram.to_grey(histogram.bins())?),
            None => None,
        };
        self.records.push(Record {
            id: id.into(),
            histogram,
            axes,
            grey,
        });
        Ok(())
    }
}

impl Catalog for MemoryCatalog {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn histograms(&self) -> Cursor<'_> {
        Box::new(self.records.iter().map(|r| {
            Ok(CatalogEntry::new(
                r.id.clone(),
                Feature::Histogram(r.histogram.clone()),
            ))
        }))
    }

    fn axis_vectors(&self) -> Cursor<'_> {
        Box::new(self.records.iter().filter_map(|r| {
            r.axes
                .as_ref()
                .map(|axes| Ok(CatalogEntry::new(r.id.clone(), Feature::Axes(axes.clone()))))
        }))
    }

    fn grey_histograms(&self) -> Cursor<'_> {
        Box::new(self.records.iter().filter_map(|r| {
            r.grey.as_ref().map(|grey| {
                Ok(CatalogEntry::new(
                    r.id.clone(),
                    Feature::Histogram(grey.clone()),
                ))
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryCatalog;
    use crate::catalog::{Catalog, CursorKind, Feature};
    use crate::histogram::{Histogram, HistogramKind};
    use crate::image::PixelArray;

    #[test]
    fn add_computes_three_features() {
        let mut catalog = MemoryCatalog::new(32).unwrap();
        catalog
            .add("red.png", PixelArray::solid_rgb(4, 4, [250, 10, 10]).unwrap())
            .unwrap();
        assert_eq!(catalog.len(), 1);

        let full: Vec<_> = catalog.histograms().collect::<Result<_, _>>().unwrap();
        assert_eq!(full[0].id, "red.png");
        assert!(matches!(&full[0].feature, Feature::Histogram(h) if h.kind() == HistogramKind::Color));

        let axes: Vec<_> = catalog.axis_vectors().collect::<Result<_, _>>().unwrap();
        assert!(matches!(&axes[0].feature, Feature::Axes(v) if v.values().len() == 40));

        let grey: Vec<_> = catalog
            .cursor(CursorKind::GreyHistograms)
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(matches!(&grey[0].feature, Feature::Histogram(h) if h.kind() == HistogramKind::Grey));
    }

    #[test]
    fn cursors_restart_from_the_beginning() {
        let mut catalog = MemoryCatalog::new(8).unwrap();
        for i in 0..3u8 {
            catalog
                .add(format!("img{i}"), PixelArray::grey(vec![i * 40; 4], 2, 2).unwrap())
                .unwrap();
        }
        assert_eq!(catalog.histograms().count(), 3);
        assert_eq!(catalog.histograms().count(), 3);
    }

    #[test]
    fn bare_color_histogram_only_feeds_full_cursor() {
        let mut catalog = MemoryCatalog::new(2).unwrap();
        let hist = Histogram::from_color(vec![1, 0], vec![0, 1], vec![1, 0]).unwrap();
        catalog.add_histogram("bare", hist, None).unwrap();
        assert_eq!(catalog.histograms().count(), 1);
        assert_eq!(catalog.axis_vectors().count(), 0);
        assert_eq!(catalog.grey_histograms().count(), 0);
    }
}
