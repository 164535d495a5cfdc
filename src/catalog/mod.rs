//! Catalog cursors over stored reference features.
//!
//! A catalog holds three features per reference image: its full histogram
//! (color, or grey for neutral images), its color-axis vector and a forced
//! grey histogram. Each is exposed through its own sequential cursor. A cursor
//! is finite and every call starts a fresh pass; entries that cannot be
//! produced are yielded as errors so the consumer can skip them.

mod memory;

#[cfg(feature = "image-io")]
mod directory;

#[cfg(feature = "image-io")]
pub use directory::DirectoryCatalog;
pub use memory::MemoryCatalog;

use crate::axes::ColorAxisVector;
use crate::histogram::Histogram;
use crate::util::HistMatchResult;

/// Stored payload of a catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Feature {
    /// Binned color or grey histogram.
    Histogram(Histogram),
    /// Precomputed color-axis vector.
    Axes(ColorAxisVector),
}

/// Identifier and payload yielded by a cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    /// Opaque identifier, typically the image path.
    pub id: String,
    /// Stored feature.
    pub feature: Feature,
}

impl CatalogEntry {
    /// Creates an entry.
    pub fn new(id: impl Into<String>, feature: Feature) -> Self {
        Self {
            id: id.into(),
            feature,
        }
    }
}

/// Which of the three per-image features a cursor yields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorKind {
    /// Full-resolution color (or grey) histograms.
    Histograms,
    /// Color-axis vectors.
    AxisVectors,
    /// Grey-only histograms.
    GreyHistograms,
}

/// Boxed sequential cursor.
pub type Cursor<'a> = Box<dyn Iterator<Item = HistMatchResult<CatalogEntry>> + 'a>;

/// Source of stored features.
pub trait Catalog {
    /// Number of reference images.
    fn len(&self) -> usize;

    /// Returns true if the catalog holds no references.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a pass over the full histograms.
    fn histograms(&self) -> Cursor<'_>;

    /// Starts a pass over the color-axis vectors.
    fn axis_vectors(&self) -> Cursor<'_>;

    /// Starts a pass over the grey histograms.
    fn grey_histograms(&self) -> Cursor<'_>;

    /// Starts a pass over the requested feature.
    fn cursor(&self, kind: CursorKind) -> Cursor<'_> {
        match kind {
            CursorKind::Histograms => self.histograms(),
            CursorKind::AxisVectors => self.axis_vectors(),
            CursorKind::GreyHistograms => self.grey_histograms(),
        }
    }
}
