//! histmatch is a histogram-based content image retrieval library.
//!
//! Query images are reduced to color or grey histograms and ranked against a
//! catalog of reference histograms, either by histogram intersection or by
//! a distance between compact color-axis vectors. Scans keep a bounded,
//! sorted top-K and skip unreadable catalog entries. Parallel scans are
//! available via the `rayon` feature and image decoding via `image-io`.

pub mod axes;
pub mod catalog;
pub mod compare;
pub mod histogram;
pub mod image;
pub mod metric;
pub mod rank;
pub mod retrieval;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use axes::{project_color_axes, AxisBins, ColorAxisVector};
pub use catalog::{Catalog, CatalogEntry, CursorKind, Feature, MemoryCatalog};
pub use compare::{
    intersect, intersect_with, match_score, match_value, match_value_with, Intersection,
    RescalePolicy,
};
pub use histogram::{build_histogram, Channels, Histogram, HistogramKind};
pub use crate::image::{PixelArray, PixelLayout};
pub use metric::{euclidean_distance, jaccard_distance, DistanceMetric};
pub use rank::{RankedMatch, TopK};
pub use retrieval::{retrieve, RankedResult, RetrievalConfig, RetrievalMode, Retriever};
pub use util::{HistMatchError, HistMatchResult};

#[cfg(feature = "image-io")]
pub use catalog::DirectoryCatalog;
