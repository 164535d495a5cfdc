//! Ranked retrieval over catalog cursors.
//!
//! The scan scores every catalog entry against the query and keeps the best
//! `depth` entries in a bounded sorted buffer. Two modes are supported:
//! - `Intersection` scores `|100 - match_value(query, entry)|`.
//! - `Incremental` compares color-axis vectors with a distance metric.
//!
//! Entries whose stored payload is unreadable or malformed are logged and
//! skipped; errors caused by the query or the configuration abort the scan.

mod scan;

#[cfg(feature = "rayon")]
mod parallel;

pub use scan::retrieve;

use crate::axes::AxisBins;
use crate::catalog::{Catalog, CursorKind};
use crate::compare::RescalePolicy;
use crate::histogram::Histogram;
use crate::metric::DistanceMetric;
use crate::rank::RankedMatch;
use crate::util::HistMatchResult;
use std::time::Duration;

/// Comparison pipeline applied to each catalog entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Histogram intersection scored as a match percentage.
    #[default]
    Intersection,
    /// Color-axis vectors compared with a distance metric.
    Incremental,
}

/// Retrieval configuration.
#[derive(Clone, Debug)]
pub struct RetrievalConfig {
    /// Maximum number of results.
    pub depth: usize,
    /// Comparison pipeline.
    pub mode: RetrievalMode,
    /// Distance used in incremental mode.
    pub metric: DistanceMetric,
    /// Scan grey histograms instead of full histograms (intersection mode).
    pub grey: bool,
    /// Color-axis layout for incremental mode.
    pub axis_bins: AxisBins,
    /// Window policy used by histogram intersection.
    pub rescale: RescalePolicy,
    /// Shard the scan across the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
    /// Stop scanning after this much time and return the partial ranking.
    pub deadline: Option<Duration>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            depth: 15,
            mode: RetrievalMode::Intersection,
            metric: DistanceMetric::Euclidean,
            grey: false,
            axis_bins: AxisBins::default(),
            rescale: RescalePolicy::Legacy,
            parallel: false,
            deadline: None,
        }
    }
}

impl RetrievalConfig {
    /// Cursor that feeds the configured mode.
    pub fn cursor_kind(&self) -> CursorKind {
        match (self.mode, self.grey) {
            (RetrievalMode::Incremental, _) => CursorKind::AxisVectors,
            (RetrievalMode::Intersection, true) => CursorKind::GreyHistograms,
            (RetrievalMode::Intersection, false) => CursorKind::Histograms,
        }
    }
}

/// Outcome of a retrieval scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankedResult {
    /// Best matches, ascending by score.
    pub matches: Vec<RankedMatch>,
    /// Entries that were scored.
    pub scanned: usize,
    /// Entries that were skipped as unreadable or malformed.
    pub skipped: usize,
    /// True if the deadline cut the scan short.
    pub timed_out: bool,
}

impl RankedResult {
    /// Best match, if any.
    pub fn best(&self) -> Option<&RankedMatch> {
        self.matches.first()
    }
}

/// Retrieval front end bound to a configuration.
#[derive(Clone, Debug, Default)]
pub struct Retriever {
    cfg: RetrievalConfig,
}

impl Retriever {
    /// Creates a retriever with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: RetrievalConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.cfg
    }

    /// Scans the cursor of `catalog` matching the configured mode.
    pub fn search<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        query: &Histogram,
    ) -> HistMatchResult<RankedResult> {
        retrieve(catalog.cursor(self.cfg.cursor_kind()), query, &self.cfg)
    }
}
