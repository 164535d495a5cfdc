//! Sequential catalog scan and per-entry scoring.

use crate::axes::{project_color_axes, ColorAxisVector};
use crate::catalog::{CatalogEntry, Feature};
use crate::compare::match_value_with;
use crate::histogram::{Histogram, HistogramKind};
use crate::rank::{RankedMatch, TopK};
use crate::retrieval::{RankedResult, RetrievalConfig, RetrievalMode};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{HistMatchError, HistMatchResult};
use std::time::{Duration, Instant};

/// Scans `cursor` and returns the best `cfg.depth` entries for `query`.
///
/// Cursor items that are errors, and entries whose stored payload is
/// malformed, are skipped and counted in `RankedResult::skipped`. Invalid
/// depth, an invalid query, or a payload that does not fit the mode abort the
/// scan.
pub fn retrieve<I>(cursor: I, query: &Histogram, cfg: &RetrievalConfig) -> HistMatchResult<RankedResult>
where
    I: IntoIterator<Item = HistMatchResult<CatalogEntry>>,
{
    if cfg.depth == 0 {
        return Err(HistMatchError::InvalidDepth { depth: cfg.depth });
    }
    let probe = Probe::prepare(query, cfg)?;

    let _span = trace_span!("retrieve", depth = cfg.depth, parallel = cfg.parallel).entered();
    let result = dispatch(cursor, &probe, cfg)?;
    trace_event!(
        "retrieve_done",
        scanned = result.scanned,
        skipped = result.skipped,
        timed_out = result.timed_out
    );
    Ok(result)
}

#[cfg(feature = "rayon")]
fn dispatch<I>(cursor: I, probe: &Probe<'_>, cfg: &RetrievalConfig) -> HistMatchResult<RankedResult>
where
    I: IntoIterator<Item = HistMatchResult<CatalogEntry>>,
{
    if cfg.parallel {
        crate::retrieval::parallel::scan_par(cursor, probe, cfg)
    } else {
        scan_seq(cursor, probe, cfg)
    }
}

#[cfg(not(feature = "rayon"))]
fn dispatch<I>(cursor: I, probe: &Probe<'_>, cfg: &RetrievalConfig) -> HistMatchResult<RankedResult>
where
    I: IntoIterator<Item = HistMatchResult<CatalogEntry>>,
{
    scan_seq(cursor, probe, cfg)
}

fn scan_seq<I>(cursor: I, probe: &Probe<'_>, cfg: &RetrievalConfig) -> HistMatchResult<RankedResult>
where
    I: IntoIterator<Item = HistMatchResult<CatalogEntry>>,
{
    let started = Instant::now();
    let mut state = ScanState::new(cfg.depth);
    for item in cursor {
        if deadline_passed(started, cfg.deadline) {
            state.timed_out = true;
            break;
        }
        state.consume(&item, probe, cfg)?;
    }
    Ok(state.finish())
}

pub(crate) fn deadline_passed(started: Instant, deadline: Option<Duration>) -> bool {
    deadline.is_some_and(|limit| started.elapsed() >= limit)
}

/// Query in the form the configured mode compares against.
pub(crate) enum Probe<'a> {
    Histogram(&'a Histogram),
    Axes(ColorAxisVector),
}

impl<'a> Probe<'a> {
    fn prepare(query: &'a Histogram, cfg: &RetrievalConfig) -> HistMatchResult<Self> {
        query.validate()?;
        match cfg.mode {
            RetrievalMode::Intersection => Ok(Probe::Histogram(query)),
            RetrievalMode::Incremental => Ok(Probe::Axes(project_color_axes(query, cfg.axis_bins)?)),
        }
    }
}

enum Verdict {
    Scored(f64),
    Skipped(HistMatchError),
}

fn score_entry(probe: &Probe<'_>, feature: &Feature, cfg: &RetrievalConfig) -> HistMatchResult<Verdict> {
    match (probe, feature) {
        (Probe::Axes(query), Feature::Axes(stored)) => Ok(axis_distance(query, stored, cfg)),
        (Probe::Axes(query), Feature::Histogram(stored)) => {
            if let Err(err) = stored.validate() {
                return Ok(Verdict::Skipped(err));
            }
            match project_color_axes(stored, cfg.axis_bins) {
                Ok(stored) => Ok(axis_distance(query, &stored, cfg)),
                Err(err) => Ok(Verdict::Skipped(err)),
            }
        }
        (Probe::Histogram(query), Feature::Histogram(stored)) => {
            intersection_distance(query, stored, cfg)
        }
        (Probe::Histogram(_), Feature::Axes(_)) => Err(HistMatchError::InvalidArgument(
            "intersection retrieval needs histogram entries, got a color-axis vector",
        )),
    }
}

fn axis_distance(query: &ColorAxisVector, stored: &ColorAxisVector, cfg: &RetrievalConfig) -> Verdict {
    if stored.bins() != query.bins() {
        return Verdict::Skipped(HistMatchError::DimensionMismatch {
            left: query.values().len(),
            right: stored.values().len(),
        });
    }
    match cfg.metric.distance(query.values(), stored.values()) {
        Ok(distance) => Verdict::Scored(distance),
        Err(err) => Verdict::Skipped(err),
    }
}

fn intersection_distance(
    query: &Histogram,
    stored: &Histogram,
    cfg: &RetrievalConfig,
) -> HistMatchResult<Verdict> {
    if let Err(err) = stored.validate() {
        return Ok(Verdict::Skipped(err));
    }
    if stored.total_pixels() == 0 {
        return Ok(Verdict::Skipped(HistMatchError::InvalidHistogram {
            reason: "model histogram has no counts",
        }));
    }
    // Mixed kinds re-derive grey counts from the color side's pixels.
    match (query.kind(), stored.kind()) {
        (HistogramKind::Grey, HistogramKind::Color) if stored.pixels().is_none() => {
            return Ok(Verdict::Skipped(HistMatchError::MissingPixels {
                context: "grey conversion",
            }));
        }
        (HistogramKind::Color, HistogramKind::Grey) if query.pixels().is_none() => {
            return Err(HistMatchError::MissingPixels {
                context: "grey conversion of the query",
            });
        }
        _ => {}
    }
    let percentage = match_value_with(query, stored, cfg.rescale)?;
    Ok(Verdict::Scored((100.0 - percentage).abs()))
}

/// Bounded ranking plus scan counters.
pub(crate) struct ScanState {
    topk: TopK,
    scanned: usize,
    skipped: usize,
    pub(crate) timed_out: bool,
}

impl ScanState {
    pub(crate) fn new(depth: usize) -> Self {
        Self {
            topk: TopK::new(depth),
            scanned: 0,
            skipped: 0,
            timed_out: false,
        }
    }

    pub(crate) fn consume(
        &mut self,
        item: &HistMatchResult<CatalogEntry>,
        probe: &Probe<'_>,
        cfg: &RetrievalConfig,
    ) -> HistMatchResult<()> {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                self.skip(entry_id(err), err);
                return Ok(());
            }
        };
        match score_entry(probe, &entry.feature, cfg)? {
            Verdict::Scored(score) => {
                self.scanned += 1;
                self.topk.push(RankedMatch {
                    score,
                    id: entry.id.clone(),
                });
            }
            Verdict::Skipped(err) => self.skip(&entry.id, &err),
        }
        Ok(())
    }

    fn skip(&mut self, id: &str, err: &HistMatchError) {
        let reason = err.to_string();
        trace_warn!("skip_entry", id = id, reason = reason.as_str());
        self.skipped += 1;
    }

    /// Folds another shard's state into this one, preserving shard order.
    #[cfg(feature = "rayon")]
    pub(crate) fn merge(&mut self, other: ScanState) {
        self.topk.merge(other.topk);
        self.scanned += other.scanned;
        self.skipped += other.skipped;
        self.timed_out |= other.timed_out;
    }

    pub(crate) fn finish(self) -> RankedResult {
        RankedResult {
            matches: self.topk.into_sorted(),
            scanned: self.scanned,
            skipped: self.skipped,
            timed_out: self.timed_out,
        }
    }
}

fn entry_id(err: &HistMatchError) -> &str {
    match err {
        HistMatchError::CatalogEntryUnreadable { id, .. } => id,
        _ => "<unknown>",
    }
}
