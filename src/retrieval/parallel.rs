//! Rayon-parallel catalog scan (feature-gated).
//!
//! The cursor is pulled in bounded batches. Each batch is split into
//! contiguous shards scored on the rayon pool, and shard rankings are merged
//! in cursor order, so the result equals the sequential scan whenever no
//! deadline fires. The deadline is checked while a batch is filled; entries
//! already pulled are still scored.

use crate::catalog::CatalogEntry;
use crate::retrieval::scan::{deadline_passed, Probe, ScanState};
use crate::retrieval::{RankedResult, RetrievalConfig};
use crate::util::HistMatchResult;
use rayon::prelude::*;
use std::time::Instant;

const MIN_SHARD: usize = 64;
const SHARDS_PER_BATCH: usize = 4;

pub(crate) fn scan_par<I>(
    cursor: I,
    probe: &Probe<'_>,
    cfg: &RetrievalConfig,
) -> HistMatchResult<RankedResult>
where
    I: IntoIterator<Item = HistMatchResult<CatalogEntry>>,
{
    let started = Instant::now();
    let threads = rayon::current_num_threads();
    let batch_len = batch_len(threads);
    let mut cursor = cursor.into_iter();
    let mut merged = ScanState::new(cfg.depth);
    let mut batch = Vec::with_capacity(batch_len);

    loop {
        batch.clear();
        while batch.len() < batch_len {
            if deadline_passed(started, cfg.deadline) {
                merged.timed_out = true;
                break;
            }
            match cursor.next() {
                Some(item) => batch.push(item),
                None => break,
            }
        }
        if batch.is_empty() {
            break;
        }

        let shards: Vec<HistMatchResult<ScanState>> = batch
            .par_chunks(shard_len(batch.len(), threads))
            .map(|chunk| {
                let mut state = ScanState::new(cfg.depth);
                for item in chunk {
                    state.consume(item, probe, cfg)?;
                }
                Ok(state)
            })
            .collect();
        for shard in shards {
            merged.merge(shard?);
        }

        if merged.timed_out || batch.len() < batch_len {
            break;
        }
    }
    Ok(merged.finish())
}

fn batch_len(threads: usize) -> usize {
    threads.max(1) * MIN_SHARD * SHARDS_PER_BATCH
}

fn shard_len(items: usize, threads: usize) -> usize {
    let target = items.div_ceil(threads.max(1) * SHARDS_PER_BATCH);
    target.max(MIN_SHARD)
}

#[cfg(test)]
mod tests {
    use super::{batch_len, shard_len};

    #[test]
    fn shard_len_has_floor() {
        assert_eq!(shard_len(10, 8), 64);
        assert_eq!(shard_len(10_000, 4), 625);
        assert_eq!(shard_len(1, 0), 64);
    }

    #[test]
    fn full_batch_splits_into_min_shards() {
        for threads in [1, 4, 16] {
            let len = batch_len(threads);
            assert_eq!(shard_len(len, threads), 64);
        }
        assert_eq!(batch_len(0), 256);
    }
}
