//! Search coordinator: tiles the area, fans sections out to workers and
//! merges their hits.
//!
//! Three roles run at once. One producer publishes sections into a bounded
//! queue, `workers` units compute and scan them, and the calling thread
//! drains a second bounded queue of result batches into a
//! [`RankedResults`]. The result queue closes when the last worker drops its
//! sender, which ends the merge loop.

use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::config::SearchOptions;
use crate::control::{CancelToken, SearchProgress};
use crate::error::SearchError;
use crate::mask::{Mask, MaskCells};
use crate::ranking::{RankedResults, SearchResult};
use crate::section::{Section, SECTION_SIZE};
use crate::world::WorldSeed;

/// Rectangle of mask placements to search, half-open: `[x0, x1) × [z0, z1)`.
///
/// A placement is identified by the mask's top-left chunk. Corners given in
/// descending order are swapped. Every placement must keep the whole mask at
/// or below `i32::MAX`; the search rejects areas that would not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchArea {
    x0: i32,
    z0: i32,
    x1: i32,
    z1: i32,
}

impl SearchArea {
    pub fn new(x0: i32, z0: i32, x1: i32, z1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            z0: z0.min(z1),
            x1: x0.max(x1),
            z1: z0.max(z1),
        }
    }

    pub fn min(&self) -> (i32, i32) {
        (self.x0, self.z0)
    }

    pub fn max(&self) -> (i32, i32) {
        (self.x1, self.z1)
    }

    pub fn width(&self) -> i64 {
        i64::from(self.x1) - i64::from(self.x0)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.z1) - i64::from(self.z0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        (self.x0..self.x1).contains(&x) && (self.z0..self.z1).contains(&z)
    }

    /// Whether every placement of `mask` in this area stays inside `i32`
    /// chunk coordinates.
    pub fn fits(&self, mask: &MaskCells) -> bool {
        if self.is_empty() {
            return true;
        }
        let limit = i64::from(i32::MAX);
        i64::from(self.x1) + i64::from(mask.width()) - 2 <= limit
            && i64::from(self.z1) + i64::from(mask.height()) - 2 <= limit
    }
}

/// Origin of one section plus how many placements per axis it owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionTile {
    pub x: i32,
    pub z: i32,
    pub span_x: i32,
    pub span_z: i32,
}

impl SectionTile {
    pub fn into_section(self) -> Section {
        Section::with_span(self.x, self.z, self.span_x, self.span_z)
    }
}

/// Row-major walk over the sections covering a [`SearchArea`].
///
/// Origins step by `SECTION_SIZE - mask + 1` per axis. Adjacent sections
/// overlap by `mask - 1` chunks, and since a section owns exactly `stride`
/// placements per axis every placement in the area lands in one section.
#[derive(Clone, Debug)]
pub struct Tiling {
    area: SearchArea,
    stride_x: i64,
    stride_z: i64,
    x: i64,
    z: i64,
}

impl Tiling {
    pub fn new(area: SearchArea, mask: &MaskCells) -> Self {
        Self {
            area,
            stride_x: i64::from(SECTION_SIZE - mask.width() + 1),
            stride_z: i64::from(SECTION_SIZE - mask.height() + 1),
            x: i64::from(area.x0),
            z: i64::from(area.z0),
        }
    }

    /// Total number of sections, independent of iteration progress.
    pub fn section_count(&self) -> u64 {
        if self.area.is_empty() {
            return 0;
        }
        let columns = (self.area.width() + self.stride_x - 1) / self.stride_x;
        let rows = (self.area.height() + self.stride_z - 1) / self.stride_z;
        (columns as u64) * (rows as u64)
    }
}

impl Iterator for Tiling {
    type Item = SectionTile;

    fn next(&mut self) -> Option<SectionTile> {
        let x1 = i64::from(self.area.x1);
        let z1 = i64::from(self.area.z1);
        if self.area.is_empty() || self.z >= z1 {
            return None;
        }
        let tile = SectionTile {
            x: self.x as i32,
            z: self.z as i32,
            span_x: self.stride_x.min(x1 - self.x) as i32,
            span_z: self.stride_z.min(z1 - self.z) as i32,
        };
        self.x += self.stride_x;
        if self.x >= x1 {
            self.x = i64::from(self.area.x0);
            self.z += self.stride_z;
        }
        Some(tile)
    }
}

/// Searches `area` with default [`SearchOptions`].
///
/// Returns every placement whose overlap with slime chunks is at least
/// `threshold`, best first (see [`SearchResult`]'s ordering).
pub fn search<M: Mask + ?Sized>(
    seed: WorldSeed,
    area: SearchArea,
    threshold: u32,
    mask: &M,
) -> Result<Vec<SearchResult>, SearchError> {
    search_with(seed, area, threshold, mask, &SearchOptions::default())
}

/// Searches `area` with explicit worker count, queue bound, cancellation and
/// progress reporting.
///
/// The mask is validated before any thread starts. A cancelled search
/// returns whatever had been merged when the workers stopped.
pub fn search_with<M: Mask + ?Sized>(
    seed: WorldSeed,
    area: SearchArea,
    threshold: u32,
    mask: &M,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>, SearchError> {
    options.validate()?;
    let cells = MaskCells::new(mask)?;
    if !area.fits(&cells) {
        return Err(SearchError::AreaOutOfRange {
            x1: area.x1,
            z1: area.z1,
            width: cells.width(),
            height: cells.height(),
        });
    }
    let tiling = Tiling::new(area, &cells);
    let section_total = tiling.section_count();
    if let Some(progress) = &options.progress {
        progress.begin(section_total);
    }

    tracing::info!(
        seed = seed.value(),
        sections = section_total,
        workers = options.workers,
        mask_cells = cells.len(),
        threshold,
        "starting search"
    );
    let start = Instant::now();

    // One extra thread for the producer; every unit blocks on a queue, so
    // each needs its own thread.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers + 1)
        .thread_name(|i| format!("section-worker-{i}"))
        .build()
        .map_err(|e| SearchError::WorkerPool(e.to_string()))?;

    let (section_tx, section_rx) = bounded::<Section>(options.queue_capacity);
    let (result_tx, result_rx) = bounded::<Vec<SearchResult>>(options.queue_capacity);
    let ctx = WorkerContext {
        seed,
        threshold,
        mask: &cells,
        cancel: &options.cancel,
        progress: options.progress.as_deref(),
    };

    let ranked = pool.in_place_scope(|scope| {
        let cancel = &options.cancel;
        scope.spawn(move |_| publish_sections(tiling, &section_tx, cancel));
        for worker in 0..options.workers {
            let sections = section_rx.clone();
            let results = result_tx.clone();
            scope.spawn(move |_| ctx.run(worker, &sections, &results));
        }
        // Disconnection is driven by the producer and workers from here on.
        drop(section_rx);
        drop(result_tx);

        let mut ranked = RankedResults::new();
        for batch in result_rx.iter() {
            ranked.merge_batch(batch);
        }
        ranked
    });

    if options.cancel.is_cancelled() {
        tracing::warn!(results = ranked.len(), "search cancelled");
    }
    tracing::info!(
        results = ranked.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search finished"
    );
    Ok(ranked.into_vec())
}

fn publish_sections(tiling: Tiling, sections: &Sender<Section>, cancel: &CancelToken) {
    for tile in tiling {
        if cancel.is_cancelled() {
            break;
        }
        // Fails only once every worker is gone.
        if sections.send(tile.into_section()).is_err() {
            break;
        }
    }
}

/// Read-only state shared by all workers of one search.
#[derive(Clone, Copy)]
struct WorkerContext<'a> {
    seed: WorldSeed,
    threshold: u32,
    mask: &'a MaskCells,
    cancel: &'a CancelToken,
    progress: Option<&'a SearchProgress>,
}

impl WorkerContext<'_> {
    fn run(
        self,
        worker: usize,
        sections: &Receiver<Section>,
        results: &Sender<Vec<SearchResult>>,
    ) {
        let mut searched = 0u64;
        for mut section in sections.iter() {
            if self.cancel.is_cancelled() {
                break;
            }
            section.compute(self.seed);
            let batch = section.search(self.mask, self.threshold);
            searched += 1;
            if let Some(progress) = self.progress {
                progress.section_done(batch.len());
            }
            if !batch.is_empty() && results.send(batch).is_err() {
                break;
            }
        }
        tracing::debug!(worker, sections = searched, "section worker finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::RectMask;

    fn cells(width: i32, height: i32) -> MaskCells {
        MaskCells::new(&RectMask::new(width, height)).unwrap()
    }

    #[test]
    fn area_normalizes_corners() {
        let area = SearchArea::new(10, -5, -10, -20);
        assert_eq!(area.min(), (-10, -20));
        assert_eq!(area.max(), (10, -5));
        assert_eq!(area, SearchArea::new(-10, -20, 10, -5));
        assert!(area.contains(-10, -20));
        assert!(!area.contains(10, -20));
    }

    #[test]
    fn tiling_steps_by_section_minus_mask() {
        let mask = cells(17, 1);
        let tiles: Vec<_> = Tiling::new(SearchArea::new(0, 0, 300, 130), &mask).collect();
        // stride 112 in x, 128 in z
        let origins: Vec<_> = tiles.iter().map(|t| (t.x, t.z)).collect();
        assert_eq!(
            origins,
            vec![(0, 0), (112, 0), (224, 0), (0, 128), (112, 128), (224, 128)]
        );
        assert_eq!(tiles[0].span_x, 112);
        assert_eq!(tiles[2].span_x, 76);
        assert_eq!(tiles[3].span_z, 2);
        assert_eq!(Tiling::new(SearchArea::new(0, 0, 300, 130), &mask).section_count(), 6);
    }

    #[test]
    fn tile_spans_partition_the_area() {
        let mask = cells(9, 4);
        let area = SearchArea::new(-321, 57, 40, 500);
        let tiling = Tiling::new(area, &mask);
        let count = tiling.section_count();
        let tiles: Vec<_> = tiling.collect();
        assert_eq!(tiles.len() as u64, count);

        let covered: i64 = tiles
            .iter()
            .map(|t| i64::from(t.span_x) * i64::from(t.span_z))
            .sum();
        assert_eq!(covered, area.width() * area.height());
    }

    #[test]
    fn empty_area_has_no_tiles() {
        let mask = cells(1, 1);
        let tiling = Tiling::new(SearchArea::new(5, 0, 5, 100), &mask);
        assert_eq!(tiling.section_count(), 0);
        assert_eq!(tiling.count(), 0);
    }

    #[test]
    fn area_fits_up_to_the_world_edge() {
        let wide = cells(5, 1);
        assert!(SearchArea::new(0, 0, i32::MAX - 3, 3).fits(&wide));
        assert!(!SearchArea::new(0, 0, i32::MAX - 2, 3).fits(&wide));
        assert!(SearchArea::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX).fits(&cells(1, 1)));
        assert!(!SearchArea::new(0, i32::MAX - 1, 1, i32::MAX).fits(&cells(1, 3)));
        assert!(SearchArea::new(i32::MAX, 0, i32::MAX, 9).fits(&wide));
    }

    #[test]
    fn tiling_survives_extreme_coordinates() {
        let mask = cells(1, 1);
        let area = SearchArea::new(i32::MAX - 200, i32::MAX - 10, i32::MAX, i32::MAX);
        let tiles: Vec<_> = Tiling::new(area, &mask).collect();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[1].x, i32::MAX - 200 + 128);
        assert_eq!(tiles[1].span_x, 72);
    }
}
