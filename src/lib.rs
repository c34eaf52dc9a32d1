//! Finds regions of a seeded world where slime chunks cluster densely.
//!
//! The world is an infinite grid of chunks. Whether a chunk is a slime chunk
//! is derived from the world seed with Java's 48-bit LCG, so a search over
//! any rectangle is fully deterministic. The search is split into square
//! [`Section`]s that are computed and scanned by a pool of workers, and the
//! per-section hits are merged into one ranked list.
//!
//! ```no_run
//! use slime_search::{search, DiscMask, SearchArea, WorldSeed};
//!
//! let mask = DiscMask::new(8);
//! let hits = search(WorldSeed::new(0), SearchArea::new(-1000, -1000, 1000, 1000), 40, &mask)
//!     .expect("mask fits in a section");
//! for hit in hits.iter().take(10) {
//!     println!("{} @ {},{}", hit.count, hit.x, hit.z);
//! }
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod mask;
pub mod random;
pub mod ranking;
pub mod search;
pub mod section;
pub mod world;

pub use config::SearchOptions;
pub use control::{CancelToken, SearchProgress};
pub use error::SearchError;
pub use mask::{DiscMask, GridMask, Mask, MaskCells, RectMask};
pub use random::JavaRandom;
pub use ranking::{RankedResults, SearchResult};
pub use search::{search, search_with, SearchArea, SectionTile, Tiling};
pub use section::{Section, SECTION_SIZE};
pub use world::{is_slime_chunk, WorldSeed};
