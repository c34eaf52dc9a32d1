//! Square tiles of the chunk grid, the unit of parallel work.

use std::fmt;

use crate::mask::MaskCells;
use crate::ranking::SearchResult;
use crate::world::WorldSeed;

/// Side length of a section in chunks.
pub const SECTION_SIZE: i32 = 128;

const SECTION_AREA: usize = (SECTION_SIZE * SECTION_SIZE) as usize;

/// A `SECTION_SIZE` square of chunk flags anchored at `(x, z)`.
///
/// Buffer cell `(x, z)` holds chunk `(self.x + x, self.z + z)`. A section is
/// computed once by one worker, searched, then dropped.
pub struct Section {
    x: i32,
    z: i32,
    span_x: i32,
    span_z: i32,
    slime: Box<[bool]>,
}

impl Section {
    /// A section whose placements are limited only by the mask size.
    pub fn new(x: i32, z: i32) -> Self {
        Self::with_span(x, z, SECTION_SIZE, SECTION_SIZE)
    }

    /// A section that reports placements only for top-left offsets below
    /// `span_x` / `span_z`. The tiler uses this to clip the last row and
    /// column of sections to the search area.
    pub fn with_span(x: i32, z: i32, span_x: i32, span_z: i32) -> Self {
        Self {
            x,
            z,
            span_x,
            span_z,
            slime: vec![false; SECTION_AREA].into_boxed_slice(),
        }
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.z)
    }

    /// Fills every cell from the classifier.
    pub fn compute(&mut self, seed: WorldSeed) {
        for z in 0..SECTION_SIZE {
            for x in 0..SECTION_SIZE {
                let slime = seed.is_slime_chunk(self.x.wrapping_add(x), self.z.wrapping_add(z));
                self.set(x, z, slime);
            }
        }
    }

    /// Scores every placement of `mask` that fits inside this section and
    /// returns those reaching `threshold`.
    ///
    /// A placement at top-left offset `(x, z)` is reported at the mask's
    /// centre, `origin + (x, z) + (w / 2, h / 2)`. Offsets run over
    /// `0..=SECTION_SIZE - w`, which is exactly the tiling stride, so
    /// neighbouring sections never report the same placement. Coordinates
    /// wrap at the `i32` edge; the coordinator rejects areas that reach it.
    pub fn search(&self, mask: &MaskCells, threshold: u32) -> Vec<SearchResult> {
        let (center_x, center_z) = mask.center();
        let end_x = (SECTION_SIZE - mask.width() + 1).min(self.span_x);
        let end_z = (SECTION_SIZE - mask.height() + 1).min(self.span_z);

        let mut results = Vec::new();
        for z in 0..end_z {
            for x in 0..end_x {
                let count = self.overlap(x, z, mask);
                if count >= threshold {
                    results.push(SearchResult::new(
                        count,
                        self.x.wrapping_add(x + center_x),
                        self.z.wrapping_add(z + center_z),
                    ));
                }
            }
        }
        results
    }

    /// Number of mask cells landing on slime chunks with the mask's
    /// top-left corner at `(x0, z0)`.
    pub fn overlap(&self, x0: i32, z0: i32, mask: &MaskCells) -> u32 {
        mask.iter()
            .filter(|&(dx, dz)| self.get(x0 + dx, z0 + dz))
            .count() as u32
    }

    pub fn get(&self, x: i32, z: i32) -> bool {
        self.slime[section_index(x, z)]
    }

    pub fn set(&mut self, x: i32, z: i32, slime: bool) {
        self.slime[section_index(x, z)] = slime;
    }
}

fn section_index(x: i32, z: i32) -> usize {
    assert!((0..SECTION_SIZE).contains(&x), "x out of range: {x}");
    assert!((0..SECTION_SIZE).contains(&z), "z out of range: {z}");
    (SECTION_SIZE * z + x) as usize
}

/// One line per row: `x` marks a slime chunk, cells are space separated.
impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for z in 0..SECTION_SIZE {
            for x in 0..SECTION_SIZE {
                if x > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(if self.get(x, z) { "x" } else { " " })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("x", &self.x)
            .field("z", &self.z)
            .field("span_x", &self.span_x)
            .field("span_z", &self.span_z)
            .finish_non_exhaustive()
    }
}
