//! Patterns laid over the chunk grid.
//!
//! A [`Mask`] is any bounded 2D predicate. The search only reads it once,
//! through [`MaskCells`], on the calling thread.

use crate::error::SearchError;
use crate::section::SECTION_SIZE;

/// A bounded 2D pattern of chunks.
pub trait Mask {
    /// `(width, height)` in chunks.
    fn bounds(&self) -> (i32, i32);

    /// Whether cell `(x, z)` belongs to the pattern, for
    /// `0 <= x < width` and `0 <= z < height`.
    fn query(&self, x: i32, z: i32) -> bool;
}

impl<M: Mask + ?Sized> Mask for &M {
    fn bounds(&self) -> (i32, i32) {
        (**self).bounds()
    }

    fn query(&self, x: i32, z: i32) -> bool {
        (**self).query(x, z)
    }
}

/// Every cell of a `width` x `height` rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectMask {
    width: i32,
    height: i32,
}

impl RectMask {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Mask for RectMask {
    fn bounds(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn query(&self, _x: i32, _z: i32) -> bool {
        true
    }
}

/// Chunks whose centre lies within `radius` of the mask centre, optionally
/// hollowed out by an inner exclusion radius.
///
/// The mask is `2 * radius + 1` chunks on a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscMask {
    radius: i32,
    exclusion: Option<i32>,
}

impl DiscMask {
    pub fn new(radius: i32) -> Self {
        Self {
            radius: radius.max(0),
            exclusion: None,
        }
    }

    /// Drops every chunk within `radius` of the centre (inclusive).
    #[must_use]
    pub fn with_exclusion(mut self, radius: i32) -> Self {
        self.exclusion = Some(radius);
        self
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }
}

impl Mask for DiscMask {
    fn bounds(&self) -> (i32, i32) {
        // saturates so oversized discs fail the section size check
        let side = (i64::from(self.radius) * 2 + 1).min(i64::from(i32::MAX)) as i32;
        (side, side)
    }

    fn query(&self, x: i32, z: i32) -> bool {
        let dx = i64::from(x - self.radius);
        let dz = i64::from(z - self.radius);
        let dsqr = dx * dx + dz * dz;
        let r = i64::from(self.radius);
        if dsqr > r * r {
            return false;
        }
        match self.exclusion {
            Some(inner) => dsqr > i64::from(inner) * i64::from(inner),
            None => true,
        }
    }
}

/// Explicit row-major cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMask {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl GridMask {
    /// `cells[z * width + x]` is cell `(x, z)`.
    pub fn new(width: i32, height: i32, cells: Vec<bool>) -> Result<Self, SearchError> {
        if width <= 0 || height <= 0 {
            return Err(SearchError::EmptyMask { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(SearchError::MaskCellCount {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl Mask for GridMask {
    fn bounds(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn query(&self, x: i32, z: i32) -> bool {
        self.cells[(z * self.width + x) as usize]
    }
}

/// The true cells of a mask, validated against the section size.
///
/// Overlap counts walk this list instead of querying the mask for every
/// cell of every placement; the count is still the full, exact overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskCells {
    width: i32,
    height: i32,
    cells: Vec<(i32, i32)>,
}

impl MaskCells {
    /// Collects the true cells of `mask`.
    ///
    /// Fails if either dimension is not positive or reaches [`SECTION_SIZE`].
    pub fn new<M: Mask + ?Sized>(mask: &M) -> Result<Self, SearchError> {
        let (width, height) = mask.bounds();
        if width <= 0 || height <= 0 {
            return Err(SearchError::EmptyMask { width, height });
        }
        if width >= SECTION_SIZE || height >= SECTION_SIZE {
            return Err(SearchError::MaskTooLarge {
                width,
                height,
                limit: SECTION_SIZE,
            });
        }
        let mut cells = Vec::new();
        for z in 0..height {
            for x in 0..width {
                if mask.query(x, z) {
                    cells.push((x, z));
                }
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Offset from a placement's top-left corner to the reported centre.
    pub fn center(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_mask_is_full() {
        let cells = MaskCells::new(&RectMask::new(3, 2)).unwrap();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells.center(), (1, 1));
    }

    #[test]
    fn disc_mask_shape() {
        let disc = DiscMask::new(3);
        assert_eq!(disc.bounds(), (7, 7));
        let cells = MaskCells::new(&disc).unwrap();
        assert_eq!(cells.len(), 29);
        assert!(disc.query(3, 3));
        assert!(disc.query(0, 3));
        assert!(!disc.query(0, 0));
    }

    #[test]
    fn disc_mask_exclusion_removes_centre() {
        let ring = DiscMask::new(3).with_exclusion(1);
        let cells = MaskCells::new(&ring).unwrap();
        // centre plus its four direct neighbours are excluded
        assert_eq!(cells.len(), 29 - 5);
        assert!(!ring.query(3, 3));
        assert!(!ring.query(4, 3));
        assert!(ring.query(4, 4));
    }

    #[test]
    fn grid_mask_row_major() {
        let mask = GridMask::new(3, 2, vec![true, false, false, false, false, true]).unwrap();
        assert!(mask.query(0, 0));
        assert!(mask.query(2, 1));
        assert!(!mask.query(1, 0));
        let cells: Vec<_> = MaskCells::new(&mask).unwrap().iter().collect();
        assert_eq!(cells, vec![(0, 0), (2, 1)]);
    }

    #[test]
    fn huge_disc_is_too_large_not_overflowed() {
        let disc = DiscMask::new(1 << 30);
        assert_eq!(disc.bounds(), (i32::MAX, i32::MAX));
        let err = MaskCells::new(&disc).unwrap_err();
        assert!(matches!(err, SearchError::MaskTooLarge { .. }));
    }

    #[test]
    fn blank_grid_has_no_cells() {
        let blank = GridMask::new(4, 4, vec![false; 16]).unwrap();
        let cells = MaskCells::new(&blank).unwrap();
        assert!(cells.is_empty());
        assert_eq!(cells.len(), 0);
        assert!(!MaskCells::new(&RectMask::new(1, 1)).unwrap().is_empty());
    }

    #[test]
    fn grid_mask_rejects_wrong_cell_count() {
        let err = GridMask::new(2, 2, vec![true; 3]).unwrap_err();
        assert_eq!(
            err,
            SearchError::MaskCellCount {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn mask_as_large_as_section_rejected() {
        let err = MaskCells::new(&RectMask::new(SECTION_SIZE, 1)).unwrap_err();
        assert!(matches!(err, SearchError::MaskTooLarge { .. }));
        let err = MaskCells::new(&RectMask::new(1, SECTION_SIZE + 5)).unwrap_err();
        assert!(matches!(err, SearchError::MaskTooLarge { .. }));
        assert!(MaskCells::new(&RectMask::new(SECTION_SIZE - 1, SECTION_SIZE - 1)).is_ok());
    }

    #[test]
    fn empty_bounds_rejected() {
        let err = MaskCells::new(&RectMask::new(0, 4)).unwrap_err();
        assert_eq!(err, SearchError::EmptyMask { width: 0, height: 4 });
    }

    #[test]
    fn works_through_trait_object() {
        let mask: Box<dyn Mask> = Box::new(RectMask::new(2, 2));
        assert_eq!(MaskCells::new(&*mask).unwrap().len(), 4);
    }
}
