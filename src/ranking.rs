//! Result ordering and the online merge of per-section batches.

use std::cmp::Ordering;

/// A mask placement reaching the threshold, reported at the mask centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Mask cells that landed on slime chunks.
    pub count: u32,
    pub x: i32,
    pub z: i32,
}

impl SearchResult {
    pub fn new(count: u32, x: i32, z: i32) -> Self {
        Self { count, x, z }
    }

    /// Squared distance from chunk `(0, 0)`.
    pub fn distance_sq(&self) -> u64 {
        let x = u64::from(self.x.unsigned_abs());
        let z = u64::from(self.z.unsigned_abs());
        x * x + z * z
    }
}

/// Rank order: `Less` means "listed first".
///
/// Higher count first, then closer to the origin, then larger `x`, then
/// larger `z`. Equal only when every field is equal.
impl Ord for SearchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.distance_sq().cmp(&other.distance_sq()))
            .then_with(|| other.x.cmp(&self.x))
            .then_with(|| other.z.cmp(&self.z))
    }
}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Globally ranked results, grown one batch at a time.
///
/// Each new result is appended and walked backwards until its predecessor
/// ranks ahead of it, so the list stays sorted without a final sort.
#[derive(Clone, Debug, Default)]
pub struct RankedResults {
    items: Vec<SearchResult>,
}

impl RankedResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge_batch(&mut self, batch: Vec<SearchResult>) {
        let start = self.items.len();
        self.items.extend(batch);
        for i in start..self.items.len() {
            let mut j = i;
            while j > 0 && self.items[j] < self.items[j - 1] {
                self.items.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[SearchResult] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<SearchResult> {
        self.items
    }
}
