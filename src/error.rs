//! Errors returned by the search entry points.

use thiserror::Error;

/// Errors that can occur before a search starts.
///
/// Once a search is running nothing can fail: every section is pure
/// computation over validated inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The mask does not fit strictly inside one section.
    #[error("mask bounds {width}x{height} exceed section size {limit}")]
    MaskTooLarge {
        /// Mask width in chunks.
        width: i32,
        /// Mask height in chunks.
        height: i32,
        /// Section side length; both bounds must be below it.
        limit: i32,
    },

    /// The mask has a zero or negative dimension.
    #[error("mask bounds {width}x{height} are empty")]
    EmptyMask {
        /// Mask width in chunks.
        width: i32,
        /// Mask height in chunks.
        height: i32,
    },

    /// Explicit mask cells do not match the declared bounds.
    #[error("mask has {actual} cells, expected {expected}")]
    MaskCellCount {
        /// `width * height`.
        expected: usize,
        /// Cells supplied.
        actual: usize,
    },

    /// Some placement in the area would cover chunks past `i32::MAX`.
    #[error("search area ending at {x1},{z1} overflows chunk coordinates with a {width}x{height} mask")]
    AreaOutOfRange {
        /// Exclusive upper x bound of the area.
        x1: i32,
        /// Exclusive upper z bound of the area.
        z1: i32,
        /// Mask width in chunks.
        width: i32,
        /// Mask height in chunks.
        height: i32,
    },

    /// Worker count or queue capacity is unusable.
    #[error("invalid search options: {0}")]
    InvalidOptions(String),

    /// The worker thread pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}
