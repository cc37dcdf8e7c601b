//! Symmetry-check and transpose kernels.
//!
//! Every strategy implements [`Kernel`] over the same [`Matrix`] layout and is
//! selected at runtime through [`Variant`]. Kernels never fail: a mismatch only
//! clears the boolean result, and every comparison is performed regardless of
//! earlier mismatches so repeated calls do the same amount of work.

use std::fmt;

use crate::{error::Result, matrix::Matrix, BLOCK_SIZE, EPSILON};

pub mod blocked;
pub mod parallel;
pub mod prefetch;
pub mod sequential;
pub mod vectorized;

pub use blocked::NaiveBlocked;
pub use parallel::ParallelBlocked;
pub use prefetch::PrefetchBlocked;
pub use sequential::Sequential;
pub use vectorized::VectorizedSimd;

/// Shared contract of every kernel variant.
pub trait Kernel {
    fn variant(&self) -> Variant;

    /// Worker threads used per call; 1 for single-threaded variants.
    fn threads(&self) -> usize {
        1
    }

    /// `true` iff `M[i][j]` and `M[j][i]` agree within [`EPSILON`] for all `i, j`.
    fn check_symmetric(&self, m: &Matrix) -> bool;

    /// Writes the transpose of `m` into `t`, overwriting every element.
    ///
    /// # Panics
    ///
    /// Panics if `m` and `t` have different dimensions.
    fn transpose(&self, m: &Matrix, t: &mut Matrix);

    /// Element comparisons one `check_symmetric` call performs on an `n × n` matrix.
    fn comparisons(&self, n: usize) -> u64;
}

/// The available kernel strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// Unblocked row/column scan.
    Sequential,
    /// Cache-blocked traversal.
    Blocked,
    /// Cache-blocked traversal with non-temporal prefetch of the next block.
    Prefetch,
    /// 4-lane SIMD symmetry check, unblocked transpose.
    Vectorized,
    /// Blocked traversal spread over a worker pool.
    Parallel,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Sequential,
        Variant::Blocked,
        Variant::Prefetch,
        Variant::Vectorized,
        Variant::Parallel,
    ];

    /// Code written to the result artifacts.
    pub fn code(self) -> &'static str {
        match self {
            Variant::Sequential => "S",
            Variant::Blocked => "B",
            Variant::Prefetch => "BP",
            Variant::Vectorized => "V",
            Variant::Parallel => "OBT",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Sequential => "sequential",
            Variant::Blocked => "blocked",
            Variant::Prefetch => "prefetch",
            Variant::Vectorized => "vectorized",
            Variant::Parallel => "parallel",
        }
    }

    pub fn is_parallel(self) -> bool {
        matches!(self, Variant::Parallel)
    }

    /// Builds the kernel; `threads` is ignored by single-threaded variants.
    pub fn kernel(self, threads: usize) -> Result<Box<dyn Kernel>> {
        Ok(match self {
            Variant::Sequential => Box::new(Sequential),
            Variant::Blocked => Box::new(NaiveBlocked),
            Variant::Prefetch => Box::new(PrefetchBlocked),
            Variant::Vectorized => Box::new(VectorizedSimd),
            Variant::Parallel => Box::new(ParallelBlocked::new(threads)?),
        })
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// `|a - b| <= EPSILON`; NaN never compares equal.
#[inline(always)]
pub fn within_tolerance(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// Tile edge for the single-threaded blocked variants.
#[inline(always)]
pub fn block_size(n: usize) -> usize {
    BLOCK_SIZE.min(n).max(1)
}

/// Number of `(rb, cb)` pairs with `cb <= rb` in a `grid × grid` block grid.
#[inline(always)]
pub fn triangle_blocks(grid: usize) -> usize {
    grid * (grid + 1) / 2
}

/// Comparisons performed by a blocked symmetry check with tiles of `size`.
pub(crate) fn blocked_comparisons(n: usize, size: usize) -> u64 {
    let grid = n / size;
    (triangle_blocks(grid) * size * size) as u64
}

#[inline(always)]
pub(crate) fn assert_same_shape(m: &Matrix, t: &Matrix) {
    assert_eq!(
        m.n(),
        t.n(),
        "transpose target must be {}x{}, got {}x{}",
        m.n(),
        m.n(),
        t.n(),
        t.n()
    );
}
