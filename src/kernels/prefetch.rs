//! Cache-blocked traversal with software prefetch.
//!
//! Identical results to [`NaiveBlocked`](super::NaiveBlocked). While a tile is
//! processed, each of its rows issues a non-temporal prefetch for the matching
//! row of the tile visited next, so that tile is on its way into cache before
//! the current one is finished.

use super::{
    assert_same_shape, block_size, blocked::block_offset, blocked_comparisons, within_tolerance,
    Kernel, Variant,
};
use crate::{matrix::Matrix, simd::prefetch_nta};

#[derive(Debug, Default, Clone, Copy)]
pub struct PrefetchBlocked;

/// Offset of the tile following `(rb, cb)` in row-major tile order.
///
/// The column index wraps into the next tile row at the grid edge; the tile
/// after the last one is `(0, 0)`.
#[inline(always)]
pub(crate) fn next_block(n: usize, size: usize, rb: usize, cb: usize) -> usize {
    let grid = n / size;
    let (mut rb1, mut cb1) = (rb, cb + 1);

    if cb1 == grid {
        rb1 += 1;
        cb1 = 0;
    }
    if rb1 == grid {
        rb1 = 0;
    }

    block_offset(n, size, rb1, cb1)
}

impl Kernel for PrefetchBlocked {
    fn variant(&self) -> Variant {
        Variant::Prefetch
    }

    fn check_symmetric(&self, m: &Matrix) -> bool {
        let n = m.n();
        let size = block_size(n);
        let data = m.as_slice();
        let mut check = true;

        for rb in 0..n / size {
            for cb in 0..=rb {
                let first = block_offset(n, size, rb, cb);
                let last = block_offset(n, size, cb, rb);
                let prf_first = next_block(n, size, rb, cb);
                let prf_last = next_block(n, size, cb, rb);

                for i in 0..size {
                    prefetch_nta(&data[prf_first + i * n]);
                    prefetch_nta(&data[prf_last + i * n]);
                    for j in 0..size {
                        check &= within_tolerance(data[first + i * n + j], data[last + j * n + i]);
                    }
                }
            }
        }

        check
    }

    fn transpose(&self, m: &Matrix, t: &mut Matrix) {
        assert_same_shape(m, t);

        let n = m.n();
        let size = block_size(n);
        let src = m.as_slice();
        let dst = t.as_mut_slice();

        for rb in 0..n / size {
            for cb in 0..n / size {
                let source = block_offset(n, size, rb, cb);
                let destination = block_offset(n, size, cb, rb);
                let prf_source = next_block(n, size, rb, cb);

                for i in 0..size {
                    prefetch_nta(&src[prf_source + i * n]);
                    for j in 0..size {
                        dst[destination + i * n + j] = src[source + j * n + i];
                    }
                }
            }
        }
    }

    fn comparisons(&self, n: usize) -> u64 {
        blocked_comparisons(n, block_size(n))
    }
}
