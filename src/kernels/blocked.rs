//! Cache-blocked traversal.
//!
//! The matrix is split into `size × size` tiles with `size = min(BLOCK_SIZE, n)`.
//! The symmetry check visits tile pairs `(rb, cb)` / `(cb, rb)` of the lower
//! triangle only; the transpose copies every tile into its mirrored slot.

use super::{
    assert_same_shape, block_size, blocked_comparisons, within_tolerance, Kernel, Variant,
};
use crate::matrix::Matrix;

#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveBlocked;

/// Offset of the top-left element of tile `(rb, cb)`.
#[inline(always)]
pub(crate) fn block_offset(n: usize, size: usize, rb: usize, cb: usize) -> usize {
    (rb * n + cb) * size
}

/// Compares tile `(rb, cb)` element-wise with the transpose of tile `(cb, rb)`.
///
/// Every element is compared; the result is `false` if any pair differs.
#[inline(always)]
pub(crate) fn compare_block(data: &[f64], n: usize, size: usize, rb: usize, cb: usize) -> bool {
    let first = block_offset(n, size, rb, cb);
    let last = block_offset(n, size, cb, rb);
    let mut check = true;

    for i in 0..size {
        for j in 0..size {
            check &= within_tolerance(data[first + i * n + j], data[last + j * n + i]);
        }
    }

    check
}

/// Copies tile `(rb, cb)` of `src` into tile `(cb, rb)` of `dst`, transposed.
#[inline(always)]
pub(crate) fn transpose_block(
    src: &[f64],
    dst: &mut [f64],
    n: usize,
    size: usize,
    rb: usize,
    cb: usize,
) {
    let source = block_offset(n, size, rb, cb);
    let destination = block_offset(n, size, cb, rb);

    for i in 0..size {
        for j in 0..size {
            dst[destination + i * n + j] = src[source + j * n + i];
        }
    }
}

impl Kernel for NaiveBlocked {
    fn variant(&self) -> Variant {
        Variant::Blocked
    }

    fn check_symmetric(&self, m: &Matrix) -> bool {
        let n = m.n();
        let size = block_size(n);
        let data = m.as_slice();
        debug_assert_eq!(n % size, 0, "{n} is not a multiple of the tile size {size}");

        let mut check = true;
        for rb in 0..n / size {
            for cb in 0..=rb {
                check &= compare_block(data, n, size, rb, cb);
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
                transpose_block(src, dst, n, size, rb, cb);
            }
        }
    }

    fn comparisons(&self, n: usize) -> u64 {
        blocked_comparisons(n, block_size(n))
    }
}
