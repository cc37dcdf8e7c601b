//! Unblocked baseline: straight row/column scans.
//!
//! The check walks the lower triangle including the diagonal, so a NaN on the
//! diagonal fails it like it fails the tiled variants.

use super::{assert_same_shape, within_tolerance, Kernel, Variant};
use crate::matrix::Matrix;

#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

impl Kernel for Sequential {
    fn variant(&self) -> Variant {
        Variant::Sequential
    }

    fn check_symmetric(&self, m: &Matrix) -> bool {
        let n = m.n();
        let data = m.as_slice();
        let mut check = true;

        for i in 0..n {
            for j in 0..=i {
                check &= within_tolerance(data[i * n + j], data[j * n + i]);
            }
        }

        check
    }

    fn transpose(&self, m: &Matrix, t: &mut Matrix) {
        assert_same_shape(m, t);
        transpose_unblocked(m.as_slice(), t.as_mut_slice(), m.n());
    }

    fn comparisons(&self, n: usize) -> u64 {
        (n * (n + 1) / 2) as u64
    }
}

/// `dst[j][i] = src[i][j]`, reading `src` row by row.
#[inline(always)]
pub(crate) fn transpose_unblocked(src: &[f64], dst: &mut [f64], n: usize) {
    for i in 0..n {
        for j in 0..n {
            dst[j * n + i] = src[i * n + j];
        }
    }
}
