//! 4-lane SIMD symmetry check.
//!
//! For every row `i` the strictly-lower part `j < i` is walked four columns at a
//! time: the row values are one contiguous load, the mirrored column values are
//! gathered from four rows. A group passes only if all four lanes are within
//! [`EPSILON`]. The diagonal element is always examined, by a group or by the
//! scalar tail. The transpose is the plain unblocked loop and serves as the
//! baseline for the vectorization comparison.

use super::{
    assert_same_shape, sequential::transpose_unblocked, within_tolerance, Kernel, Variant,
};
use crate::{
    matrix::Matrix,
    simd::{SimdVec, ALL_LANES, F64x4, LANE_COUNT},
    EPSILON,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct VectorizedSimd;

/// Lower-triangle check with lane type `V`.
///
/// Groups of four columns start at `j = 0, 4, 8, ...` while `j < i`; a group
/// may reach past the diagonal, which only re-compares mirrored pairs. Columns
/// that cannot fill a whole group before the row end (`n < 4`) go through the
/// scalar comparison, as does the diagonal element when no group covered it.
#[inline(always)]
fn check_lower_triangle<V: SimdVec>(data: &[f64], n: usize) -> bool {
    let epsilon = V::splat(EPSILON);
    let mut check = true;

    for i in 0..n {
        let row = &data[i * n..(i + 1) * n];
        let mut j = 0;

        while j < i && j + LANE_COUNT <= n {
            let row_lanes = unsafe { V::load(row[j..j + LANE_COUNT].as_ptr()) };
            let col_lanes = V::from_array([
                data[j * n + i],
                data[(j + 1) * n + i],
                data[(j + 2) * n + i],
                data[(j + 3) * n + i],
            ]);

            check &= row_lanes.abs_diff(col_lanes).le_mask(epsilon) == ALL_LANES;
            j += LANE_COUNT;
        }

        while j <= i {
            check &= within_tolerance(row[j], data[j * n + i]);
            j += 1;
        }
    }

    check
}

#[cfg(avx2)]
#[target_feature(enable = "avx,avx2")]
unsafe fn check_lower_triangle_avx2(data: &[f64], n: usize) -> bool {
    check_lower_triangle::<F64x4>(data, n)
}

/// Runs the check with an explicit lane backend.
pub fn check_symmetric_with<V: SimdVec>(m: &Matrix) -> bool {
    check_lower_triangle::<V>(m.as_slice(), m.n())
}

impl Kernel for VectorizedSimd {
    fn variant(&self) -> Variant {
        Variant::Vectorized
    }

    fn check_symmetric(&self, m: &Matrix) -> bool {
        #[cfg(avx2)]
        {
            // build.rs only sets `avx2` after finding the feature on this machine
            unsafe { check_lower_triangle_avx2(m.as_slice(), m.n()) }
        }

        #[cfg(not(avx2))]
        {
            check_lower_triangle::<F64x4>(m.as_slice(), m.n())
        }
    }

    fn transpose(&self, m: &Matrix, t: &mut Matrix) {
        assert_same_shape(m, t);
        transpose_unblocked(m.as_slice(), t.as_mut_slice(), m.n());
    }

    fn comparisons(&self, n: usize) -> u64 {
        (0..n).map(|i| compared_in_row(i, n) as u64).sum()
    }
}

/// Element pairs compared for row `i`, counting every lane of every group and
/// the diagonal.
fn compared_in_row(i: usize, n: usize) -> usize {
    let groups = if i == 0 || n < LANE_COUNT {
        0
    } else {
        (i - 1).min(n - LANE_COUNT) / LANE_COUNT + 1
    };
    let vector_columns = groups * LANE_COUNT;

    vector_columns.max(i + 1)
}
