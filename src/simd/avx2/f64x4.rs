//! AVX2 4-lane f64 SIMD vector.
//!
//! Wraps `__m256d`. Comparisons use the ordered, non-signalling `_CMP_LE_OQ`
//! predicate so NaN lanes fail exactly like the scalar `<=`.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::SimdVec;

/// Number of f64 elements in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// AVX2 SIMD vector containing 4 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x4 {
    pub elements: __m256d,
}

impl SimdVec for F64x4 {
    /// Loads 4 elements from unaligned memory with `_mm256_loadu_pd`.
    ///
    /// # Safety
    ///
    /// Pointer must point to at least 4 valid f64 values.
    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: _mm256_loadu_pd(ptr),
        }
    }

    /// `_mm256_set_pd` takes lanes highest first.
    #[inline(always)]
    fn from_array(values: [f64; 4]) -> Self {
        Self {
            elements: unsafe { _mm256_set_pd(values[3], values[2], values[1], values[0]) },
        }
    }

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { _mm256_set1_pd(value) },
        }
    }

    /// Subtracts, then clears the sign bit of every lane.
    #[inline(always)]
    fn abs_diff(self, other: Self) -> Self {
        unsafe {
            let diff = _mm256_sub_pd(self.elements, other.elements);
            Self {
                elements: _mm256_andnot_pd(_mm256_set1_pd(-0.0), diff),
            }
        }
    }

    #[inline(always)]
    fn le_mask(self, bound: Self) -> u32 {
        unsafe {
            let cmp = _mm256_cmp_pd::<_CMP_LE_OQ>(self.elements, bound.elements);
            _mm256_movemask_pd(cmp) as u32
        }
    }

    #[inline(always)]
    fn to_array(self) -> [f64; 4] {
        let mut out = [0.0; LANE_COUNT];
        unsafe { _mm256_storeu_pd(out.as_mut_ptr(), self.elements) };
        out
    }
}
