//! NEON 4-lane f64 vector built from two `float64x2_t` halves.

use std::arch::aarch64::*;

use crate::simd::traits::SimdVec;

#[derive(Copy, Clone, Debug)]
pub struct F64x4 {
    /// Lanes 0–1 and 2–3.
    pub elements: [float64x2_t; 2],
}

impl SimdVec for F64x4 {
    /// # Safety
    ///
    /// Pointer must point to at least 4 valid f64 values.
    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: [vld1q_f64(ptr), vld1q_f64(ptr.add(2))],
        }
    }

    #[inline(always)]
    fn from_array(values: [f64; 4]) -> Self {
        unsafe { Self::load(values.as_ptr()) }
    }

    #[inline(always)]
    fn splat(value: f64) -> Self {
        unsafe {
            let half = vdupq_n_f64(value);
            Self {
                elements: [half, half],
            }
        }
    }

    #[inline(always)]
    fn abs_diff(self, other: Self) -> Self {
        unsafe {
            Self {
                elements: [
                    vabsq_f64(vsubq_f64(self.elements[0], other.elements[0])),
                    vabsq_f64(vsubq_f64(self.elements[1], other.elements[1])),
                ],
            }
        }
    }

    #[inline(always)]
    fn le_mask(self, bound: Self) -> u32 {
        unsafe {
            let lo = vcleq_f64(self.elements[0], bound.elements[0]);
            let hi = vcleq_f64(self.elements[1], bound.elements[1]);

            (vgetq_lane_u64::<0>(lo) & 1) as u32
                | ((vgetq_lane_u64::<1>(lo) & 1) as u32) << 1
                | ((vgetq_lane_u64::<0>(hi) & 1) as u32) << 2
                | ((vgetq_lane_u64::<1>(hi) & 1) as u32) << 3
        }
    }

    #[inline(always)]
    fn to_array(self) -> [f64; 4] {
        let mut out = [0.0; 4];
        unsafe {
            vst1q_f64(out.as_mut_ptr(), self.elements[0]);
            vst1q_f64(out.as_mut_ptr().add(2), self.elements[1]);
        }
        out
    }
}
