//! Portable 4-lane `f64` vector.
//!
//! Used when the build machine offers neither AVX2 nor NEON, and as the
//! reference the hardware backends are tested against.

use super::traits::SimdVec;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct F64x4 {
    pub elements: [f64; 4],
}

impl SimdVec for F64x4 {
    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        Self {
            elements: [*ptr, *ptr.add(1), *ptr.add(2), *ptr.add(3)],
        }
    }

    #[inline(always)]
    fn from_array(values: [f64; 4]) -> Self {
        Self { elements: values }
    }

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: [value; 4],
        }
    }

    #[inline(always)]
    fn abs_diff(self, other: Self) -> Self {
        let mut elements = [0.0; 4];
        for (lane, out) in elements.iter_mut().enumerate() {
            *out = (self.elements[lane] - other.elements[lane]).abs();
        }
        Self { elements }
    }

    #[inline(always)]
    fn le_mask(self, bound: Self) -> u32 {
        self.elements
            .iter()
            .zip(bound.elements.iter())
            .enumerate()
            .fold(0, |mask, (lane, (a, b))| {
                if a <= b {
                    mask | (1 << lane)
                } else {
                    mask
                }
            })
    }

    #[inline(always)]
    fn to_array(self) -> [f64; 4] {
        self.elements
    }
}
