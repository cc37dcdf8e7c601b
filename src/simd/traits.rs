/// Four packed `f64` lanes with the operations the symmetry kernels need.
///
/// Every backend must produce exactly the lane results of [`super::scalar::F64x4`]:
/// `abs_diff` is `(a - b).abs()` and `le_mask` sets bit `k` iff lane `k` is
/// ordered and `<=` the bound, so NaN lanes never pass.
pub trait SimdVec: Copy {
    /// Loads four contiguous values.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least four readable `f64` values.
    unsafe fn load(ptr: *const f64) -> Self;

    /// Builds a vector from four values, lane `k` holding `values[k]`.
    fn from_array(values: [f64; 4]) -> Self;

    fn splat(value: f64) -> Self;

    fn abs_diff(self, other: Self) -> Self;

    /// Bit `k` of the result is set iff lane `k` of `self` is `<=` lane `k` of `bound`.
    fn le_mask(self, bound: Self) -> u32;

    fn to_array(self) -> [f64; 4];
}

/// Mask returned by [`SimdVec::le_mask`] when all four lanes pass.
pub const ALL_LANES: u32 = 0b1111;
