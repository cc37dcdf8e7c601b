//! AVX2 implementation of the 4-lane `f64` vector.
//!
//! Compiled only when `build.rs` finds AVX2 on an x86_64 build machine. The
//! intrinsics are inlined into kernels marked `#[target_feature(enable = "avx2")]`.
//!
//! # Available Types
//!
//! - [`f64x4::F64x4`]: 256-bit vector containing 4 packed double-precision values

pub mod f64x4;
