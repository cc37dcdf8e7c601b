//! Hardware-specific vector operations behind a portable interface.
//!
//! `build.rs` selects exactly one backend per build through the `avx2`, `neon`
//! or `fallback` cfg flags, and [`F64x4`] names it. All backends give the same
//! lane results as [`scalar::F64x4`]; they differ only in speed.

#[cfg(avx2)]
pub mod avx2;

#[cfg(neon)]
pub mod neon;

pub mod prefetch;
pub mod scalar;
pub mod traits;

pub use prefetch::prefetch_nta;
pub use traits::{SimdVec, ALL_LANES};

#[cfg(avx2)]
pub use avx2::f64x4::F64x4;

#[cfg(neon)]
pub use neon::f64x4::F64x4;

#[cfg(fallback)]
pub use scalar::F64x4;

/// Number of f64 lanes processed per vector.
pub const LANE_COUNT: usize = 4;

/// Name of the backend compiled into this build.
pub const BACKEND: &str = if cfg!(avx2) {
    "avx2"
} else if cfg!(neon) {
    "neon"
} else {
    "scalar"
};
