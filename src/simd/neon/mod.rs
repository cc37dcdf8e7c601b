//! ARM NEON implementation of the 4-lane `f64` vector.
//!
//! NEON registers are 128 bits wide (2 × f64), so one logical vector is a pair
//! of `float64x2_t`. Compiled only for aarch64 targets.
//!
//! # Available Types
//!
//! - [`f64x4::F64x4`]: two 128-bit registers holding 4 double-precision values

pub mod f64x4;
