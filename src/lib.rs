//! Benchmarks for checking symmetry of, and transposing, a dense square `f64`
//! matrix.
//!
//! Each strategy in [`kernels`] implements the same [`kernels::Kernel`]
//! contract. The [`harness`] times them, [`validate`] re-checks the output
//! independently, and measurements go to a [`sink::ResultSink`].

pub mod cli;
pub mod error;
pub mod harness;
pub mod kernels;
pub mod matrix;
pub mod measurement;
pub mod report;
pub mod simd;
pub mod sink;
pub mod summary;
pub mod validate;

/// Tile edge of the blocked variants.
pub const BLOCK_SIZE: usize = 32;

/// Two values are equal iff `|a - b| <= EPSILON`.
pub const EPSILON: f64 = 1e-6;

/// Repetitions per configuration when none (or a non-positive count) is given.
pub const DEFAULT_REPETITIONS: usize = 500;

/// Thread counts visited after the 1-thread baseline when sweeping.
pub const SWEEP_THREADS: [usize; 6] = [2, 4, 8, 16, 32, 64];
