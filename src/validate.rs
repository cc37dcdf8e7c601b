//! Ground-truth checks, independent of any kernel.
//!
//! The matrices are viewed as `ndarray` arrays and compared against the
//! array's own transposed view, so no tiling or lane logic from the kernels is
//! involved.

use std::fmt;

use ndarray::{ArrayView2, Zip};

use crate::{kernels::within_tolerance, matrix::Matrix};

/// Outcome of re-checking a run's input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    /// `true` iff the input is symmetric within `EPSILON`.
    pub symmetric: bool,
    /// `true` iff the output is bit-for-bit the transpose of the input.
    pub transposed: bool,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tested results: symmetry {} and transposed {}.",
            self.symmetric,
            if self.transposed {
                "correct"
            } else {
                "incorrect"
            }
        )
    }
}

fn view(m: &Matrix) -> Option<ArrayView2<'_, f64>> {
    ArrayView2::from_shape((m.n(), m.n()), m.as_slice()).ok()
}

/// `true` iff `m` is symmetric within `EPSILON`.
pub fn is_symmetric(m: &Matrix) -> bool {
    match view(m) {
        Some(v) => Zip::from(&v).and(&v.t()).all(|&a, &b| within_tolerance(a, b)),
        None => false,
    }
}

/// `true` iff `t` holds exactly the transpose of `m`.
pub fn is_transpose_of(m: &Matrix, t: &Matrix) -> bool {
    if m.n() != t.n() {
        return false;
    }

    match (view(m), view(t)) {
        (Some(mv), Some(tv)) => Zip::from(&tv)
            .and(&mv.t())
            .all(|&a, &b| a.to_bits() == b.to_bits()),
        _ => false,
    }
}

/// Re-checks symmetry of `m` and that `t` is its transpose.
pub fn validate(m: &Matrix, t: &Matrix) -> Validation {
    Validation {
        symmetric: is_symmetric(m),
        transposed: is_transpose_of(m, t),
    }
}
