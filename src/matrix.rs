//! Dense square `f64` matrices in row-major order.
//!
//! Buffers are obtained with [`Vec::try_reserve_exact`] so an oversized request
//! surfaces as an [`AllocationError`](crate::error::SymtransError::AllocationError)
//! before any kernel runs, instead of aborting the process.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{allocation_error, Result};

/// Upper bound (exclusive) of the values produced by [`Matrix::random`].
pub const RANDOM_VALUE_RANGE: f64 = 100.0;

/// An owned `n × n` matrix stored row-major in a single buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

/// Matrix dimension for a size exponent: `2^dim`.
pub fn dimension(dim: u32) -> Result<usize> {
    1usize.checked_shl(dim).ok_or_else(|| {
        allocation_error(
            usize::MAX,
            format!("2^{dim} does not fit in the address space"),
        )
    })
}

fn alloc_buffer(n: usize) -> Result<Vec<f64>> {
    let len = n.checked_mul(n).ok_or_else(|| {
        allocation_error(usize::MAX, format!("{n}x{n} elements overflow usize"))
    })?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|e| allocation_error(len, e.to_string()))?;
    data.resize(len, 0.0);

    Ok(data)
}

impl Matrix {
    /// Allocates an `n × n` matrix filled with zeros.
    pub fn zeros(n: usize) -> Result<Self> {
        Ok(Self {
            n,
            data: alloc_buffer(n)?,
        })
    }

    /// Allocates an `n × n` matrix whose entry `(i, j)` is `f(i, j)`.
    pub fn from_fn<F>(n: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut matrix = Self::zeros(n)?;
        for (idx, value) in matrix.data.iter_mut().enumerate() {
            *value = f(idx / n, idx % n);
        }
        Ok(matrix)
    }

    /// The `n × n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        Self::from_fn(n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Uniformly random entries in `[0, RANDOM_VALUE_RANGE)`.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self> {
        let mut matrix = Self::zeros(n)?;
        for value in matrix.data.iter_mut() {
            *value = rng.random_range(0.0..RANDOM_VALUE_RANGE);
        }
        Ok(matrix)
    }

    /// Random matrix mirrored across the diagonal, so `M[i][j] == M[j][i]` exactly.
    pub fn random_symmetric<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self> {
        let mut matrix = Self::random(n, rng)?;
        for i in 0..n {
            for j in 0..i {
                matrix.data[j * n + i] = matrix.data[i * n + j];
            }
        }
        Ok(matrix)
    }

    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    /// Size of the buffer in bytes.
    pub fn bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f64>()
    }
}

/// Allocates the input matrix and its transpose target for a run.
///
/// The input is filled with random values from `seed`, or from OS entropy when
/// no seed is given. The target is allocated before the input is drawn.
pub fn allocate_pair(n: usize, seed: Option<u64>) -> Result<(Matrix, Matrix)> {
    let target = Matrix::zeros(n)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let input = Matrix::random(n, &mut rng)?;

    log::debug!(
        "allocated two {n}x{n} matrices ({} bytes each)",
        input.bytes()
    );

    Ok((input, target))
}
