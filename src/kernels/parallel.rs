//! Thread-parallel blocked traversal on a dedicated Rayon pool.
//!
//! # Symmetry check
//!
//! The tile pairs `(rb, cb)` with `cb <= rb` form a triangle of
//! `T = g(g + 1) / 2` entries. It is flattened to `k ∈ [0, T)`, cut into one
//! contiguous range per worker, and each `k` is mapped back with the
//! triangular-number inverse
//!
//! ```text
//! rb = ⌊(√(1 + 8k) − 1) / 2⌋
//! cb = k − rb(rb + 1) / 2
//! ```
//!
//! Workers keep a local flag and the flags are combined with logical AND, so
//! the result does not depend on scheduling order.
//!
//! # Transpose
//!
//! The output is split into tile rows (`size` matrix rows each). A tile row of
//! the output is written by exactly one task, which pulls every source tile of
//! the matching tile column. Writes are disjoint `&mut` chunks, so the only
//! synchronization is the join at the end of the parallel region.

use num::integer::Roots;
use rayon::{
    iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
    ThreadPool, ThreadPoolBuilder,
};

use super::{
    assert_same_shape,
    blocked::{block_offset, compare_block},
    blocked_comparisons, triangle_blocks, Kernel, Variant,
};
use crate::{
    error::{thread_pool_error, Result},
    matrix::Matrix,
    BLOCK_SIZE,
};

/// Blocked kernels running on a pool of exactly `threads` workers.
///
/// The pool lives as long as the kernel, so one instance serves every
/// repetition of a single thread-count configuration.
pub struct ParallelBlocked {
    threads: usize,
    pool: ThreadPool,
}

impl std::fmt::Debug for ParallelBlocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelBlocked")
            .field("threads", &self.threads)
            .finish()
    }
}

/// Tile edge used with `threads` workers: `min(BLOCK_SIZE, n / threads)`.
///
/// Never below 1, and rounded down to a power of two so that it divides any
/// power-of-two `n`.
pub fn parallel_block_size(n: usize, threads: usize) -> usize {
    let per_thread = (n / threads.max(1)).max(1);
    let size = BLOCK_SIZE.min(per_thread);

    1 << (usize::BITS - 1 - size.leading_zeros())
}

/// Maps a flattened lower-triangle index back to its `(rb, cb)` tile pair.
#[inline(always)]
pub fn triangle_coords(k: usize) -> (usize, usize) {
    let rb = ((8 * k + 1).sqrt() - 1) / 2;
    let cb = k - rb * (rb + 1) / 2;
    (rb, cb)
}

impl ParallelBlocked {
    pub fn new(threads: usize) -> Result<Self> {
        let threads = threads.max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("symtrans-worker-{index}"))
            .build()
            .map_err(|e| thread_pool_error(threads, e.to_string()))?;

        log::debug!("built worker pool with {threads} threads");

        Ok(Self { threads, pool })
    }

    pub fn block_size(&self, n: usize) -> usize {
        parallel_block_size(n, self.threads)
    }
}

impl Kernel for ParallelBlocked {
    fn variant(&self) -> Variant {
        Variant::Parallel
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn check_symmetric(&self, m: &Matrix) -> bool {
        let n = m.n();
        if n == 0 {
            return true;
        }

        let data = m.as_slice();
        let size = self.block_size(n);
        let total = triangle_blocks(n / size);
        let workers = self.threads;
        let chunk = total.div_ceil(workers).max(1);

        self.pool.install(|| {
            (0..workers)
                .into_par_iter()
                .map(|worker| {
                    let start = (worker * chunk).min(total);
                    let end = (start + chunk).min(total);

                    let mut check = true;
                    for k in start..end {
                        let (rb, cb) = triangle_coords(k);
                        check &= compare_block(data, n, size, rb, cb);
                    }
                    check
                })
                .reduce(|| true, |a, b| a & b)
        })
    }

    fn transpose(&self, m: &Matrix, t: &mut Matrix) {
        assert_same_shape(m, t);

        let n = m.n();
        if n == 0 {
            return;
        }

        let size = self.block_size(n);
        let grid = n / size;
        let src = m.as_slice();
        let dst = t.as_mut_slice();

        self.pool.install(|| {
            dst.par_chunks_mut(size * n)
                .enumerate()
                .for_each(|(cb, out_rows)| {
                    // tile (rb, cb) of the source lands in tile (cb, rb) of the output
                    for rb in 0..grid {
                        let source = block_offset(n, size, rb, cb);
                        let column = rb * size;

                        for i in 0..size {
                            for j in 0..size {
                                out_rows[i * n + column + j] = src[source + j * n + i];
                            }
                        }
                    }
                });
        });
    }

    fn comparisons(&self, n: usize) -> u64 {
        if n == 0 {
            return 0;
        }
        blocked_comparisons(n, self.block_size(n))
    }
}
