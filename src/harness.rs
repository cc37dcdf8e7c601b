//! Timing loop and derived metrics.
//!
//! Every configuration point runs `repetitions` back-to-back calls of one
//! operation between two [`Instant`] readings; the mean is the total divided by
//! the repetition count. Inputs and results pass through [`black_box`] so the
//! optimizer can neither hoist a call out of the loop nor drop it.
//!
//! The parallel variant is always measured at one thread first. That baseline
//! is recorded with speedup 1 and efficiency 100, and every later thread count
//! is compared against it.

use std::{
    hint::black_box,
    time::{Duration, Instant},
};

use crate::{
    error::{invocation_error, Result},
    kernels::{Kernel, ParallelBlocked, Variant},
    matrix::{dimension, Matrix},
    measurement::{Measurement, ParallelMeasurement, SequentialMeasurement},
    sink::ResultSink,
    DEFAULT_REPETITIONS, SWEEP_THREADS,
};

/// Thread counts the parallel variant is measured at after the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadSelection {
    /// Visit every count in [`SWEEP_THREADS`].
    #[default]
    Sweep,
    /// Measure a single count.
    Fixed(usize),
}

impl ThreadSelection {
    /// Zero or negative means sweep.
    pub fn from_arg(threads: i64) -> Self {
        if threads > 0 {
            ThreadSelection::Fixed(threads as usize)
        } else {
            ThreadSelection::Sweep
        }
    }

    /// Counts measured after the 1-thread baseline.
    pub fn counts(self) -> Vec<usize> {
        match self {
            ThreadSelection::Sweep => SWEEP_THREADS.to_vec(),
            ThreadSelection::Fixed(1) => Vec::new(),
            ThreadSelection::Fixed(threads) => vec![threads],
        }
    }
}

/// Runtime configuration of one benchmark invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Size exponent, `n = 2^dim`.
    pub dim: u32,
    pub repetitions: usize,
    pub threads: ThreadSelection,
    /// Seed for the input matrix; OS entropy when `None`.
    pub seed: Option<u64>,
}

impl BenchConfig {
    pub fn new(dim: u32) -> Self {
        Self {
            dim,
            repetitions: DEFAULT_REPETITIONS,
            threads: ThreadSelection::Sweep,
            seed: None,
        }
    }

    pub fn with_repetitions(mut self, repetitions: i64) -> Self {
        self.repetitions = normalize_repetitions(repetitions);
        self
    }

    pub fn with_threads(mut self, threads: ThreadSelection) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Matrix dimension `2^dim`.
    pub fn n(&self) -> Result<usize> {
        dimension(self.dim)
    }
}

/// Non-positive repetition counts fall back to [`DEFAULT_REPETITIONS`].
pub fn normalize_repetitions(repetitions: i64) -> usize {
    if repetitions > 0 {
        repetitions as usize
    } else {
        DEFAULT_REPETITIONS
    }
}

/// Mean times of one configuration point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Result of the last symmetry check.
    pub symmetric: bool,
    pub check_time: Duration,
    pub transpose_time: Duration,
}

fn mean(total: Duration, repetitions: usize) -> Duration {
    let total = total.max(Duration::from_nanos(1));
    Duration::from_secs_f64(total.as_secs_f64() / repetitions.max(1) as f64)
        .max(Duration::from_nanos(1))
}

/// Times `repetitions` symmetry checks, then `repetitions` transposes.
pub fn time_kernel(
    kernel: &dyn Kernel,
    m: &Matrix,
    t: &mut Matrix,
    repetitions: usize,
) -> Timing {
    let mut symmetric = false;

    let start = Instant::now();
    for _ in 0..repetitions {
        symmetric = black_box(kernel.check_symmetric(black_box(m)));
    }
    let check_total = start.elapsed();

    let start = Instant::now();
    for _ in 0..repetitions {
        kernel.transpose(black_box(m), black_box(&mut *t));
    }
    let transpose_total = start.elapsed();

    Timing {
        symmetric,
        check_time: mean(check_total, repetitions),
        transpose_time: mean(transpose_total, repetitions),
    }
}

/// Comparisons per second.
pub fn flops(comparisons: u64, check_time: Duration) -> f64 {
    comparisons as f64 / check_time.as_secs_f64()
}

/// Bytes per second of a transpose: every element is read once and written once.
pub fn bandwidth(n: usize, transpose_time: Duration) -> f64 {
    let bytes = 2.0 * (n as f64) * (n as f64) * std::mem::size_of::<f64>() as f64;
    bytes / transpose_time.as_secs_f64()
}

/// `t1 / tp`.
pub fn speedup(baseline: Duration, time: Duration) -> f64 {
    baseline.as_secs_f64() / time.as_secs_f64()
}

/// Speedup as a percentage of ideal linear scaling.
pub fn efficiency(speedup: f64, threads: usize) -> f64 {
    speedup / threads.max(1) as f64 * 100.0
}

/// Drives kernels over one input matrix and hands every measurement to a sink.
#[derive(Debug)]
pub struct Harness<S> {
    config: BenchConfig,
    sink: S,
}

impl<S: ResultSink> Harness<S> {
    pub fn new(config: BenchConfig, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn emit(&mut self, measurement: Measurement) {
        // a lost row never aborts the run
        if let Err(e) = self.sink.record(&measurement) {
            log::warn!("{e}");
            eprintln!("Error in saving results! {e}");
        }
    }

    /// Measures a single-threaded variant.
    pub fn run_sequential(
        &mut self,
        variant: Variant,
        m: &Matrix,
        t: &mut Matrix,
    ) -> Result<SequentialMeasurement> {
        if variant.is_parallel() {
            return Err(invocation_error(format!(
                "{variant} is measured with run_parallel"
            )));
        }

        let kernel = variant.kernel(1)?;
        let n = m.n();
        let timing = time_kernel(kernel.as_ref(), m, t, self.config.repetitions);

        let measurement = SequentialMeasurement {
            variant,
            n,
            symmetric: timing.symmetric,
            check_time: timing.check_time,
            transpose_time: timing.transpose_time,
            flops: flops(kernel.comparisons(n), timing.check_time),
            bandwidth: bandwidth(n, timing.transpose_time),
        };

        self.emit(Measurement::Sequential(measurement.clone()));

        Ok(measurement)
    }

    /// Measures the parallel variant: the 1-thread baseline, then every
    /// selected thread count. `on_point` sees each configuration as soon as it
    /// is recorded.
    pub fn run_parallel<F>(&mut self, m: &Matrix, t: &mut Matrix, mut on_point: F) -> Result<()>
    where
        F: FnMut(&ParallelMeasurement),
    {
        let n = m.n();
        let repetitions = self.config.repetitions;

        let baseline = {
            let kernel = ParallelBlocked::new(1)?;
            log::info!("n = {n}: baseline with 1 thread");
            time_kernel(&kernel, m, t, repetitions)
        };

        let point = ParallelMeasurement {
            variant: Variant::Parallel,
            n,
            threads: 1,
            symmetric: baseline.symmetric,
            check_time: baseline.check_time,
            transpose_time: baseline.transpose_time,
            symmetry_speedup: 1.0,
            symmetry_efficiency: 100.0,
            transpose_speedup: 1.0,
            transpose_efficiency: 100.0,
            bandwidth: bandwidth(n, baseline.transpose_time),
        };
        on_point(&point);
        self.emit(Measurement::Parallel(point));

        for threads in self.config.threads.counts() {
            // the pool is dropped at the end of each configuration
            let kernel = ParallelBlocked::new(threads)?;
            log::info!(
                "n = {n}: {threads} threads, block size {}",
                kernel.block_size(n)
            );
            let timing = time_kernel(&kernel, m, t, repetitions);

            let symmetry_speedup = speedup(baseline.check_time, timing.check_time);
            let transpose_speedup = speedup(baseline.transpose_time, timing.transpose_time);

            let point = ParallelMeasurement {
                variant: Variant::Parallel,
                n,
                threads,
                symmetric: timing.symmetric,
                check_time: timing.check_time,
                transpose_time: timing.transpose_time,
                symmetry_speedup,
                symmetry_efficiency: efficiency(symmetry_speedup, threads),
                transpose_speedup,
                transpose_efficiency: efficiency(transpose_speedup, threads),
                bandwidth: bandwidth(n, timing.transpose_time),
            };
            on_point(&point);
            self.emit(Measurement::Parallel(point));
        }

        Ok(())
    }
}
