//! Console report of a benchmark run.

use chrono::{DateTime, Local};

use crate::{
    kernels::Variant,
    measurement::{ParallelMeasurement, SequentialMeasurement},
    simd::BACKEND,
};

/// Run banner: variant, start time, SIMD backend, dimension and repetitions.
pub fn header(variant: Variant, n: usize, repetitions: usize, started: DateTime<Local>) -> String {
    format!(
        "symtrans {variant} started {}\nSIMD backend: {BACKEND}\nMatrix dimension: {n}\nRepetitions: {repetitions}\n",
        started.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Mean times, GFLOPS and GB/s of a single-threaded variant.
pub fn sequential(m: &SequentialMeasurement) -> String {
    format!(
        "Sequential execution: symmetry: {}\ncheckSym:\t{:.9} seconds\t{:10.4} GFLOPS\nmatTranspose:\t{:.9} seconds\t{:10.4} GB/s\n",
        m.symmetric,
        m.check_time.as_secs_f64(),
        m.flops * 1e-9,
        m.transpose_time.as_secs_f64(),
        m.bandwidth * 1e-9
    )
}

/// Baseline times and the legend and header of the thread table.
pub fn parallel_baseline(m: &ParallelMeasurement) -> String {
    format!(
        "Sequential execution: symmetry: {}\ncheckSymOMP:\t{:.9} seconds\nmatTransposeOMP:{:.9} seconds\n\n\
         Results: threads (T), symmetry (S), symmetry speedup (SS), symmetry efficiency (SE), \
         transpose speedup (TS), transpose efficiency (TE), transpose bandwidth in GB/s (TB)\n\n\
         \t|\tT\t|\tS\t|\tSS\t|\tSE\t|\tTS\t|\tTE\t|\tTB\t|",
        m.symmetric,
        m.check_time.as_secs_f64(),
        m.transpose_time.as_secs_f64()
    )
}

/// One row of the thread table.
pub fn parallel_row(m: &ParallelMeasurement) -> String {
    format!(
        "\t| {}\t\t| {}\t\t| {:8.4}\t| {:8.4}\t| {:8.4}\t| {:8.4}\t| {:8.4}\t|",
        m.threads,
        u8::from(m.symmetric),
        m.symmetry_speedup,
        m.symmetry_efficiency,
        m.transpose_speedup,
        m.transpose_efficiency,
        m.bandwidth * 1e-9
    )
}
