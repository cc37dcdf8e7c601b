//! Benchmark outcomes and their delimited row format.

use std::time::Duration;

use crate::kernels::Variant;

/// The artifact a measurement is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Single-threaded variants.
    Sequential,
    /// Thread-count configurations of the parallel variant.
    Parallel,
}

impl Artifact {
    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Sequential => "results_ilp.csv",
            Artifact::Parallel => "results_omp.csv",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Artifact::Sequential => "code,n,flops,bandwidth",
            Artifact::Parallel => {
                "code,n,threads,speedup1,efficiency1,speedup2,efficiency2,bandwidth"
            }
        }
    }
}

/// One timed configuration of a single-threaded variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialMeasurement {
    pub variant: Variant,
    pub n: usize,
    /// Result of the last symmetry check.
    pub symmetric: bool,
    /// Mean time of one symmetry check.
    pub check_time: Duration,
    /// Mean time of one transpose.
    pub transpose_time: Duration,
    /// Comparisons per second.
    pub flops: f64,
    /// Bytes moved per second by the transpose.
    pub bandwidth: f64,
}

/// One thread-count configuration of the parallel variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelMeasurement {
    pub variant: Variant,
    pub n: usize,
    pub threads: usize,
    pub symmetric: bool,
    pub check_time: Duration,
    pub transpose_time: Duration,
    pub symmetry_speedup: f64,
    /// Percent of ideal linear scaling.
    pub symmetry_efficiency: f64,
    pub transpose_speedup: f64,
    /// Percent of ideal linear scaling.
    pub transpose_efficiency: f64,
    pub bandwidth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Sequential(SequentialMeasurement),
    Parallel(ParallelMeasurement),
}

impl Measurement {
    pub fn artifact(&self) -> Artifact {
        match self {
            Measurement::Sequential(_) => Artifact::Sequential,
            Measurement::Parallel(_) => Artifact::Parallel,
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Measurement::Sequential(m) => m.variant,
            Measurement::Parallel(m) => m.variant,
        }
    }

    /// Comma-separated row, floating values with 9 decimals.
    pub fn csv_row(&self) -> String {
        match self {
            Measurement::Sequential(m) => format!(
                "{},{},{:.9},{:.9}",
                m.variant.code(),
                m.n,
                m.flops,
                m.bandwidth
            ),
            Measurement::Parallel(m) => format!(
                "{},{},{},{:.9},{:.9},{:.9},{:.9},{:.9}",
                m.variant.code(),
                m.n,
                m.threads,
                m.symmetry_speedup,
                m.symmetry_efficiency,
                m.transpose_speedup,
                m.transpose_efficiency,
                m.bandwidth
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_row() {
        let m = Measurement::Sequential(SequentialMeasurement {
            variant: Variant::Blocked,
            n: 1024,
            symmetric: false,
            check_time: Duration::from_micros(10),
            transpose_time: Duration::from_micros(20),
            flops: 1.5e9,
            bandwidth: 2.0e10,
        });
        assert_eq!(m.artifact(), Artifact::Sequential);
        assert_eq!(
            m.csv_row(),
            "B,1024,1500000000.000000000,20000000000.000000000"
        );
    }

    #[test]
    fn test_parallel_row_matches_header_width() {
        let m = Measurement::Parallel(ParallelMeasurement {
            variant: Variant::Parallel,
            n: 256,
            threads: 4,
            symmetric: false,
            check_time: Duration::from_micros(5),
            transpose_time: Duration::from_micros(6),
            symmetry_speedup: 3.5,
            symmetry_efficiency: 87.5,
            transpose_speedup: 2.0,
            transpose_efficiency: 50.0,
            bandwidth: 1.0,
        });
        let row = m.csv_row();
        assert!(row.starts_with("OBT,256,4,3.500000000,87.500000000"));
        assert_eq!(
            row.split(',').count(),
            Artifact::Parallel.header().split(',').count()
        );
    }
}
