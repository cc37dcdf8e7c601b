use std::fs;

use symtrans::harness::{BenchConfig, Harness, ThreadSelection};
use symtrans::kernels::Variant;
use symtrans::matrix::allocate_pair;
use symtrans::measurement::{Artifact, Measurement};
use symtrans::sink::{CsvSink, MemorySink};
use symtrans::validate::validate;
use symtrans::SWEEP_THREADS;

#[test]
fn test_metrics_are_finite_and_positive() {
    for dim in 1..=6 {
        let config = BenchConfig::new(dim).with_repetitions(2).with_seed(Some(17));
        let n = config.n().unwrap();
        let (m, mut t) = allocate_pair(n, config.seed).unwrap();
        let mut harness = Harness::new(config, MemorySink::new());

        for variant in Variant::ALL.iter().filter(|v| !v.is_parallel()) {
            let measurement = harness.run_sequential(*variant, &m, &mut t).unwrap();
            assert!(
                measurement.flops.is_finite() && measurement.flops > 0.0,
                "{variant} n = {n}: flops {}",
                measurement.flops
            );
            assert!(
                measurement.bandwidth.is_finite() && measurement.bandwidth > 0.0,
                "{variant} n = {n}: bandwidth {}",
                measurement.bandwidth
            );
        }

        harness
            .run_parallel(&m, &mut t, |p| {
                assert!(p.bandwidth.is_finite() && p.bandwidth > 0.0);
                assert!(p.symmetry_speedup.is_finite() && p.symmetry_speedup > 0.0);
                assert!(p.transpose_efficiency.is_finite() && p.transpose_efficiency > 0.0);
            })
            .unwrap();

        assert!(validate(&m, &t).transposed);
    }
}

#[test]
fn test_parallel_sweep_records_baseline_and_every_count() {
    let config = BenchConfig::new(4)
        .with_repetitions(1)
        .with_threads(ThreadSelection::Sweep)
        .with_seed(Some(3));
    let (m, mut t) = allocate_pair(config.n().unwrap(), config.seed).unwrap();
    let mut harness = Harness::new(config, MemorySink::new());

    harness.run_parallel(&m, &mut t, |_| {}).unwrap();

    let threads: Vec<usize> = harness
        .into_sink()
        .measurements
        .iter()
        .map(|m| match m {
            Measurement::Parallel(p) => p.threads,
            Measurement::Sequential(_) => panic!("sequential row from the parallel run"),
        })
        .collect();

    let mut expected = vec![1];
    expected.extend(SWEEP_THREADS);
    assert_eq!(threads, expected);
}

#[test]
fn test_explicit_single_thread_records_only_baseline() {
    let config = BenchConfig::new(3)
        .with_repetitions(1)
        .with_threads(ThreadSelection::Fixed(1));
    let (m, mut t) = allocate_pair(8, Some(1)).unwrap();
    let mut sink = MemorySink::new();

    Harness::new(config, &mut sink)
        .run_parallel(&m, &mut t, |_| {})
        .unwrap();

    assert_eq!(sink.rows(Artifact::Parallel).len(), 1);
}

#[test]
fn test_csv_artifacts_accumulate_across_runs() {
    let dir = tempfile::tempdir().unwrap();

    for dim in [2, 3] {
        let config = BenchConfig::new(dim)
            .with_repetitions(1)
            .with_threads(ThreadSelection::Fixed(2));
        let (m, mut t) = allocate_pair(config.n().unwrap(), Some(8)).unwrap();
        let mut harness = Harness::new(config, CsvSink::new(dir.path()));

        harness.run_sequential(Variant::Vectorized, &m, &mut t).unwrap();
        harness.run_parallel(&m, &mut t, |_| {}).unwrap();
    }

    let ilp = fs::read_to_string(dir.path().join("results_ilp.csv")).unwrap();
    let ilp: Vec<&str> = ilp.lines().collect();
    assert_eq!(ilp[0], "code,n,flops,bandwidth");
    assert_eq!(ilp.len(), 3);
    assert!(ilp[1].starts_with("V,4,"));
    assert!(ilp[2].starts_with("V,8,"));

    let omp = fs::read_to_string(dir.path().join("results_omp.csv")).unwrap();
    let omp: Vec<&str> = omp.lines().collect();
    assert_eq!(
        omp[0],
        "code,n,threads,speedup1,efficiency1,speedup2,efficiency2,bandwidth"
    );
    // baseline and 2 threads per run
    assert_eq!(omp.len(), 5);
    assert!(omp[3].starts_with("OBT,8,1,"));
    assert!(omp[4].starts_with("OBT,8,2,"));

    // every value carries 9 decimals
    for line in ilp.iter().skip(1).chain(omp.iter().skip(1)) {
        for value in line.split(',').filter(|v| v.contains('.')) {
            assert_eq!(value.split('.').nth(1).unwrap().len(), 9, "{line}");
        }
    }
}
