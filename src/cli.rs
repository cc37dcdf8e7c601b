//! Command-line entry points shared by the `symtrans-*` executables.
//!
//! Every variant binary accepts `dim [repetitions] [threads]` plus a few
//! optional flags. Exit status: 0 on success, 1 for an invalid invocation or a
//! worker pool that cannot be built, -1 when the matrices cannot be allocated.

use std::path::PathBuf;

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, FromArgMatches, Parser};
use log::{LevelFilter, Log, Metadata, Record};

use crate::{
    error::{Result, SymtransError},
    harness::{BenchConfig, Harness, ThreadSelection},
    kernels::Variant,
    matrix::{allocate_pair, Matrix},
    report,
    sink::{CsvSink, NullSink, ResultSink},
    summary,
    validate::{validate, Validation},
};

/// Benchmark symmetry check and transpose of a 2^dim × 2^dim matrix
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(version, about, long_about = None, allow_negative_numbers = true)]
pub struct Cli {
    /// Matrix size exponent: n = 2^dim
    #[arg(value_name = "DIM", value_parser = clap::value_parser!(u32).range(0..64))]
    pub dim: u32,

    /// Repetitions per configuration (non-positive means 500)
    #[arg(value_name = "REPETITIONS")]
    pub repetitions: Option<i64>,

    /// Worker threads for the parallel variant (0 or negative sweeps 2..64)
    #[arg(value_name = "THREADS")]
    pub threads: Option<i64>,

    /// Directory holding results_ilp.csv and results_omp.csv
    #[arg(long, env = "SYMTRANS_RESULTS_DIR", default_value = ".")]
    pub results_dir: PathBuf,

    /// Seed for the random input matrix
    #[arg(long, env = "SYMTRANS_SEED")]
    pub seed: Option<u64>,

    /// Do not append measurements to the result files
    #[arg(long)]
    pub no_save: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config(&self) -> BenchConfig {
        BenchConfig::new(self.dim)
            .with_repetitions(self.repetitions.unwrap_or(0))
            .with_threads(ThreadSelection::from_arg(self.threads.unwrap_or(0)))
            .with_seed(self.seed)
    }
}

/// Print the results summary of a results directory
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "symtrans-summary", version, about, long_about = None)]
pub struct SummaryCli {
    /// Directory holding results_ilp.csv and results_omp.csv
    #[arg(long, env = "SYMTRANS_RESULTS_DIR", default_value = ".")]
    pub results_dir: PathBuf,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn bin_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Sequential => "symtrans-sequential",
        Variant::Blocked => "symtrans-blocked",
        Variant::Prefetch => "symtrans-prefetch",
        Variant::Vectorized => "symtrans-vectorized",
        Variant::Parallel => "symtrans-parallel",
    }
}

/// Parses `args` (program name first) for the binary of `variant`.
pub fn parse_args<I, T>(variant: Variant, args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = Cli::command()
        .name(bin_name(variant))
        .try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}

/// Process exit status for an error.
pub fn exit_code(error: &SymtransError) -> i32 {
    match error {
        SymtransError::AllocationError { .. } => -1,
        SymtransError::InvalidInvocation { .. }
        | SymtransError::ArtifactWriteError { .. }
        | SymtransError::ThreadPoolError { .. } => 1,
    }
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the stderr logger; later calls only change the level.
pub fn init_logging(verbosity: u8) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_for(verbosity));
}

fn exit_on_parse_error(error: clap::Error) -> ! {
    let code = match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    };
    let _ = error.print();
    std::process::exit(code)
}

fn bench<S: ResultSink>(
    variant: Variant,
    config: BenchConfig,
    sink: S,
    m: &Matrix,
    t: &mut Matrix,
) -> Result<Validation> {
    let mut harness = Harness::new(config, sink);

    if variant.is_parallel() {
        let mut first = true;
        harness.run_parallel(m, t, |point| {
            if first {
                println!("{}", report::parallel_baseline(point));
                first = false;
            }
            println!("{}", report::parallel_row(point));
        })?;
        println!();
    } else {
        let measurement = harness.run_sequential(variant, m, t)?;
        println!("{}", report::sequential(&measurement));
    }

    Ok(validate(m, t))
}

/// Runs one benchmark invocation of `variant`.
pub fn run(variant: Variant, cli: &Cli) -> Result<Validation> {
    let config = cli.config();
    let n = config.n()?;

    if !variant.is_parallel() && cli.threads.is_some() {
        log::warn!("{variant} is single-threaded; ignoring the thread count");
    }

    println!(
        "{}",
        report::header(variant, n, config.repetitions, Local::now())
    );

    let (m, mut t) = allocate_pair(n, config.seed)?;

    let validation = if cli.no_save {
        bench(variant, config, NullSink, &m, &mut t)?
    } else {
        bench(variant, config, CsvSink::new(&cli.results_dir), &m, &mut t)?
    };

    println!("{validation}");

    Ok(validation)
}

/// `main` of the binary for `variant`.
pub fn main_for(variant: Variant) -> ! {
    let cli = parse_args(variant, std::env::args_os()).unwrap_or_else(|e| exit_on_parse_error(e));
    init_logging(cli.verbose);

    match run(variant, &cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            std::process::exit(exit_code(&e))
        }
    }
}

/// `main` of `symtrans-summary`.
pub fn summary_main() -> ! {
    let cli = SummaryCli::try_parse().unwrap_or_else(|e| exit_on_parse_error(e));
    init_logging(cli.verbose);

    match summary::summarize(&cli.results_dir) {
        Ok(text) => {
            print!("{text}");
            std::process::exit(0)
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let cli = parse_args(Variant::Parallel, ["symtrans-parallel", "10", "20", "4"]).unwrap();
        assert_eq!(cli.dim, 10);
        let config = cli.config();
        assert_eq!(config.repetitions, 20);
        assert_eq!(config.threads, ThreadSelection::Fixed(4));
    }

    #[test]
    fn test_negative_values_normalize() {
        let cli = parse_args(Variant::Parallel, ["symtrans-parallel", "4", "-1", "-8"]).unwrap();
        let config = cli.config();
        assert_eq!(config.repetitions, crate::DEFAULT_REPETITIONS);
        assert_eq!(config.threads, ThreadSelection::Sweep);
    }

    #[test]
    fn test_missing_dim_is_rejected() {
        let err = parse_args(Variant::Blocked, ["symtrans-blocked"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_invalid_dim_is_rejected() {
        assert!(parse_args(Variant::Blocked, ["symtrans-blocked", "abc"]).is_err());
        assert!(parse_args(Variant::Blocked, ["symtrans-blocked", "64"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = parse_args(
            Variant::Vectorized,
            ["symtrans-vectorized", "3", "--seed", "9", "--no-save", "-vv"],
        )
        .unwrap();
        assert_eq!(cli.seed, Some(9));
        assert!(cli.no_save);
        assert_eq!(level_for(cli.verbose), LevelFilter::Debug);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&crate::error::allocation_error(1, "oom")), -1);
        assert_eq!(exit_code(&crate::error::invocation_error("bad")), 1);
        assert_eq!(exit_code(&crate::error::thread_pool_error(2, "no")), 1);
    }

    #[test]
    fn test_run_writes_results_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let cli = parse_args(
            Variant::Prefetch,
            ["symtrans-prefetch", "3", "2", "--seed", "5", "--results-dir", dir_arg],
        )
        .unwrap();

        let validation = run(Variant::Prefetch, &cli).unwrap();
        assert!(validation.transposed);

        let contents = std::fs::read_to_string(dir.path().join("results_ilp.csv")).unwrap();
        assert!(contents.lines().nth(1).unwrap().starts_with("BP,8,"));
    }
}
