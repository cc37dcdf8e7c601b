//! Tabular summary of accumulated result artifacts.
//!
//! `results_ilp.csv` is pivoted into variant codes × matrix sizes, once for
//! GFLOPS and once for GB/s. For `results_omp.csv` the best bandwidth per code
//! and size is reported together with the thread count that reached it.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    fmt::Write as _,
    fs,
    io::ErrorKind,
    path::Path,
};

use crate::{
    error::{artifact_error, Result},
    measurement::Artifact,
};

/// Preferred row order; other codes follow alphabetically.
const CODE_ORDER: [&str; 4] = ["S", "V", "B", "BP"];

#[derive(Debug, Clone, PartialEq)]
pub struct IlpRow {
    pub code: String,
    pub n: usize,
    pub flops: f64,
    pub bandwidth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OmpRow {
    pub code: String,
    pub n: usize,
    pub threads: usize,
    pub symmetry_speedup: f64,
    pub symmetry_efficiency: f64,
    pub transpose_speedup: f64,
    pub transpose_efficiency: f64,
    pub bandwidth: f64,
}

fn fields(line: &str, expected: usize) -> Option<Vec<&str>> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    (fields.len() == expected).then_some(fields)
}

impl IlpRow {
    fn parse(line: &str) -> Option<Self> {
        let f = fields(line, 4)?;
        Some(Self {
            code: f[0].to_string(),
            n: f[1].parse().ok()?,
            flops: f[2].parse().ok()?,
            bandwidth: f[3].parse().ok()?,
        })
    }
}

impl OmpRow {
    fn parse(line: &str) -> Option<Self> {
        let f = fields(line, 8)?;
        Some(Self {
            code: f[0].to_string(),
            n: f[1].parse().ok()?,
            threads: f[2].parse().ok()?,
            symmetry_speedup: f[3].parse().ok()?,
            symmetry_efficiency: f[4].parse().ok()?,
            transpose_speedup: f[5].parse().ok()?,
            transpose_efficiency: f[6].parse().ok()?,
            bandwidth: f[7].parse().ok()?,
        })
    }
}

/// Parses every data line, skipping the header, blank lines and malformed rows.
fn parse_rows<T>(contents: &str, header: &str, parse: fn(&str) -> Option<T>) -> Vec<T> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && line.trim() != header)
        .filter_map(|(idx, line)| {
            let row = parse(line);
            if row.is_none() {
                log::warn!("skipping malformed row {}: {line:?}", idx + 1);
            }
            row
        })
        .collect()
}

pub fn parse_ilp(contents: &str) -> Vec<IlpRow> {
    parse_rows(contents, Artifact::Sequential.header(), IlpRow::parse)
}

pub fn parse_omp(contents: &str) -> Vec<OmpRow> {
    parse_rows(contents, Artifact::Parallel.header(), OmpRow::parse)
}

/// Orders `S, V, B, BP` first, then everything else alphabetically.
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    let rank = |code: &str| CODE_ORDER.iter().position(|&c| c == code);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Values keyed by variant code and matrix size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivot {
    pub codes: Vec<String>,
    pub sizes: Vec<usize>,
    cells: BTreeMap<(String, usize), f64>,
}

impl Pivot {
    /// Builds a pivot of `value(row)`; a later row for the same cell replaces
    /// an earlier one.
    pub fn new<F>(rows: &[IlpRow], value: F) -> Self
    where
        F: Fn(&IlpRow) -> f64,
    {
        let mut cells = BTreeMap::new();
        let mut codes = BTreeSet::new();
        let mut sizes = BTreeSet::new();

        for row in rows {
            codes.insert(row.code.clone());
            sizes.insert(row.n);
            cells.insert((row.code.clone(), row.n), value(row));
        }

        let mut codes: Vec<String> = codes.into_iter().collect();
        codes.sort_by(|a, b| compare_codes(a, b));

        Self {
            codes,
            sizes: sizes.into_iter().collect(),
            cells,
        }
    }

    pub fn get(&self, code: &str, n: usize) -> Option<f64> {
        self.cells.get(&(code.to_string(), n)).copied()
    }

    /// Grid table with 3 decimals; missing cells stay blank.
    pub fn render(&self, title: &str) -> String {
        let mut header = vec!["code".to_string()];
        header.extend(self.sizes.iter().map(|n| n.to_string()));

        let mut body = Vec::with_capacity(self.codes.len());
        for code in &self.codes {
            let mut line = vec![code.clone()];
            for &n in &self.sizes {
                line.push(
                    self.get(code, n)
                        .map(|v| format!("{v:.3}"))
                        .unwrap_or_default(),
                );
            }
            body.push(line);
        }

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                body.iter()
                    .map(|line| line[col].len())
                    .chain(std::iter::once(header[col].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = widths
            .iter()
            .fold(String::from("+"), |acc, w| acc + &"-".repeat(w + 2) + "+");

        let mut out = String::new();
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{}", grid_line(&header, &widths));
        let _ = writeln!(out, "{}", rule.replace('-', "="));
        for line in &body {
            let _ = writeln!(out, "{}", grid_line(line, &widths));
            let _ = writeln!(out, "{rule}");
        }
        out
    }
}

fn grid_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .fold(String::from("|"), |acc, (cell, &w)| {
            acc + &format!(" {cell:>w$} |")
        })
}

/// Highest bandwidth seen for one code and size.
#[derive(Debug, Clone, PartialEq)]
pub struct BestBandwidth {
    pub code: String,
    pub n: usize,
    pub threads: usize,
    pub bandwidth: f64,
}

/// Best bandwidth per code and size, ordered like the pivot rows.
pub fn best_bandwidth(rows: &[OmpRow]) -> Vec<BestBandwidth> {
    let mut best: BTreeMap<(String, usize), BestBandwidth> = BTreeMap::new();

    for row in rows {
        let key = (row.code.clone(), row.n);
        let replace = best
            .get(&key)
            .map_or(true, |current| row.bandwidth > current.bandwidth);
        if replace {
            best.insert(
                key,
                BestBandwidth {
                    code: row.code.clone(),
                    n: row.n,
                    threads: row.threads,
                    bandwidth: row.bandwidth,
                },
            );
        }
    }

    let mut out: Vec<BestBandwidth> = best.into_values().collect();
    out.sort_by(|a, b| compare_codes(&a.code, &b.code).then(a.n.cmp(&b.n)));
    out
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(artifact_error(path, e.to_string())),
    }
}

/// Renders the whole summary for the artifacts inside `dir`.
pub fn summarize(dir: &Path) -> Result<String> {
    let mut out = String::new();

    let ilp_path = dir.join(Artifact::Sequential.file_name());
    match read_optional(&ilp_path)? {
        Some(contents) => {
            let rows = parse_ilp(&contents);
            let flops = Pivot::new(&rows, |r| r.flops * 1e-9);
            let bandwidth = Pivot::new(&rows, |r| r.bandwidth * 1e-9);
            out.push_str(&flops.render("FLOPS (GFLOPS) FROM EXPERIMENTS"));
            out.push('\n');
            out.push_str(&bandwidth.render("BANDWIDTH (GB/s) FROM EXPERIMENTS"));
        }
        None => {
            let _ = writeln!(out, "No results in {}", ilp_path.display());
        }
    }

    let omp_path = dir.join(Artifact::Parallel.file_name());
    if let Some(contents) = read_optional(&omp_path)? {
        let _ = writeln!(out, "\nBEST PARALLEL BANDWIDTH (GB/s)");
        for best in best_bandwidth(&parse_omp(&contents)) {
            let _ = writeln!(
                out,
                "{:<6} n = {:<8} {:>10.3} GB/s with {} threads",
                best.code,
                best.n,
                best.bandwidth * 1e-9,
                best.threads
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ILP: &str = "code,n,flops,bandwidth
B,16,2000000000.000000000,4000000000.000000000
S,16,1000000000.000000000,3000000000.000000000
S,32,1500000000.000000000,3500000000.000000000
garbage line
OBX,16,1.0,1.0
V,16,not-a-number,1.0
";

    #[test]
    fn test_code_order() {
        let mut codes = vec!["OBX", "BP", "A", "S", "B", "V"];
        codes.sort_by(|a, b| compare_codes(a, b));
        assert_eq!(codes, vec!["S", "V", "B", "BP", "A", "OBX"]);
    }

    #[test]
    fn test_parse_skips_header_and_malformed_rows() {
        let rows = parse_ilp(ILP);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].code, "B");
        assert_eq!(rows[3].code, "OBX");
    }

    #[test]
    fn test_pivot_layout() {
        let rows = parse_ilp(ILP);
        let pivot = Pivot::new(&rows, |r| r.flops * 1e-9);
        assert_eq!(pivot.codes, vec!["S", "B", "OBX"]);
        assert_eq!(pivot.sizes, vec![16, 32]);
        assert_eq!(pivot.get("S", 32), Some(1.5));
        assert_eq!(pivot.get("B", 32), None);

        let table = pivot.render("FLOPS");
        assert!(table.contains("| 1.500 |"));
        assert!(table.lines().nth(2).unwrap().contains("code"));
    }

    #[test]
    fn test_best_bandwidth_keeps_thread_count() {
        let omp = "code,n,threads,speedup1,efficiency1,speedup2,efficiency2,bandwidth
OBT,64,1,1,100,1,100,1000000000.0
OBT,64,4,3,75,2,50,5000000000.0
OBT,64,8,4,50,2,25,3000000000.0
OBT,128,1,1,100,1,100,2000000000.0
";
        let best = best_bandwidth(&parse_omp(omp));
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].n, 64);
        assert_eq!(best[0].threads, 4);
        assert_eq!(best[1].threads, 1);
    }

    #[test]
    fn test_summarize_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("results_ilp.csv"), ILP).unwrap();

        let text = summarize(dir.path()).unwrap();
        assert!(text.contains("FLOPS (GFLOPS) FROM EXPERIMENTS"));
        assert!(text.contains("BANDWIDTH (GB/s) FROM EXPERIMENTS"));
        assert!(!text.contains("BEST PARALLEL"));
    }

    #[test]
    fn test_summarize_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let text = summarize(dir.path()).unwrap();
        assert!(text.contains("No results"));
    }
}
