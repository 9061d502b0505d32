//! Run a solver over a directory of DIMACS files and record the outcomes

use crate::{dimacs, Algorithm, Solution, WalkSat};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::mpsc,
    time::{Duration, Instant},
};
use tikv_jemalloc_ctl::{epoch, stats};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message")]
pub enum Outcome {
    Sat,
    UnSat,
    Unknown,
    Timeout,
    Error(String),
}

impl From<&Solution> for Outcome {
    fn from(solution: &Solution) -> Self {
        match solution {
            Solution::Sat(_) => Outcome::Sat,
            Solution::UnSat => Outcome::UnSat,
            Solution::Unknown => Outcome::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// File name without the directory
    pub filename: String,
    pub elapsed: Duration,
    /// Peak of the memory allocated while solving, above the level before the solver started.
    /// `None` if the allocator statistics are unavailable.
    pub peak_mem_kb: Option<u64>,
    pub outcome: Outcome,
}

impl Record {
    pub fn csv_header() -> &'static str {
        "filename,time_sec,peak_mem_kb,result"
    }

    pub fn to_csv_line(&self) -> String {
        let result = match &self.outcome {
            Outcome::Error(message) => {
                return format!(
                    "{},ERROR,ERROR,{}",
                    esc_csv(&self.filename),
                    esc_csv(&format!("ERROR: {message}"))
                )
            }
            Outcome::Sat => "SAT",
            Outcome::UnSat => "UNSAT",
            Outcome::Unknown => "UNKNOWN",
            Outcome::Timeout => "TIMEOUT",
        };
        format!(
            "{},{:.4},{},{}",
            esc_csv(&self.filename),
            self.elapsed.as_secs_f64(),
            self.peak_mem_kb.map_or(String::new(), |kb| kb.to_string()),
            result
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub solver: String,
    pub timeout: Option<Duration>,
    pub records: Vec<Record>,
}

impl Report {
    pub fn count(&self, outcome: &Outcome) -> usize {
        self.records.iter().filter(|r| &r.outcome == outcome).count()
    }
}

/// Files ending in `.cnf` under `dir`, recursively, sorted by path
pub fn find_instances(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }
    let mut paths = Vec::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("Cannot read {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "cnf") {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Parse and solve one file. Failures are recorded as [Outcome::Error] instead of returned.
///
/// The solver runs on a worker thread while this thread samples the allocator statistics
/// every [SAMPLE_INTERVAL]. With `timeout`, the worker is abandoned when the time is up.
pub fn run_one(
    path: &Path,
    algorithm: Algorithm,
    walksat: WalkSat,
    timeout: Option<Duration>,
) -> Record {
    let filename = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let input = match dimacs::parse_file(path) {
        Ok(input) => input,
        Err(e) => {
            return Record {
                filename,
                elapsed: Duration::ZERO,
                peak_mem_kb: None,
                outcome: Outcome::Error(e.to_string()),
            }
        }
    };

    let mut solver = algorithm.solver(walksat);
    let baseline = allocated_bytes();
    let mut peak = baseline;
    let start = Instant::now();
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let solution = solver.solve(&input.cnf);
        let _ = tx.send(solution);
    });

    let outcome = loop {
        let wait = match timeout {
            Some(timeout) => match timeout.checked_sub(start.elapsed()) {
                Some(rest) if !rest.is_zero() => rest.min(SAMPLE_INTERVAL),
                _ => break Outcome::Timeout,
            },
            None => SAMPLE_INTERVAL,
        };
        match rx.recv_timeout(wait) {
            Ok(solution) => break Outcome::from(&solution),
            Err(mpsc::RecvTimeoutError::Timeout) => peak = peak.max(allocated_bytes()),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                break Outcome::Error("solver thread panicked".to_string())
            }
        }
    };
    let elapsed = start.elapsed();
    peak = peak.max(allocated_bytes());

    Record {
        filename,
        elapsed,
        peak_mem_kb: baseline
            .zip(peak)
            .map(|(base, peak)| (peak.saturating_sub(base) / 1024) as u64),
        outcome,
    }
}

/// How often [run_one] reads the allocator statistics while the solver runs
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

/// Bytes allocated by the process, as reported by jemalloc
///
/// The numbers reflect the solver only when jemalloc is the global allocator, as in the
/// `satlab` binary.
fn allocated_bytes() -> Option<usize> {
    epoch::advance().ok()?;
    stats::allocated::read().ok()
}

pub fn benchmark(
    paths: &[PathBuf],
    algorithm: Algorithm,
    walksat: WalkSat,
    timeout: Option<Duration>,
) -> Report {
    let n = paths.len();
    eprintln!("{:>12} {} instances", "Found".bold().magenta(), n);

    let mut records = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        eprintln!(
            "{:>12} ({}/{n}) {} [{algorithm}, timeout = {:?}]",
            "Solving".bold().blue(),
            i + 1,
            path.display(),
            timeout
        );
        let record = run_one(path, algorithm, walksat, timeout);
        let label = match &record.outcome {
            Outcome::Sat => "SAT".bold().green(),
            Outcome::UnSat => "UNSAT".bold().green(),
            Outcome::Unknown => "Unknown".bold().yellow(),
            Outcome::Timeout => "Timeout".bold().yellow(),
            Outcome::Error(_) => "Error".bold().red(),
        };
        match &record.outcome {
            Outcome::Error(message) => eprintln!("{:>12} {} ({})", label, record.filename, message),
            _ => eprintln!(
                "{:>12} {} (in {:?}, peak {} KiB)",
                label,
                record.filename,
                record.elapsed,
                record
                    .peak_mem_kb
                    .map_or("?".to_string(), |kb| kb.to_string())
            ),
        }
        records.push(record);
    }

    Report {
        solver: algorithm.solver(walksat).name().to_string(),
        timeout,
        records,
    }
}

/// Append rows to a CSV log. The header is written only when the file is created.
pub fn append_csv(path: &Path, records: &[Record]) -> Result<()> {
    let is_new = !path.exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    if is_new {
        writeln!(file, "{}", Record::csv_header())?;
    }
    for record in records {
        writeln!(file, "{}", record.to_csv_line())?;
    }
    Ok(())
}

fn esc_csv(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
