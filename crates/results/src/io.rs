//! I/O operations for benchmark results.
//!
//! This module reads and writes run results in the canonical JSON format and
//! writes the Markdown summary next to them.

use crate::format::{jsonify_results, parse_results};
use crate::markdown;
use crate::result::RunResult;
use std::fs;
use std::io;
use std::path::Path;

/// File name of the combined JSON results inside an output directory.
pub const RESULTS_FILE: &str = "results.json";

/// File name of the Markdown summary inside an output directory.
pub const SUMMARY_FILE: &str = "summary.md";

/// Write benchmark results to a JSON file.
pub fn write_results_json(results: &[RunResult], path: impl AsRef<Path>) -> io::Result<()> {
    let json = jsonify_results(results).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

/// Write the Markdown summary.
pub fn write_summary(results: &[RunResult], path: impl AsRef<Path>) -> io::Result<()> {
    fs::write(path, markdown::generate_summary(results))
}

/// Write the combined JSON and the summary into `dir`, creating it if needed.
pub fn write_all_outputs(results: &[RunResult], dir: impl AsRef<Path>) -> io::Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    write_results_json(results, dir.join(RESULTS_FILE))?;
    write_summary(results, dir.join(SUMMARY_FILE))?;

    Ok(())
}

/// Read results from a JSON file.
pub fn read_results_json(path: impl AsRef<Path>) -> io::Result<Vec<RunResult>> {
    let content = fs::read_to_string(path)?;
    parse_results(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
