//! Benchmark run results for the data microbenchmarks.
//!
//! This crate provides the result model shared by the benchmark runner and
//! the results sink.
//!
//! # Quick Start
//!
//! ```no_run
//! use microbench_results::io::read_results_json;
//!
//! let results = read_results_json("target/jmh-result.json")?;
//! for result in &results {
//!     println!("{}: {}", result.benchmark, result.primary_metric.score);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`result`] - The `RunResult` and `Metric` structs
//! - [`format`] - The canonical JSON result array
//! - [`io`] - I/O operations for reading/writing results
//! - [`markdown`] - Markdown report generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod format;
pub mod io;
pub mod markdown;
pub mod result;

pub use format::{jsonify_results, parse_results, FormatError};
pub use result::{Metric, RunResult};
