//! Markdown output generation for benchmark results.

use crate::result::RunResult;
use std::fmt::Write;

/// Generate a markdown summary from benchmark results.
pub fn generate_summary(results: &[RunResult]) -> String {
    let mut output = String::new();

    writeln!(output, "# Benchmark Summary").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "## Results").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "| Benchmark | Mode | Score | Error | Unit |").unwrap();
    writeln!(output, "|-----------|------|-------|-------|------|").unwrap();

    for result in results {
        let metric = &result.primary_metric;
        writeln!(
            output,
            "| {} | {} | {:.3} | {} | {} |",
            short_name(&result.benchmark),
            result.mode,
            metric.score,
            format_error(metric.score_error),
            metric.score_unit
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "---").unwrap();
    writeln!(output, "Total benchmarks: {}", results.len()).unwrap();

    output
}

/// Trim the package prefix, keeping `<group>.<name>`.
fn short_name(benchmark: &str) -> &str {
    let mut dots = benchmark.rmatch_indices('.');
    match (dots.next(), dots.next()) {
        (Some(_), Some((start, _))) => &benchmark[start + 1..],
        _ => benchmark,
    }
}

fn format_error(error: f64) -> String {
    if error.is_finite() {
        format!("± {:.3}", error)
    } else {
        "-".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Metric;

    #[test]
    fn test_summary_lists_each_result() {
        let results = vec![
            RunResult::new("org.example.mongo.ConvertBenchmark.read", "thrpt", Metric::new(1000.0, 5.0, "ops/s")),
            RunResult::new("org.example.mongo.ConvertBenchmark.write", "thrpt", Metric::new(f64::NAN, f64::NAN, "ops/s")),
        ];

        let summary = generate_summary(&results);
        assert!(summary.contains("| ConvertBenchmark.read | thrpt | 1000.000 | ± 5.000 | ops/s |"));
        assert!(summary.contains("| ConvertBenchmark.write | thrpt | NaN | - | ops/s |"));
        assert!(summary.contains("Total benchmarks: 2"));
    }

    #[test]
    fn test_short_name_without_package() {
        assert_eq!(short_name("Group.name"), "Group.name");
        assert_eq!(short_name("name"), "name");
    }
}
