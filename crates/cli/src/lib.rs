//! CLI for publishing benchmark results.
//!
//! This crate provides the `microbench` command, which takes the JSON results
//! of a finished benchmark run and hands them to a results writer.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use microbench_results::io::read_results_json;
use microbench_sink::{resolve, writer_for_uri, BuildProperties, BuildProperty, SinkSettings};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Benchmark results CLI.
#[derive(Parser, Debug)]
#[command(name = "microbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish the results of a finished run.
    ///
    /// The destination is taken from `--uri`, else from the settings file or
    /// `MICROBENCH_URI`. `elastic://`, `http://` and `https://` URIs index
    /// into the document store; `file://` URIs and plain paths write
    /// results.json and summary.md into a directory.
    Publish {
        /// JSON results file produced by the benchmark runner.
        #[arg(short, long)]
        input: PathBuf,

        /// Destination URI override.
        #[arg(short, long)]
        uri: Option<String>,

        /// Settings file (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail if any result could not be published.
        #[arg(long)]
        strict: bool,

        /// Verbose output.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show resolved settings and build properties.
    Status {
        /// Settings file (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show detailed status information.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Parse arguments, set up logging and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let verbose = matches!(cli.command, Commands::Publish { verbose: true, .. });
    init_logging(cli.log_format, verbose);

    execute(cli).await
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the built-in filter.
pub fn init_logging(format: LogFormat, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("microbench_cli={level},microbench_sink={level}"))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Run a parsed command.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Publish {
            input,
            uri,
            config,
            strict,
            verbose,
        } => {
            let settings = SinkSettings::load(config.as_deref()).context("Failed to load settings")?;
            let uri = uri.unwrap_or(settings.uri.clone());

            let results = read_results_json(&input)
                .with_context(|| format!("Failed to read results from {}", input.display()))?;

            let writer = writer_for_uri(&uri, BuildProperties::from_env(), settings.timeout());
            info!(destination = %writer.target(), results = results.len(), "Publishing benchmark results");

            let summary = writer.write(&results).await;

            println!(
                "Published {}/{} results to {}",
                summary.succeeded(),
                summary.outcomes.len(),
                writer.target()
            );

            if verbose {
                for outcome in summary.outcomes.iter().filter(|o| o.is_success()) {
                    match &outcome.index {
                        Some(index) => println!("  + {} -> {}", outcome.benchmark, index),
                        None => println!("  + {}", outcome.benchmark),
                    }
                }
            }

            for failure in summary.failures() {
                if let Some(error) = &failure.error {
                    println!("  - {}: {}", failure.benchmark, error);
                }
            }

            if let Some(error) = &summary.close_error {
                println!("  ! connection close failed: {}", error);
            }

            if strict && !summary.is_success() {
                bail!(
                    "{} of {} results were not published",
                    summary.failed(),
                    summary.outcomes.len()
                );
            }

            Ok(())
        }
        Commands::Status { config, detailed } => {
            let settings = SinkSettings::load(config.as_deref()).context("Failed to load settings")?;
            let properties = BuildProperties::from_env();

            println!("Benchmark Results Publisher");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("\nSink:");
            println!("  - uri: {}", settings.uri);
            println!("  - endpoint: {}", resolve(&settings.uri));
            println!("  - timeout: {}s", settings.timeout_secs);

            println!("\nBuild properties:");
            for (key, value) in properties.resolved() {
                println!("  - {}: {}", key, value);
            }

            if detailed {
                println!("\nProperty sources (dotted name or environment variable):");
                for property in BuildProperty::ALL {
                    println!("  - {} / {}", property.key(), property.env_var());
                }
                println!("\nSettings overrides:");
                println!("  - {}_URI", SinkSettings::ENV_PREFIX);
                println!("  - {}_TIMEOUT_SECS", SinkSettings::ENV_PREFIX);
            }

            Ok(())
        }
    }
}
