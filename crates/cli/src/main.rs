//! Benchmark results publisher entry point.

#[tokio::main]
async fn main() {
    if let Err(e) = microbench_cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
