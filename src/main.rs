//! Transaction Ledger CLI
//!
//! Imports transfers from a CSV file and reports on the resulting graph.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transfers.csv > cycles.csv
//! cargo run -- --report users transfers.csv > users.csv
//! cargo run -- --strategy sync transfers.csv > cycles.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 transfers.csv > cycles.csv
//! ```
//!
//! The report goes to stdout. Diagnostics go to stderr and are filtered with
//! `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use std::process;
use tracing_subscriber::EnvFilter;
use transaction_ledger::cli;
use transaction_ledger::strategy;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, args.report, &mut output) {
        tracing::error!(error = %e, input = %args.input_file.display(), "import failed");
        process::exit(1);
    }
}
