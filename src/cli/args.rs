use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Import transfers into a transaction graph and report circular payments
#[derive(Parser, Debug)]
#[command(name = "transaction-ledger", long_about = None)]
pub struct CliArgs {
    /// CSV file of transfers with columns from,to,amount
    #[arg(value_name = "INPUT")]
    pub input_file: PathBuf,

    /// Import pipeline
    #[arg(long, value_name = "STRATEGY", default_value = "async")]
    pub strategy: StrategyType,

    /// Report written to stdout: circular chains or per-user edge counts
    #[arg(long, value_name = "REPORT", default_value = "cycles")]
    pub report: ReportType,

    /// Transfers per batch, async only [default: 1000]
    #[arg(long = "batch-size", value_name = "SIZE")]
    pub batch_size: Option<usize>,

    /// Runtime worker threads, async only [default: CPU cores]
    #[arg(long = "max-concurrent", value_name = "COUNT")]
    pub max_concurrent_batches: Option<usize>,
}

/// Available import strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportType {
    #[default]
    Cycles,
    Users,
}

impl CliArgs {
    /// Batch settings for the async strategy
    ///
    /// Unset options take their defaults; zero values are replaced by
    /// [`BatchConfig::new`] with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_batches
                .unwrap_or(default.max_concurrent_batches),
        )
    }
}
