use crate::core::DEFAULT_MAX_RETRIES;
use crate::strategy::{BatchConfig, Report};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Apply asset ledger commands from a CSV file
#[derive(Parser, Debug)]
#[command(name = "asset-ledger")]
#[command(
    about = "Apply create and balance-update commands to an asset ledger",
    long_about = None
)]
pub struct CliArgs {
    /// Input CSV file path containing ledger commands
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for partitioned batches"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Re-attempts per command after a conflicting concurrent write
    #[arg(
        long = "max-retries",
        value_name = "COUNT",
        default_value_t = DEFAULT_MAX_RETRIES,
        help = "Re-attempts per command after a write conflict"
    )]
    pub max_retries: u32,

    /// Print one asset's history instead of the snapshot of all assets
    #[arg(
        long = "history",
        value_name = "MSISDN",
        help = "Write the full history of one asset instead of the asset snapshot"
    )]
    pub history: Option<String>,

    /// Log verbosity; repeat for more detail (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Unset values fall back to defaults; zero sizes are replaced with
    /// defaults by [`BatchConfig::new`], which logs a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_batches
                .unwrap_or(default.max_concurrent_batches),
            self.max_retries,
        )
    }

    /// The report requested on the command line
    pub fn report(&self) -> Report {
        match &self.history {
            Some(identifier) => Report::History(identifier.clone()),
            None => Report::Assets,
        }
    }

    /// Default log filter derived from `-v` occurrences
    ///
    /// Used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::batch_size(&["program", "--batch-size", "2000", "input.csv"], Some(2000), None)]
    #[case::max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], None, Some(8))]
    #[case::no_options(&["program", "input.csv"], None, None)]
    #[case::all_options(
        &["program", "--strategy", "async", "--batch-size", "2000", "--max-concurrent", "8", "input.csv"],
        Some(2000),
        Some(8)
    )]
    fn test_config_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent_batches, max_concurrent);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get(), 3)]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get(), 3)]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], 1000, 8, 3)]
    #[case::custom_retries(&["program", "--max-retries", "0", "input.csv"], 1000, num_cpus::get(), 0)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get(), 3)]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], 1000, num_cpus::get(), 3)]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
        #[case] expected_retries: u32,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
        assert_eq!(config.max_retries, expected_retries);
    }

    #[rstest]
    #[case::snapshot(&["program", "input.csv"], Report::Assets)]
    #[case::history(
        &["program", "--history", "9990001234", "input.csv"],
        Report::History("9990001234".to_string())
    )]
    fn test_report_selection(#[case] args: &[&str], #[case] expected: Report) {
        assert_eq!(CliArgs::try_parse_from(args).unwrap().report(), expected);
    }

    #[rstest]
    #[case::quiet(&["program", "input.csv"], "warn")]
    #[case::verbose(&["program", "-v", "input.csv"], "debug")]
    #[case::very_verbose(&["program", "-vv", "input.csv"], "trace")]
    #[case::repeated(&["program", "-v", "--verbose", "-v", "input.csv"], "trace")]
    fn test_log_level(#[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(CliArgs::try_parse_from(args).unwrap().log_level(), expected);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::negative_retries(&["program", "--max-retries", "-1", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
