//! Asset Ledger CLI
//!
//! Command-line interface for applying asset ledger commands from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > assets.csv
//! cargo run -- --strategy sync commands.csv > assets.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > assets.csv
//! cargo run -- --history 9990001234 commands.csv > history.csv
//! RUST_LOG=asset_ledger=debug cargo run -- commands.csv
//! ```
//!
//! The program reads commands from the input CSV file, applies them to a fresh
//! in-memory ledger using the selected processing strategy, and writes either
//! the asset snapshot or one asset's history to stdout. Logs go to stderr.
//!
//! # Processing Strategies
//!
//! - **sync**: Sequential processing in input order
//! - **async**: Batches partitioned by asset and applied on a tokio runtime (default)
//!
//! # Exit Codes
//!
//! - 0: Success (rejected commands included)
//! - 1: Fatal error (file not found, runtime failure, output failure)

use asset_ledger::cli;
use asset_ledger::strategy;
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args);

    let strategy = strategy::create_strategy(
        args.strategy,
        Some(args.to_batch_config()),
        args.report(),
    );

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!("{}", e);
        process::exit(1);
    }
}
