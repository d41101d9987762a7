//! Processing strategy module for ledger command files
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! covering CSV parsing, engine dispatch and report output. This allows
//! different processing implementations (synchronous, asynchronous batch) to
//! be selected at runtime.

use crate::cli::StrategyType;
use crate::core::{AssetEngine, HistoryEntry, RecordStore};
use crate::io::csv_format::{write_assets_csv, write_history_csv};
use crate::types::{Asset, AssetId, LedgerCommand, LedgerError};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// What a strategy writes once every command has been applied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Report {
    /// Current snapshot of every asset, sorted by identifier
    #[default]
    Assets,

    /// Every committed revision of one asset, oldest first
    History(AssetId),
}

/// Processing strategy trait for complete command pipelines
///
/// Each strategy reads commands from a CSV file, applies them through an
/// engine over a fresh in-memory ledger, and writes the configured
/// [`Report`] to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from `input_path` and write the report to `output`
    ///
    /// # Returns
    ///
    /// * `Ok(())` if processing completed (rejected commands included)
    /// * `Err(String)` if a fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The runtime cannot be created
    /// - The ledger cannot be read back for the report
    /// - Output cannot be written
    ///
    /// Malformed rows and rejected commands are logged and skipped; they
    /// never fail the run.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional batch configuration; the sync strategy only uses its
///   `max_retries`
/// * `report` - What to write after processing
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    report: Report,
) -> Box<dyn ProcessingStrategy> {
    let config = config.unwrap_or_default();
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(config.max_retries, report)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config, report)),
    }
}

/// Log the outcome of one applied command
///
/// Identifiers are logged; secrets never are.
pub(crate) fn log_outcome(command: &LedgerCommand, result: &Result<Asset, LedgerError>) {
    match result {
        Ok(asset) => debug!(
            msisdn = %asset.identifier,
            balance = %asset.balance,
            "command applied"
        ),
        Err(e) => warn!(
            msisdn = command.identifier(),
            kind = ?e.kind(),
            "command rejected: {}",
            e
        ),
    }
}

/// Write `report` from the ledger state behind `engine`
pub(crate) fn write_report<S: RecordStore>(
    engine: &AssetEngine<S>,
    report: &Report,
    output: &mut dyn Write,
) -> Result<(), String> {
    match report {
        Report::Assets => {
            let assets = engine
                .list_assets()
                .map_err(|e| format!("Failed to list assets: {}", e))?;
            write_assets_csv(&assets, output)
        }
        Report::History(identifier) => {
            let entries = engine
                .asset_history(identifier)
                .and_then(|history| history.collect::<Result<Vec<HistoryEntry>, LedgerError>>())
                .map_err(|e| format!("Failed to read history of {}: {}", identifier, e))?;
            if entries.is_empty() {
                warn!(msisdn = %identifier, "no history recorded");
            }
            write_history_csv(&entries, output)
        }
    }
}
