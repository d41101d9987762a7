//! Synchronous processing strategy
//!
//! This module provides a single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates processing by coordinating
//! between the SyncReader (for CSV input) and the AssetEngine (for business
//! logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Command handling to `AssetEngine` via `apply_with_retry`
//! - Report output to `write_report`
//!
//! Rows are streamed one at a time; memory grows with the ledger, not with
//! the input file.

use crate::core::{apply_with_retry, AssetEngine, MemoryLedger, DEFAULT_MAX_RETRIES};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{log_outcome, write_report, ProcessingStrategy, Report};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use asset_ledger::strategy::{ProcessingStrategy, Report, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(3, Report::Assets);
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    /// Re-attempts per command after a `Conflict`
    max_retries: u32,

    /// What to write after processing
    report: Report,
}

impl SyncProcessingStrategy {
    pub fn new(max_retries: u32, report: Report) -> Self {
        Self {
            max_retries,
            report,
        }
    }
}

impl Default for SyncProcessingStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, Report::Assets)
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process commands from input file and write the report to output
    ///
    /// 1. Creates a SyncReader to stream commands from the CSV file
    /// 2. Creates an AssetEngine over a fresh MemoryLedger
    /// 3. Applies each command in input order, logging rejections
    /// 4. Writes the configured report
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let engine = AssetEngine::new(MemoryLedger::new());
        let reader = SyncReader::new(input_path)?;

        let mut applied = 0usize;
        let mut rejected = 0usize;
        for row in reader {
            match row {
                Ok(command) => {
                    let result = apply_with_retry(&engine, &command, self.max_retries);
                    log_outcome(&command, &result);
                    if result.is_ok() {
                        applied += 1;
                    } else {
                        rejected += 1;
                    }
                }
                Err(e) => warn!("CSV parsing error: {}", e),
            }
        }

        info!(applied, rejected, "input processed");
        write_report(&engine, &self.report, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "op,msisdn,dealer,mpin,amount,type,remarks\n{rows}")
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(strategy: &SyncProcessingStrategy, rows: &str) -> String {
        let file = create_temp_csv(rows);
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_sync_strategy_reference_flow() {
        let output = run(
            &SyncProcessingStrategy::default(),
            "create,9990001234,D1,1234,1000.0,,\n\
             update,9990001234,,1234,200.0,DEBIT,shop\n\
             update,9990001234,,9999,50.0,CREDIT,x\n\
             update,9990001234,,1234,5000.0,DEBIT,x\n",
        );

        assert_eq!(
            output,
            "msisdn,dealer,balance,status,last_type,last_amount,remarks\n\
             9990001234,D1,800.0000,ACTIVE,DEBIT,200.0000,shop\n"
        );
    }

    #[test]
    fn test_sync_strategy_history_report() {
        let strategy = SyncProcessingStrategy::new(3, Report::History("9990001234".to_string()));
        let output = run(
            &strategy,
            "create,9990001234,D1,1234,1000.0,,\n\
             create,5550000000,D1,1234,1.0,,\n\
             update,9990001234,,1234,200.0,DEBIT,shop\n\
             update,9990001234,,9999,50.0,CREDIT,x\n",
        );

        assert_eq!(
            output,
            "version,type,amount,balance,remarks\n\
             1,CREATE,0.0000,1000.0000,Account Created\n\
             2,DEBIT,200.0000,800.0000,shop\n"
        );
    }

    #[test]
    fn test_sync_strategy_history_of_unknown_asset_is_header_only() {
        let strategy = SyncProcessingStrategy::new(3, Report::History("404".to_string()));
        let output = run(&strategy, "create,1,D1,1234,1,,\n");
        assert_eq!(output, "version,type,amount,balance,remarks\n");
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let mut output = Vec::new();
        let err = SyncProcessingStrategy::default()
            .process(Path::new("nonexistent.csv"), &mut output)
            .unwrap_err();
        assert!(err.contains("Failed to open file"));
    }

    #[test]
    fn test_sync_strategy_continues_on_malformed_record() {
        let output = run(
            &SyncProcessingStrategy::default(),
            "create,1,D1,1234,100.0,,\n\
             create,2,D1,1234,invalid,,\n\
             create,3,D1,1234,50.0,,\n",
        );

        let identifiers: Vec<&str> = output
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .collect();
        assert_eq!(identifiers, vec!["1", "3"]);
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
