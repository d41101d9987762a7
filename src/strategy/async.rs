//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. Commands are read in batches and each batch is
//! applied with identifier-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches, max_retries)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (asset partitioning + tokio tasks)
//!     └── AssetEngine<MemoryLedger> (shared, optimistic commits)
//! ```
//!
//! # Ordering
//!
//! - Batches are applied one after another, so an asset whose commands span
//!   several batches still sees them in input order
//! - Within a batch, each asset's commands run sequentially on one task while
//!   different assets run in parallel on the tokio worker threads

use crate::core::{AssetEngine, BatchProcessor, MemoryLedger, DEFAULT_MAX_RETRIES};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{log_outcome, write_report, ProcessingStrategy, Report};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,

    /// Number of tokio worker threads
    pub max_concurrent_batches: usize,

    /// Re-attempts per command after a `Conflict`
    pub max_retries: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero sizes with defaults
    ///
    /// A `max_retries` of zero is valid and disables retries.
    pub fn new(batch_size: usize, max_concurrent_batches: usize, max_retries: u32) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
            max_retries,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// # Configuration
///
/// The strategy accepts a BatchConfig with:
/// - `batch_size`: Number of commands per batch (default: 1000)
/// - `max_concurrent_batches`: Number of worker threads (default: CPU cores)
/// - `max_retries`: Re-attempts after a `Conflict` (default: 3)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    report: Report,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, report: Report) -> Self {
        Self { config, report }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process commands from input file and write the report to output
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Creates a shared AssetEngine and a BatchProcessor over it
    /// 3. Reads commands in batches from CSV using AsyncReader
    /// 4. Applies each batch, waiting for it before reading the next
    /// 5. Writes the configured report
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let engine = Arc::new(AssetEngine::new(MemoryLedger::new()));
            let processor = BatchProcessor::new(Arc::clone(&engine), self.config.max_retries);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads futures::io, tokio files need the compat layer
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut applied = 0usize;
            let mut rejected = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for outcome in processor.process_batch(batch).await {
                    log_outcome(&outcome.command, &outcome.result);
                    if outcome.result.is_ok() {
                        applied += 1;
                    } else {
                        rejected += 1;
                    }
                }
            }

            info!(applied, rejected, "input processed");
            write_report(&*engine, &self.report, output)
        })
    }
}
