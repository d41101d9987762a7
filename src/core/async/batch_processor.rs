//! Batch processing with identifier-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which applies a batch of
//! ledger commands concurrently while keeping the commands for each asset in
//! input order.
//!
//! # Design
//!
//! A batch is partitioned by asset identifier. Each partition runs as its own
//! tokio task and applies its commands one after another, so two commands for
//! the same asset never race each other. Commands for different assets touch
//! different keys and therefore never conflict at commit.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<AssetEngine<S>>  (shared engine over one store)
//!     └── max_retries          (re-attempts on Conflict)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use crate::core::engine::AssetEngine;
use crate::core::retry::apply_with_retry;
use crate::core::traits::RecordStore;
use crate::types::{Asset, AssetId, LedgerCommand, LedgerError};

/// Result of applying a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was applied
    pub command: LedgerCommand,

    /// The record as written, or why the command was rejected
    pub result: Result<Asset, LedgerError>,
}

/// Batch processor with identifier-based partitioning
///
/// Cloning is cheap: clones share the same engine.
#[derive(Debug)]
pub struct BatchProcessor<S> {
    /// Engine shared across partition tasks
    engine: Arc<AssetEngine<S>>,

    /// Re-attempts allowed per command after a `Conflict`
    max_retries: u32,
}

impl<S> Clone for BatchProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            max_retries: self.max_retries,
        }
    }
}

impl<S> BatchProcessor<S>
where
    S: RecordStore + 'static,
{
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `engine` - Arc-wrapped engine shared with the caller
    /// * `max_retries` - Re-attempts per command after a `Conflict`
    pub fn new(engine: Arc<AssetEngine<S>>, max_retries: u32) -> Self {
        Self {
            engine,
            max_retries,
        }
    }

    /// Partition a batch of commands by asset identifier
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one partition
    /// - Commands within a partition keep their input order
    /// - A partition holds commands for a single identifier only
    pub fn partition_by_asset(
        &self,
        batch: Vec<LedgerCommand>,
    ) -> HashMap<AssetId, Vec<LedgerCommand>> {
        let mut partitions: HashMap<AssetId, Vec<LedgerCommand>> = HashMap::new();

        for command in batch {
            partitions
                .entry(command.identifier().to_string())
                .or_default()
                .push(command);
        }

        partitions
    }

    /// Apply the commands of one asset sequentially
    ///
    /// A rejected command does not stop the ones after it. Results come back
    /// in input order.
    ///
    /// The engine is synchronous, so this runs inline on the tokio worker.
    /// That is fine for [`MemoryLedger`](crate::core::MemoryLedger); a store
    /// doing blocking I/O should be driven through `spawn_blocking` instead.
    pub async fn process_asset_commands(
        &self,
        commands: Vec<LedgerCommand>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            let result = apply_with_retry(&*self.engine, &command, self.max_retries);
            results.push(ProcessingResult { command, result });
        }

        results
    }

    /// Apply a batch with one concurrent task per asset
    ///
    /// Returns once every partition has finished. Results are grouped by
    /// asset; the order between assets is unspecified.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let partitions = self.partition_by_asset(batch);

        let mut tasks = Vec::with_capacity(partitions.len());
        for (_identifier, commands) in partitions {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_asset_commands(commands).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(asset_results) => results.extend(asset_results),
                Err(e) => error!(error = %e, "partition task failed"),
            }
        }

        results
    }
}
