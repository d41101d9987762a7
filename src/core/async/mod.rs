//! Concurrent command processing
//!
//! This module provides the pieces the async strategy builds on:
//!
//! - **BatchProcessor**: partitions a batch by asset identifier and applies
//!   each partition on its own tokio task
//!
//! # Thread Safety
//!
//! The engine is shared through an `Arc` and serves every task. Commands for
//! one asset run sequentially in input order; commands for different assets
//! run in parallel and never contend, since the store validates and commits
//! per key.

pub mod batch_processor;

pub use batch_processor::{BatchProcessor, ProcessingResult};
