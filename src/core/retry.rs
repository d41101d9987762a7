//! Caller-side retry of conflicting commands
//!
//! The engine reports a lost optimistic race as `Conflict` and leaves the
//! record untouched, so re-running the whole command against fresh state is
//! always safe. Every other error is final.

use crate::core::engine::AssetEngine;
use crate::core::traits::{Clock, RecordStore, SecretVerifier};
use crate::types::{Asset, LedgerCommand, LedgerError};
use tracing::debug;

/// Default number of re-attempts after a `Conflict`
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Apply `command`, re-running it up to `max_retries` times on `Conflict`
///
/// # Returns
///
/// The first non-retryable outcome, or the last `Conflict` once retries are
/// exhausted.
pub fn apply_with_retry<S, V, C>(
    engine: &AssetEngine<S, V, C>,
    command: &LedgerCommand,
    max_retries: u32,
) -> Result<Asset, LedgerError>
where
    S: RecordStore,
    V: SecretVerifier,
    C: Clock,
{
    let mut attempt = 0;
    loop {
        match engine.apply(command) {
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                debug!(msisdn = command.identifier(), attempt, "retrying after conflict");
            }
            outcome => return outcome,
        }
    }
}
