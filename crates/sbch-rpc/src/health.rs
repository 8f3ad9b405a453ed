//! Liveness evaluation from the latest block's age

use std::time::{SystemTime, UNIX_EPOCH};

use sbch_types::Block;

use crate::backend::{BackendResult, BackendService};
use crate::response::HealthReport;
use crate::types::format_u64;

/// Maximum block age, in seconds, used when the caller passes zero
pub const DEFAULT_LATEST_BLOCK_TOO_OLD_AGE: u64 = 30;

/// Requested max age, or `fallback` when the caller passed zero
///
/// A zero `fallback` falls back again to [`DEFAULT_LATEST_BLOCK_TOO_OLD_AGE`],
/// so the result is never zero.
pub fn effective_max_age(requested: u64, fallback: u64) -> u64 {
    match (requested, fallback) {
        (0, 0) => DEFAULT_LATEST_BLOCK_TOO_OLD_AGE,
        (0, fallback) => fallback,
        (requested, _) => requested,
    }
}

/// Evaluate the backend's current block against the wall clock
pub fn evaluate(backend: &dyn BackendService, max_age: u64) -> HealthReport {
    evaluate_at(backend.current_block(), unix_now(), max_age)
}

/// Evaluate a block lookup result at time `now` (unix seconds)
pub fn evaluate_at(block: BackendResult<Block>, now: i64, max_age: u64) -> HealthReport {
    let block = match block {
        Ok(block) => block,
        Err(e) => {
            return HealthReport {
                latest_block_height: format_u64(0),
                latest_block_timestamp: format_u64(0),
                ok: false,
                error: e.to_string(),
            }
        }
    };

    let age = now.saturating_sub(block.timestamp);
    let max_age = i64::try_from(max_age).unwrap_or(i64::MAX);
    let ok = age < max_age;

    HealthReport {
        latest_block_height: format_u64(block.number),
        latest_block_timestamp: format_u64(block.timestamp.max(0) as u64),
        ok,
        error: if ok {
            String::new()
        } else {
            format!("latest block is too old: {}s", age)
        },
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
