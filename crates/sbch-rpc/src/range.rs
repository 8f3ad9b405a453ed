//! Height range resolution
//!
//! Callers pass inclusive bounds that may be symbolic (`latest`) and may be
//! reversed. The backend index wants absolute, half-open `u32` bounds whose
//! order encodes the scan direction, so one side has to be bumped:
//!
//! * ascending or equal input `[s, e]` becomes `[s, e + 1)`;
//! * reversed input (`s > e`) becomes `(s + 1, e)`, which the index reads as
//!   `[e, s + 1)` scanned downwards.
//!
//! Both cases keep the caller's endpoints inclusive.

use sbch_types::BlockNumber;

use crate::backend::BackendService;

/// Absolute height bounds in the index convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeightRange {
    /// First bound passed to the index
    pub start: u32,
    /// Second bound passed to the index
    pub end: u32,
}

impl HeightRange {
    /// True if the index will scan from high to low heights
    pub fn is_descending(&self) -> bool {
        self.start > self.end
    }

    /// Number of heights covered
    pub fn width(&self) -> u32 {
        self.start.abs_diff(self.end)
    }
}

/// Turn inclusive bounds into index bounds, bumping the side that keeps them inclusive
pub fn to_half_open(start: u64, end: u64) -> HeightRange {
    let start = narrow(start);
    let end = narrow(end);
    if start > end {
        HeightRange {
            start: start.saturating_add(1),
            end,
        }
    } else {
        HeightRange {
            start,
            end: end.saturating_add(1),
        }
    }
}

/// Replace a symbolic height with an absolute one; the tip is looked up on every call
pub fn resolve_block_number(backend: &dyn BackendService, number: BlockNumber) -> u64 {
    match number {
        BlockNumber::Number(n) => n,
        BlockNumber::Earliest => 0,
        BlockNumber::Latest | BlockNumber::Pending => backend.latest_height(),
    }
}

/// Resolve symbolic bounds and convert them to index bounds
pub fn prepare_height_range(
    backend: &dyn BackendService,
    start: BlockNumber,
    end: BlockNumber,
) -> HeightRange {
    let start = resolve_block_number(backend, start);
    let end = resolve_block_number(backend, end);
    to_half_open(start, end)
}

/// Resolve a single height to the index's `u32` width
pub fn resolve_index_height(backend: &dyn BackendService, number: BlockNumber) -> u32 {
    narrow(resolve_block_number(backend, number))
}

/// Resolve symbolic bounds only; log queries take the caller's bounds as they are
pub fn resolve_log_range(
    backend: &dyn BackendService,
    start: BlockNumber,
    end: BlockNumber,
) -> (u32, u32) {
    (
        resolve_index_height(backend, start),
        resolve_index_height(backend, end),
    )
}

/// Epoch listing bounds: `end == 0` asks for `window` epochs from `start`
pub fn epoch_window(start: u64, end: u64, window: u64) -> (u64, u64) {
    if end == 0 {
        (start, start.saturating_add(window))
    } else {
        (start, end)
    }
}

fn narrow(height: u64) -> u32 {
    u32::try_from(height).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use proptest::prelude::*;

    #[test]
    fn test_ascending_bumps_end() {
        assert_eq!(to_half_open(10, 20), HeightRange { start: 10, end: 21 });
    }

    #[test]
    fn test_descending_bumps_start() {
        let range = to_half_open(20, 10);
        assert_eq!(range, HeightRange { start: 21, end: 10 });
        assert!(range.is_descending());
        assert_eq!(range.width(), 11);
    }

    #[test]
    fn test_equal_bounds_cover_one_height() {
        let range = to_half_open(7, 7);
        assert_eq!(range, HeightRange { start: 7, end: 8 });
        assert_eq!(range.width(), 1);
        assert!(!range.is_descending());
    }

    #[test]
    fn test_zero_zero() {
        assert_eq!(to_half_open(0, 0), HeightRange { start: 0, end: 1 });
    }

    #[test]
    fn test_saturates_at_u32_max() {
        let max = u32::MAX as u64;
        assert_eq!(to_half_open(0, max), HeightRange { start: 0, end: u32::MAX });
        assert_eq!(to_half_open(max + 10, 5).start, u32::MAX);
    }

    #[test]
    fn test_latest_substituted_on_both_sides() {
        let backend = MemoryBackend::with_latest_height(500);
        let range = prepare_height_range(&backend, BlockNumber::Number(100), BlockNumber::Latest);
        assert_eq!(range, HeightRange { start: 100, end: 501 });

        let range = prepare_height_range(&backend, BlockNumber::Latest, BlockNumber::Number(100));
        assert_eq!(range, HeightRange { start: 501, end: 100 });

        let range = prepare_height_range(&backend, BlockNumber::Latest, BlockNumber::Latest);
        assert_eq!(range, HeightRange { start: 500, end: 501 });
    }

    #[test]
    fn test_latest_is_a_snapshot_per_call() {
        let backend = MemoryBackend::with_latest_height(10);
        let first = prepare_height_range(&backend, BlockNumber::Number(0), BlockNumber::Latest);
        backend.set_latest_height(20);
        let second = prepare_height_range(&backend, BlockNumber::Number(0), BlockNumber::Latest);
        assert_eq!(first.end, 11);
        assert_eq!(second.end, 21);
    }

    #[test]
    fn test_pending_and_earliest() {
        let backend = MemoryBackend::with_latest_height(42);
        assert_eq!(resolve_block_number(&backend, BlockNumber::Pending), 42);
        assert_eq!(resolve_block_number(&backend, BlockNumber::Earliest), 0);
    }

    #[test]
    fn test_log_range_has_no_increment() {
        let backend = MemoryBackend::with_latest_height(300);
        assert_eq!(
            resolve_log_range(&backend, BlockNumber::Number(5), BlockNumber::Latest),
            (5, 300)
        );
        assert_eq!(
            resolve_log_range(&backend, BlockNumber::Number(9), BlockNumber::Number(2)),
            (9, 2)
        );
    }

    #[test]
    fn test_epoch_window_default() {
        assert_eq!(epoch_window(5, 0, 10), (5, 15));
        assert_eq!(epoch_window(5, 8, 10), (5, 8));
        assert_eq!(epoch_window(u64::MAX, 0, 10), (u64::MAX, u64::MAX));
    }

    proptest! {
        #[test]
        fn prop_reversed_input_bumps_start_only(
            end in 0u64..u32::MAX as u64 - 1,
            gap in 1u64..1_000_000u64,
        ) {
            let start = (end + gap).min(u32::MAX as u64 - 1);
            prop_assume!(start > end);
            let range = to_half_open(start, end);
            prop_assert_eq!(range.start as u64, start + 1);
            prop_assert_eq!(range.end as u64, end);
        }

        #[test]
        fn prop_ordered_input_bumps_end_only(
            start in 0u64..u32::MAX as u64 - 1,
            gap in 0u64..1_000_000u64,
        ) {
            let end = (start + gap).min(u32::MAX as u64 - 1);
            let range = to_half_open(start, end);
            prop_assert_eq!(range.start as u64, start);
            prop_assert_eq!(range.end as u64, end + 1);
            prop_assert!(range.start < range.end);
        }

        #[test]
        fn prop_width_counts_both_endpoints(
            a in 0u64..u32::MAX as u64 - 1,
            b in 0u64..u32::MAX as u64 - 1,
        ) {
            let range = to_half_open(a, b);
            prop_assert_eq!(range.width() as u64, a.abs_diff(b) + 1);
        }
    }
}
