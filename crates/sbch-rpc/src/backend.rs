//! Backend contract consumed by the facade
//!
//! Everything the `sbch_*` namespace knows about the chain comes through
//! [`BackendService`]. Calls are synchronous and may block; the facade
//! neither retries nor caches them.

use primitive_types::{H160, H256};
use sbch_types::{
    Block, BlockNumber, BlockNumberOrHash, CallDetail, CallTx, CcEpoch, Epoch, EvmLog, TxRecord,
    TxSignature, ValidatorsInfo,
};
use thiserror::Error;

/// Backend failure; its message is surfaced to callers unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Requested item is not (yet) indexed
    #[error("{0}")]
    NotFound(String),

    /// Backend cannot serve queries right now
    #[error("{0}")]
    Unavailable(String),

    /// Query was rejected or failed
    #[error("{0}")]
    Query(String),
}

impl BackendError {
    /// True for the not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }
}

/// Result type for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Transactions paired by position with their signatures
pub type TxsWithSigs = (Vec<TxRecord>, Vec<TxSignature>);

/// Chain data source behind the facade
///
/// Height ranges passed to the `query_*` methods are half-open over
/// `[min(start, end), max(start, end))`, scanned in descending order when
/// `start > end`. A `limit` of zero means no limit.
pub trait BackendService: Send + Sync {
    /// Height of the chain tip
    fn latest_height(&self) -> u64;

    /// Block at the chain tip
    fn current_block(&self) -> BackendResult<Block>;

    /// Block with the given hash
    fn block_by_hash(&self, hash: H256) -> BackendResult<Block>;

    /// Transaction and signature by hash
    fn get_transaction(&self, hash: H256) -> BackendResult<(TxRecord, TxSignature)>;

    /// Transactions of one block, `start..end` by position (`None` = to the last)
    fn tx_list_by_height_with_range(
        &self,
        height: u32,
        start: usize,
        end: Option<usize>,
    ) -> BackendResult<TxsWithSigs>;

    /// Transactions sent by `addr`
    fn query_tx_by_src(&self, addr: H160, start: u32, end: u32, limit: u32)
        -> BackendResult<TxsWithSigs>;

    /// Transactions received by `addr`
    fn query_tx_by_dst(&self, addr: H160, start: u32, end: u32, limit: u32)
        -> BackendResult<TxsWithSigs>;

    /// Transactions sent or received by `addr`
    fn query_tx_by_addr(&self, addr: H160, start: u32, end: u32, limit: u32)
        -> BackendResult<TxsWithSigs>;

    /// Logs emitted by `addr` matching `topics` positionally
    fn query_logs(
        &self,
        addr: H160,
        topics: &[H256],
        start: u32,
        end: u32,
        limit: u32,
    ) -> BackendResult<Vec<EvmLog>>;

    /// Number of transactions sent by `addr`
    fn from_address_count(&self, addr: H160) -> i64;

    /// Number of transactions received by `addr`
    fn to_address_count(&self, addr: H160) -> i64;

    /// Number of SEP-20 transfers of `contract` sent by `addr`
    fn sep20_from_address_count(&self, contract: H160, addr: H160) -> i64;

    /// Number of SEP-20 transfers of `contract` received by `addr`
    fn sep20_to_address_count(&self, contract: H160, addr: H160) -> i64;

    /// Staking epochs numbered `start..end`
    fn epochs(&self, start: u64, end: u64) -> BackendResult<Vec<Epoch>>;

    /// Staking epoch in progress
    fn curr_epoch(&self) -> Epoch;

    /// Cross-chain epochs numbered `start..end`
    fn cc_epochs(&self, start: u64, end: u64) -> BackendResult<Vec<CcEpoch>>;

    /// Validator set and staking snapshot
    fn validators_info(&self) -> ValidatorsInfo;

    /// Execute `tx` from `from` against the state at `height`, with tracing
    fn call2(&self, tx: &CallTx, from: H160, height: u64) -> CallDetail;

    /// Absolute height of a block reference
    fn resolve_height(&self, block: &BlockNumberOrHash) -> BackendResult<u64> {
        match block {
            BlockNumberOrHash::Number(BlockNumber::Number(n)) => Ok(*n),
            BlockNumberOrHash::Number(BlockNumber::Earliest) => Ok(0),
            BlockNumberOrHash::Number(_) => Ok(self.latest_height()),
            BlockNumberOrHash::Hash(hash) => Ok(self.block_by_hash(*hash)?.number),
        }
    }
}
