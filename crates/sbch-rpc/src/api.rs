//! The `sbch_*` query facade
//!
//! Each operation resolves its heights, asks the backend once and shapes the
//! answer. Nothing is cached between calls and no call is retried.

use std::sync::Arc;

use primitive_types::{H160, H256};
use sbch_types::{BlockNumber, BlockNumberOrHash, CcEpoch, Epoch};
use serde_json::Value;

use crate::backend::BackendService;
use crate::error::{RpcError, RpcResult};
use crate::health::{self, DEFAULT_LATEST_BLOCK_TOO_OLD_AGE};
use crate::range::{self, HeightRange};
use crate::response::{
    HealthReport, RpcCallDetail, RpcCcEpoch, RpcLog, RpcReceipt, RpcTransaction, StakingEpoch,
};
use crate::shape;
use crate::types::CallArgs;

/// Number of epochs listed when the caller leaves the end bound at zero
pub const DEFAULT_EPOCH_WINDOW: u64 = 10;

/// Facade settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    /// Block age, in seconds, past which `sbch_healthCheck` reports unhealthy
    pub latest_block_too_old_age: u64,
    /// Epochs listed by `sbch_getEpochs*`/`sbch_getCCEpochs*` when `end` is zero
    pub epoch_window: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            latest_block_too_old_age: DEFAULT_LATEST_BLOCK_TOO_OLD_AGE,
            epoch_window: DEFAULT_EPOCH_WINDOW,
        }
    }
}

/// Direction token of the address counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressCountKind {
    /// Sent by the address
    From,
    /// Received by the address
    To,
    /// Sent plus received
    Both,
}

impl AddressCountKind {
    /// Parse `from`, `to` or `both`
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "from" => Some(AddressCountKind::From),
            "to" => Some(AddressCountKind::To),
            "both" => Some(AddressCountKind::Both),
            _ => None,
        }
    }
}

/// The `sbch_*` operations over a backend
pub struct SbchApi {
    backend: Arc<dyn BackendService>,
    config: ApiConfig,
}

impl SbchApi {
    /// Create a facade with default settings
    pub fn new(backend: Arc<dyn BackendService>) -> Self {
        Self::with_config(backend, ApiConfig::default())
    }

    /// Create a facade with the given settings
    pub fn with_config(backend: Arc<dyn BackendService>, config: ApiConfig) -> Self {
        Self { backend, config }
    }

    /// Settings in use
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The backend queries are sent to
    pub fn backend(&self) -> &Arc<dyn BackendService> {
        &self.backend
    }

    /// sbch_getStandbyTxQueue - not implemented
    pub fn get_standby_tx_queue(&self) -> RpcResult<Value> {
        tracing::debug!("sbch_getStandbyTxQueue");
        Err(RpcError::NotImplemented("sbch_getStandbyTxQueue"))
    }

    /// sbch_queryTxBySrc - transactions sent by `addr` between two heights
    pub fn query_tx_by_src(
        &self,
        addr: H160,
        start: BlockNumber,
        end: BlockNumber,
        limit: u64,
    ) -> RpcResult<Vec<RpcTransaction>> {
        tracing::debug!("sbch_queryTxBySrc");
        let range = self.height_range(start, end);
        let (txs, sigs) = self
            .backend
            .query_tx_by_src(addr, range.start, range.end, narrow_limit(limit))?;
        Ok(shape::txs_to_rpc_resp(&txs, &sigs))
    }

    /// sbch_queryTxByDst - transactions received by `addr` between two heights
    pub fn query_tx_by_dst(
        &self,
        addr: H160,
        start: BlockNumber,
        end: BlockNumber,
        limit: u64,
    ) -> RpcResult<Vec<RpcTransaction>> {
        tracing::debug!("sbch_queryTxByDst");
        let range = self.height_range(start, end);
        let (txs, sigs) = self
            .backend
            .query_tx_by_dst(addr, range.start, range.end, narrow_limit(limit))?;
        Ok(shape::txs_to_rpc_resp(&txs, &sigs))
    }

    /// sbch_queryTxByAddr - transactions sent or received by `addr` between two heights
    pub fn query_tx_by_addr(
        &self,
        addr: H160,
        start: BlockNumber,
        end: BlockNumber,
        limit: u64,
    ) -> RpcResult<Vec<RpcTransaction>> {
        tracing::debug!("sbch_queryTxByAddr");
        let range = self.height_range(start, end);
        let (txs, sigs) = self
            .backend
            .query_tx_by_addr(addr, range.start, range.end, narrow_limit(limit))?;
        Ok(shape::txs_to_rpc_resp(&txs, &sigs))
    }

    /// sbch_queryLogs - logs of `addr` matching `topics`
    ///
    /// Heights pass through as given once `latest` is resolved.
    pub fn query_logs(
        &self,
        addr: H160,
        topics: &[H256],
        start: BlockNumber,
        end: BlockNumber,
        limit: u64,
    ) -> RpcResult<Vec<RpcLog>> {
        tracing::debug!("sbch_queryLogs");
        let (start, end) = range::resolve_log_range(self.backend.as_ref(), start, end);
        let logs = self
            .backend
            .query_logs(addr, topics, start, end, narrow_limit(limit))?;
        Ok(shape::to_rpc_logs(&logs))
    }

    /// sbch_getTxListByHeight - receipts of every transaction in a block
    pub fn get_tx_list_by_height(&self, height: BlockNumber) -> RpcResult<Vec<RpcReceipt>> {
        tracing::debug!("sbch_getTxListByHeight");
        self.tx_list(height, 0, 0)
    }

    /// sbch_getTxListByHeightWithRange - receipts of transactions `start..end` of a block
    ///
    /// `end == 0` means up to the last transaction.
    pub fn get_tx_list_by_height_with_range(
        &self,
        height: BlockNumber,
        start: u64,
        end: u64,
    ) -> RpcResult<Vec<RpcReceipt>> {
        tracing::debug!("sbch_getTxListByHeightWithRange");
        self.tx_list(height, start, end)
    }

    /// sbch_getAddressCount - number of transactions touching `addr`
    pub fn get_address_count(&self, kind: &str, addr: H160) -> u64 {
        tracing::debug!("sbch_getAddressCount");
        sum_counters(
            kind,
            || self.backend.from_address_count(addr),
            || self.backend.to_address_count(addr),
        )
    }

    /// sbch_getSep20AddressCount - number of `contract` token transfers touching `addr`
    pub fn get_sep20_address_count(&self, kind: &str, contract: H160, addr: H160) -> u64 {
        tracing::debug!("sbch_getSep20AddressCount");
        sum_counters(
            kind,
            || self.backend.sep20_from_address_count(contract, addr),
            || self.backend.sep20_to_address_count(contract, addr),
        )
    }

    /// sbch_getEpochs - staking epochs as stored
    pub fn get_epochs(&self, start: u64, end: u64) -> RpcResult<Vec<Epoch>> {
        tracing::debug!("sbch_getEpochs");
        let (start, end) = range::epoch_window(start, end, self.config.epoch_window);
        Ok(self.backend.epochs(start, end)?)
    }

    /// sbch_getEpochs2 - staking epochs, recast
    pub fn get_epochs2(&self, start: u64, end: u64) -> RpcResult<Vec<StakingEpoch>> {
        tracing::debug!("sbch_getEpochs2");
        let (start, end) = range::epoch_window(start, end, self.config.epoch_window);
        let epochs = self.backend.epochs(start, end)?;
        Ok(shape::cast_staking_epochs(&epochs))
    }

    /// sbch_getCurrEpoch - epoch in progress, numbered by the validator snapshot
    pub fn get_curr_epoch(&self) -> StakingEpoch {
        tracing::debug!("sbch_getCurrEpoch");
        let mut epoch = self.backend.curr_epoch();
        epoch.number = self.backend.validators_info().curr_epoch_num;
        shape::cast_staking_epoch(&epoch)
    }

    /// sbch_getCCEpochs - cross-chain epochs as stored
    pub fn get_cc_epochs(&self, start: u64, end: u64) -> RpcResult<Vec<CcEpoch>> {
        tracing::debug!("sbch_getCCEpochs");
        let (start, end) = range::epoch_window(start, end, self.config.epoch_window);
        Ok(self.backend.cc_epochs(start, end)?)
    }

    /// sbch_getCCEpochs2 - cross-chain epochs, recast
    pub fn get_cc_epochs2(&self, start: u64, end: u64) -> RpcResult<Vec<RpcCcEpoch>> {
        tracing::debug!("sbch_getCCEpochs2");
        let (start, end) = range::epoch_window(start, end, self.config.epoch_window);
        let epochs = self.backend.cc_epochs(start, end)?;
        Ok(shape::cast_cc_epochs(&epochs))
    }

    /// sbch_healthCheck - whether the latest block is younger than `max_age` seconds
    pub fn health_check(&self, max_age: u64) -> HealthReport {
        tracing::debug!("sbch_healthCheck");
        let max_age = health::effective_max_age(max_age, self.config.latest_block_too_old_age);
        health::evaluate(self.backend.as_ref(), max_age)
    }

    /// sbch_getTransactionReceipt - receipt by hash, `None` if the lookup fails
    pub fn get_transaction_receipt(&self, hash: H256) -> Option<RpcReceipt> {
        tracing::debug!("sbch_getTransactionReceipt");
        match self.backend.get_transaction(hash) {
            Ok((tx, _sig)) => Some(shape::tx_to_receipt(&tx)),
            Err(e) => {
                tracing::debug!(tx_hash = ?hash, error = %e, "receipt lookup failed");
                None
            }
        }
    }

    /// sbch_call - execute a call with tracing at the referenced block
    pub fn call(&self, args: CallArgs, block: BlockNumberOrHash) -> RpcResult<RpcCallDetail> {
        tracing::debug!("sbch_call");
        let (from, tx) = args.into_call_tx();
        let height = self.backend.resolve_height(&block)?;
        let detail = self.backend.call2(&tx, from, height);
        Ok(shape::to_rpc_call_detail(&detail))
    }

    /// sbch_validatorsInfo - validator snapshot as opaque JSON
    pub fn validators_info(&self) -> RpcResult<Value> {
        tracing::debug!("sbch_validatorsInfo");
        Ok(serde_json::to_value(self.backend.validators_info())?)
    }

    fn height_range(&self, start: BlockNumber, end: BlockNumber) -> HeightRange {
        range::prepare_height_range(self.backend.as_ref(), start, end)
    }

    fn tx_list(&self, height: BlockNumber, start: u64, end: u64) -> RpcResult<Vec<RpcReceipt>> {
        let height = range::resolve_index_height(self.backend.as_ref(), height);
        let start = usize::try_from(start).unwrap_or(usize::MAX);
        let end = match end {
            0 => None,
            n => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        };
        let (txs, _sigs) = self.backend.tx_list_by_height_with_range(height, start, end)?;
        Ok(shape::txs_to_receipts(&txs))
    }
}

fn narrow_limit(limit: u64) -> u32 {
    u32::try_from(limit).unwrap_or(u32::MAX)
}

fn sum_counters<F, T>(kind: &str, from: F, to: T) -> u64
where
    F: FnOnce() -> i64,
    T: FnOnce() -> i64,
{
    let clamp = |n: i64| n.max(0) as u64;
    match AddressCountKind::parse(kind) {
        Some(AddressCountKind::From) => clamp(from()),
        Some(AddressCountKind::To) => clamp(to()),
        Some(AddressCountKind::Both) => clamp(from()).saturating_add(clamp(to())),
        None => {
            tracing::debug!(kind, "unrecognized address count kind");
            0
        }
    }
}
