//! In-memory backend over a chain snapshot
//!
//! Serves the facade from plain vectors, honoring the same range and limit
//! conventions as the node's indexes. Used by the mock node and as the test
//! double; every fallible call can be made to fail with a chosen error.

use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use primitive_types::{H160, H256};
use sbch_types::{
    Block, CallDetail, CallTx, CcEpoch, Epoch, EvmLog, TxRecord, TxSignature, ValidatorsInfo,
};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, BackendResult, BackendService, TxsWithSigs};

/// Indexed transaction with its signature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTxRecord {
    /// Transaction and receipt data
    #[serde(flatten)]
    pub tx: TxRecord,
    /// Signature
    #[serde(default)]
    pub signature: TxSignature,
}

/// One SEP-20 transfer, as counted by the token counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sep20Transfer {
    /// Token contract
    pub contract: H160,
    /// Sender
    pub from: H160,
    /// Recipient
    pub to: H160,
}

/// Everything the in-memory backend knows about the chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChainSnapshot {
    /// Tip height; defaults to the highest block or transaction height
    pub latest_height: Option<u64>,
    /// Blocks
    pub blocks: Vec<Block>,
    /// Transactions with signatures; their logs feed the log index
    pub transactions: Vec<SignedTxRecord>,
    /// SEP-20 transfers
    pub sep20_transfers: Vec<Sep20Transfer>,
    /// Closed staking epochs
    pub epochs: Vec<Epoch>,
    /// Cross-chain epochs
    pub cc_epochs: Vec<CcEpoch>,
    /// Validator snapshot; its `currEpoch` is the epoch in progress
    pub validators_info: ValidatorsInfo,
    /// Result returned by every simulated call
    pub call_result: CallDetail,
}

impl ChainSnapshot {
    fn tip(&self) -> u64 {
        self.latest_height.unwrap_or_else(|| {
            let blocks = self.blocks.iter().map(|b| b.number);
            let txs = self.transactions.iter().map(|t| t.tx.block_number);
            blocks.chain(txs).max().unwrap_or(0)
        })
    }
}

/// Arguments of the last simulated call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Transaction
    pub tx: CallTx,
    /// Sender
    pub from: H160,
    /// Height the call executed at
    pub height: u64,
}

/// Backend serving a [`ChainSnapshot`] from memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: RwLock<ChainSnapshot>,
    failure: RwLock<Option<BackendError>>,
    latency: RwLock<Duration>,
    last_call: Mutex<Option<RecordedCall>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend serving `snapshot`
    pub fn from_snapshot(snapshot: ChainSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            ..Default::default()
        }
    }

    /// Create an empty backend whose tip is at `height`
    pub fn with_latest_height(height: u64) -> Self {
        Self::from_snapshot(ChainSnapshot {
            latest_height: Some(height),
            ..Default::default()
        })
    }

    /// Move the tip
    pub fn set_latest_height(&self, height: u64) {
        self.snapshot.write().latest_height = Some(height);
    }

    /// Modify the snapshot in place
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut ChainSnapshot),
    {
        f(&mut *self.snapshot.write());
    }

    /// Make every fallible call fail with `err` until [`clear_failure`](Self::clear_failure)
    pub fn fail_with(&self, err: BackendError) {
        *self.failure.write() = Some(err);
    }

    /// Block the calling thread for `latency` on every lookup
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = latency;
    }

    /// Stop injecting failures
    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }

    /// Arguments of the most recent `call2`
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last_call.lock().clone()
    }

    fn stall(&self) {
        let latency = *self.latency.read();
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
    }

    fn check(&self) -> BackendResult<()> {
        self.stall();
        match self.failure.read().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn query_txs<P>(&self, start: u32, end: u32, limit: u32, pred: P) -> BackendResult<TxsWithSigs>
    where
        P: Fn(&TxRecord) -> bool,
    {
        self.check()?;
        let snapshot = self.snapshot.read();
        let (lo, hi) = (start.min(end) as u64, start.max(end) as u64);

        let mut hits: Vec<&SignedTxRecord> = snapshot
            .transactions
            .iter()
            .filter(|t| (lo..hi).contains(&t.tx.block_number) && pred(&t.tx))
            .collect();
        hits.sort_by_key(|t| (t.tx.block_number, t.tx.transaction_index));
        if start > end {
            hits.reverse();
        }
        if limit > 0 {
            hits.truncate(limit as usize);
        }

        Ok(hits.into_iter().map(|t| (t.tx.clone(), t.signature)).unzip())
    }
}

impl BackendService for MemoryBackend {
    fn latest_height(&self) -> u64 {
        self.stall();
        self.snapshot.read().tip()
    }

    fn current_block(&self) -> BackendResult<Block> {
        self.check()?;
        let snapshot = self.snapshot.read();
        let tip = snapshot.tip();
        snapshot
            .blocks
            .iter()
            .find(|b| b.number == tip)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("block {} not found", tip)))
    }

    fn block_by_hash(&self, hash: H256) -> BackendResult<Block> {
        self.check()?;
        self.snapshot
            .read()
            .blocks
            .iter()
            .find(|b| b.hash == hash)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("block {:?} not found", hash)))
    }

    fn get_transaction(&self, hash: H256) -> BackendResult<(TxRecord, TxSignature)> {
        self.check()?;
        self.snapshot
            .read()
            .transactions
            .iter()
            .find(|t| t.tx.hash == hash)
            .map(|t| (t.tx.clone(), t.signature))
            .ok_or_else(|| BackendError::NotFound("transaction not found".to_string()))
    }

    fn tx_list_by_height_with_range(
        &self,
        height: u32,
        start: usize,
        end: Option<usize>,
    ) -> BackendResult<TxsWithSigs> {
        self.check()?;
        let snapshot = self.snapshot.read();
        let mut txs: Vec<&SignedTxRecord> = snapshot
            .transactions
            .iter()
            .filter(|t| t.tx.block_number == height as u64)
            .collect();
        txs.sort_by_key(|t| t.tx.transaction_index);

        let end = end.unwrap_or(txs.len()).min(txs.len());
        let start = start.min(end);
        Ok(txs[start..end]
            .iter()
            .map(|t| (t.tx.clone(), t.signature))
            .unzip())
    }

    fn query_tx_by_src(
        &self,
        addr: H160,
        start: u32,
        end: u32,
        limit: u32,
    ) -> BackendResult<TxsWithSigs> {
        self.query_txs(start, end, limit, |tx| tx.from == addr)
    }

    fn query_tx_by_dst(
        &self,
        addr: H160,
        start: u32,
        end: u32,
        limit: u32,
    ) -> BackendResult<TxsWithSigs> {
        self.query_txs(start, end, limit, |tx| tx.to == addr)
    }

    fn query_tx_by_addr(
        &self,
        addr: H160,
        start: u32,
        end: u32,
        limit: u32,
    ) -> BackendResult<TxsWithSigs> {
        self.query_txs(start, end, limit, |tx| tx.from == addr || tx.to == addr)
    }

    fn query_logs(
        &self,
        addr: H160,
        topics: &[H256],
        start: u32,
        end: u32,
        limit: u32,
    ) -> BackendResult<Vec<EvmLog>> {
        self.check()?;
        let snapshot = self.snapshot.read();
        let (lo, hi) = (start.min(end) as u64, start.max(end) as u64);

        let mut logs: Vec<&EvmLog> = snapshot
            .transactions
            .iter()
            .flat_map(|t| t.tx.logs.iter())
            .filter(|log| {
                log.address == addr
                    && (lo..hi).contains(&log.block_number)
                    && log.topics.len() >= topics.len()
                    && topics.iter().zip(&log.topics).all(|(want, got)| want == got)
            })
            .collect();
        logs.sort_by_key(|log| (log.block_number, log.index));
        if start > end {
            logs.reverse();
        }
        if limit > 0 {
            logs.truncate(limit as usize);
        }
        Ok(logs.into_iter().cloned().collect())
    }

    fn from_address_count(&self, addr: H160) -> i64 {
        let snapshot = self.snapshot.read();
        snapshot.transactions.iter().filter(|t| t.tx.from == addr).count() as i64
    }

    fn to_address_count(&self, addr: H160) -> i64 {
        let snapshot = self.snapshot.read();
        snapshot.transactions.iter().filter(|t| t.tx.to == addr).count() as i64
    }

    fn sep20_from_address_count(&self, contract: H160, addr: H160) -> i64 {
        let snapshot = self.snapshot.read();
        snapshot
            .sep20_transfers
            .iter()
            .filter(|t| t.contract == contract && t.from == addr)
            .count() as i64
    }

    fn sep20_to_address_count(&self, contract: H160, addr: H160) -> i64 {
        let snapshot = self.snapshot.read();
        snapshot
            .sep20_transfers
            .iter()
            .filter(|t| t.contract == contract && t.to == addr)
            .count() as i64
    }

    fn epochs(&self, start: u64, end: u64) -> BackendResult<Vec<Epoch>> {
        self.check()?;
        Ok(self
            .snapshot
            .read()
            .epochs
            .iter()
            .filter(|e| e.number >= 0 && (start..end).contains(&(e.number as u64)))
            .cloned()
            .collect())
    }

    fn curr_epoch(&self) -> Epoch {
        self.snapshot.read().validators_info.curr_epoch.clone()
    }

    fn cc_epochs(&self, start: u64, end: u64) -> BackendResult<Vec<CcEpoch>> {
        self.check()?;
        Ok(self
            .snapshot
            .read()
            .cc_epochs
            .iter()
            .filter(|e| e.number >= 0 && (start..end).contains(&(e.number as u64)))
            .cloned()
            .collect())
    }

    fn validators_info(&self) -> ValidatorsInfo {
        self.snapshot.read().validators_info.clone()
    }

    fn call2(&self, tx: &CallTx, from: H160, height: u64) -> CallDetail {
        *self.last_call.lock() = Some(RecordedCall {
            tx: tx.clone(),
            from,
            height,
        });
        self.snapshot.read().call_result.clone()
    }
}
