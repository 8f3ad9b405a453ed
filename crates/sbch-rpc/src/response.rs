//! Response shapes of the `sbch_*` namespace
//!
//! Quantities are hex strings, byte fields `0x`-prefixed hex, and absent
//! optional values serialize as `null` where clients expect the key to exist.

use serde::Serialize;

/// Transaction as returned by `sbch_queryTxBy*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    /// Block hash
    pub block_hash: String,
    /// Block number
    pub block_number: String,
    /// From address
    pub from: String,
    /// Gas limit
    pub gas: String,
    /// Gas price
    pub gas_price: String,
    /// Transaction hash
    pub hash: String,
    /// Input data
    pub input: String,
    /// Nonce
    pub nonce: String,
    /// To address (null for contract creation)
    pub to: Option<String>,
    /// Transaction index
    pub transaction_index: String,
    /// Value
    pub value: String,
    /// V
    pub v: String,
    /// R
    pub r: String,
    /// S
    pub s: String,
}

/// Receipt as returned by `sbch_getTransactionReceipt` and `sbch_getTxListByHeight*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    /// Transaction hash
    pub transaction_hash: String,
    /// Transaction index
    pub transaction_index: String,
    /// Block hash
    pub block_hash: String,
    /// Block number
    pub block_number: String,
    /// From address
    pub from: String,
    /// To address (null for contract creation)
    pub to: Option<String>,
    /// Cumulative gas used
    pub cumulative_gas_used: String,
    /// Gas used
    pub gas_used: String,
    /// Contract address (null unless a contract was created)
    pub contract_address: Option<String>,
    /// Logs
    pub logs: Vec<RpcLog>,
    /// Logs bloom
    pub logs_bloom: String,
    /// Status (1 = success, 0 = failure)
    pub status: String,
    /// Status name
    pub status_str: String,
    /// Return data
    pub out_data: String,
    /// Internal calls in execution order; empty, never absent
    pub internal_transactions: Vec<RpcInternalTx>,
}

/// RPC log representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    /// Log address
    pub address: String,
    /// Log topics
    pub topics: Vec<String>,
    /// Log data
    pub data: String,
    /// Block hash
    pub block_hash: String,
    /// Block number
    pub block_number: String,
    /// Transaction hash
    pub transaction_hash: String,
    /// Transaction index
    pub transaction_index: String,
    /// Log index
    pub log_index: String,
    /// Removed by a reorg
    pub removed: bool,
}

/// One internal call of a transaction or simulated call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcInternalTx {
    /// Call kind followed by the call's position in the call tree, e.g. `call_0_1`
    pub call_path: String,
    /// Caller
    pub from: String,
    /// Callee
    pub to: String,
    /// Gas made available
    pub gas: String,
    /// Gas consumed, when the call's result is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,
    /// Transferred value
    pub value: String,
    /// Call data
    pub input: String,
    /// Status name, when the call's result is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Return data, when the call's result is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Created contract, for successful creations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

/// Staking epoch with quantities spelled out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingEpoch {
    /// Epoch number
    pub number: String,
    /// First main-chain height
    pub start_height: String,
    /// Unix time the epoch closed
    pub end_time: i64,
    /// Nominations
    pub nominations: Vec<RpcNomination>,
}

/// Nomination count of one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcNomination {
    /// Validator consensus public key
    pub pubkey: String,
    /// Number of nominating main-chain blocks
    pub nominated_count: i64,
}

/// Cross-chain epoch with UTXO ids decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcCcEpoch {
    /// Epoch number
    pub number: String,
    /// First main-chain height
    pub start_height: String,
    /// Unix time the epoch closed
    pub end_time: i64,
    /// Transfers
    pub transfer_infos: Vec<RpcCcTransferInfo>,
}

/// Cross-chain transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcCcTransferInfo {
    /// Packed UTXO id as stored
    pub utxo: String,
    /// Main-chain transaction id (null if the UTXO id is malformed)
    pub txid: Option<String>,
    /// Main-chain output index (null if the UTXO id is malformed)
    pub vout: Option<u32>,
    /// Side-chain recipient
    pub receiver: String,
    /// Amount in satoshis
    pub amount: String,
}

/// Result of `sbch_call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcCallDetail {
    /// Status name
    pub status: String,
    /// Numeric EVM status
    pub status_code: i32,
    /// Gas consumed
    pub gas_used: String,
    /// Return data
    pub return_data: String,
    /// Emitted logs
    pub logs: Vec<RpcCallLog>,
    /// Created contract (null unless the call was a creation)
    pub contract_address: Option<String>,
    /// Internal calls in execution order
    pub internal_transactions: Vec<RpcInternalTx>,
    /// State touched by the call, when the executor recorded it
    pub rw_lists: Option<RpcRwLists>,
}

/// Log emitted by a simulated call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcCallLog {
    /// Emitting contract
    pub address: String,
    /// Topics
    pub topics: Vec<String>,
    /// Data
    pub data: String,
}

/// Read and write sets of a simulated call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRwLists {
    /// Creation counters read
    pub creation_counter_reads: Vec<RpcCreationCounterOp>,
    /// Creation counters written
    pub creation_counter_writes: Vec<RpcCreationCounterOp>,
    /// Accounts read
    pub account_reads: Vec<RpcAccountOp>,
    /// Accounts written
    pub account_writes: Vec<RpcAccountOp>,
    /// Bytecode read
    pub bytecode_reads: Vec<RpcBytecodeOp>,
    /// Bytecode written
    pub bytecode_writes: Vec<RpcBytecodeOp>,
    /// Storage read
    pub storage_reads: Vec<RpcStorageOp>,
    /// Storage written
    pub storage_writes: Vec<RpcStorageOp>,
    /// Block hashes read
    pub block_hashes: Vec<RpcBlockHashOp>,
}

/// Creation counter access
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcCreationCounterOp {
    /// Address shard byte
    pub lsb: u8,
    /// Counter
    pub counter: String,
}

/// Account access
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcAccountOp {
    /// Account
    pub address: String,
    /// Nonce
    pub nonce: String,
    /// Balance
    pub balance: String,
}

/// Bytecode access
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBytecodeOp {
    /// Contract
    pub address: String,
    /// Code
    pub bytecode: String,
}

/// Storage access
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcStorageOp {
    /// Contract sequence number
    pub seq: String,
    /// Slot key
    pub key: String,
    /// Slot value
    pub value: String,
}

/// Block hash lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlockHashOp {
    /// Height
    pub height: String,
    /// Hash
    pub hash: String,
}

/// Liveness report of `sbch_healthCheck`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Height of the latest block
    pub latest_block_height: String,
    /// Timestamp of the latest block
    pub latest_block_timestamp: String,
    /// Whether the latest block is fresh enough
    pub ok: bool,
    /// Diagnostic message, empty when healthy
    pub error: String,
}
