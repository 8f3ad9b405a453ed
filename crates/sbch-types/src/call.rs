//! Simulated call input and the backend's raw execution trace

use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};

use crate::transaction::{InternalTxCall, InternalTxReturn};

/// Gas limit used for a simulated call when the caller gives none
pub const DEFAULT_CALL_GAS: u64 = 10_000_000;

/// Unsigned transaction built from call arguments and handed to the executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTx {
    /// Callee; `None` simulates a contract creation
    pub to: Option<H160>,
    /// Transferred value
    pub value: U256,
    /// Gas limit
    pub gas: u64,
    /// Gas price
    pub gas_price: U256,
    /// Call data
    #[serde(with = "hex::serde", default)]
    pub data: Vec<u8>,
    /// Nonce; zero unless the caller pins one
    #[serde(default)]
    pub nonce: u64,
}

impl Default for CallTx {
    fn default() -> Self {
        Self {
            to: None,
            value: U256::zero(),
            gas: DEFAULT_CALL_GAS,
            gas_price: U256::zero(),
            data: Vec::new(),
            nonce: 0,
        }
    }
}

/// Log emitted during a simulated call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    /// Emitting contract
    pub address: H160,
    /// Indexed topics
    #[serde(default)]
    pub topics: Vec<H256>,
    /// Non-indexed data
    #[serde(with = "hex::serde", default)]
    pub data: Vec<u8>,
}

/// Raw result of a traced call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDetail {
    /// EVM status code of the top-level call
    pub status: i32,
    /// Gas consumed
    pub gas_used: u64,
    /// Return data
    #[serde(with = "hex::serde", default)]
    pub out_data: Vec<u8>,
    /// Emitted logs
    #[serde(default)]
    pub logs: Vec<CallLog>,
    /// Created contract, zero unless the call was a creation
    #[serde(default)]
    pub created_contract_address: H160,
    /// Internal calls in entry order
    #[serde(default)]
    pub internal_tx_calls: Vec<InternalTxCall>,
    /// Internal call results in completion order
    #[serde(default)]
    pub internal_tx_returns: Vec<InternalTxReturn>,
    /// State touched by the call
    #[serde(default)]
    pub rw_lists: Option<RwLists>,
}

/// Read and write sets recorded while executing a call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RwLists {
    /// Creation counters read
    pub creation_counter_r_list: Vec<CreationCounterOp>,
    /// Creation counters written
    pub creation_counter_w_list: Vec<CreationCounterOp>,
    /// Accounts read
    pub account_r_list: Vec<AccountOp>,
    /// Accounts written
    pub account_w_list: Vec<AccountOp>,
    /// Bytecode read
    pub bytecode_r_list: Vec<BytecodeOp>,
    /// Bytecode written
    pub bytecode_w_list: Vec<BytecodeOp>,
    /// Storage slots read
    pub storage_r_list: Vec<StorageOp>,
    /// Storage slots written
    pub storage_w_list: Vec<StorageOp>,
    /// Block hashes read
    pub block_hash_list: Vec<BlockHashOp>,
}

/// Creation counter access
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationCounterOp {
    /// Lowest address byte the counter is sharded by
    pub lsb: u8,
    /// Counter value
    pub counter: u64,
}

/// Account access
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOp {
    /// Account
    pub addr: H160,
    /// Nonce
    pub nonce: u64,
    /// Balance
    pub balance: U256,
}

/// Bytecode access
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BytecodeOp {
    /// Contract
    pub addr: H160,
    /// Code
    #[serde(with = "hex::serde", default)]
    pub bytecode: Vec<u8>,
}

/// Storage slot access
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageOp {
    /// Contract sequence number in the state store
    pub seq: u64,
    /// Slot key
    pub key: H256,
    /// Slot value
    #[serde(with = "hex::serde", default)]
    pub value: Vec<u8>,
}

/// Block hash lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHashOp {
    /// Height looked up
    pub height: u64,
    /// Hash returned
    pub hash: H256,
}
