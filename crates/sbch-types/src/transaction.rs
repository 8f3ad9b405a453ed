//! Indexed transaction records, signatures, logs and internal calls

use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};

/// `TxRecord::status` for a failed transaction
pub const TX_STATUS_FAILED: u64 = 0;
/// `TxRecord::status` for a successful transaction
pub const TX_STATUS_SUCCESS: u64 = 1;

/// Transaction as stored in the node's transaction index, receipt included
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRecord {
    /// Transaction hash
    pub hash: H256,
    /// Position within the block
    pub transaction_index: u64,
    /// Sender nonce
    pub nonce: u64,
    /// Containing block hash
    pub block_hash: H256,
    /// Containing block height
    pub block_number: u64,
    /// Sender
    pub from: H160,
    /// Recipient; zero for contract creation
    pub to: H160,
    /// Transferred value
    pub value: U256,
    /// Gas price
    pub gas_price: U256,
    /// Gas limit
    pub gas: u64,
    /// Call data
    #[serde(with = "hex::serde", default)]
    pub input: Vec<u8>,
    /// Gas used in the block up to and including this transaction
    pub cumulative_gas_used: u64,
    /// Gas used by this transaction
    pub gas_used: u64,
    /// Created contract; zero unless this is a creation
    #[serde(default)]
    pub contract_address: H160,
    /// Emitted logs
    #[serde(default)]
    pub logs: Vec<EvmLog>,
    /// 256-byte logs bloom
    #[serde(with = "hex::serde", default)]
    pub logs_bloom: Vec<u8>,
    /// `TX_STATUS_SUCCESS` or `TX_STATUS_FAILED`
    pub status: u64,
    /// Human readable status ("success", "revert", ...)
    #[serde(default)]
    pub status_str: String,
    /// Return data of the top-level call
    #[serde(with = "hex::serde", default)]
    pub out_data: Vec<u8>,
    /// Internal calls in the order the EVM entered them
    #[serde(default)]
    pub internal_tx_calls: Vec<InternalTxCall>,
    /// Internal call results in the order the calls completed
    #[serde(default)]
    pub internal_tx_returns: Vec<InternalTxReturn>,
}

impl TxRecord {
    /// True if this transaction created a contract
    pub fn is_creation(&self) -> bool {
        self.to.is_zero()
    }

    /// True if the transaction executed successfully
    pub fn is_success(&self) -> bool {
        self.status == TX_STATUS_SUCCESS
    }
}

/// Recoverable secp256k1 signature (`r || s || recovery_id`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature {
    /// R component
    pub r: H256,
    /// S component
    pub s: H256,
    /// Recovery id (0 or 1)
    pub v: u8,
}

impl TxSignature {
    /// Encoded length
    pub const LEN: usize = 65;

    /// Decode from the 65-byte layout used by the index
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::LEN {
            return None;
        }
        Some(Self {
            r: H256::from_slice(&bytes[0..32]),
            s: H256::from_slice(&bytes[32..64]),
            v: bytes[64],
        })
    }

    /// Encode to the 65-byte layout
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0..32].copy_from_slice(self.r.as_bytes());
        out[32..64].copy_from_slice(self.s.as_bytes());
        out[64] = self.v;
        out
    }

    /// Legacy `v` value (recovery id + 27)
    pub fn legacy_v(&self) -> u64 {
        self.v as u64 + 27
    }
}

/// Log entry as stored by the log index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmLog {
    /// Emitting contract
    pub address: H160,
    /// Indexed topics
    #[serde(default)]
    pub topics: Vec<H256>,
    /// Non-indexed data
    #[serde(with = "hex::serde", default)]
    pub data: Vec<u8>,
    /// Containing block height
    pub block_number: u64,
    /// Emitting transaction
    pub tx_hash: H256,
    /// Emitting transaction's position in the block
    pub tx_index: u64,
    /// Containing block hash
    pub block_hash: H256,
    /// Position of the log in the block
    pub index: u64,
    /// Removed by a reorg
    #[serde(default)]
    pub removed: bool,
}

/// Call kind of an internal call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// CALL
    Call,
    /// DELEGATECALL
    DelegateCall,
    /// CALLCODE
    CallCode,
    /// CREATE
    Create,
    /// CREATE2
    Create2,
}

impl CallKind {
    /// Decode the numeric kind recorded by the EVM
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CallKind::Call),
            1 => Some(CallKind::DelegateCall),
            2 => Some(CallKind::CallCode),
            3 => Some(CallKind::Create),
            4 => Some(CallKind::Create2),
            _ => None,
        }
    }

    /// Lowercase opcode name
    pub fn name(&self) -> &'static str {
        match self {
            CallKind::Call => "call",
            CallKind::DelegateCall => "delegatecall",
            CallKind::CallCode => "callcode",
            CallKind::Create => "create",
            CallKind::Create2 => "create2",
        }
    }

    /// True for CREATE and CREATE2
    pub fn is_create(&self) -> bool {
        matches!(self, CallKind::Create | CallKind::Create2)
    }
}

/// Name of an EVM execution status code
pub fn evm_status_name(code: i32) -> &'static str {
    match code {
        0 => "success",
        1 => "failure",
        2 => "revert",
        3 => "out-of-gas",
        4 => "invalid-instruction",
        5 => "undefined-instruction",
        6 => "stack-overflow",
        7 => "stack-underflow",
        8 => "bad-jump-destination",
        9 => "invalid-memory-access",
        10 => "call-depth-exceeded",
        11 => "static-mode-violation",
        12 => "precompile-failure",
        13 => "contract-validation-failure",
        14 => "argument-out-of-range",
        -1 => "internal-error",
        -2 => "rejected",
        -3 => "out-of-memory",
        _ => "unknown",
    }
}

/// Entry of an internal call, recorded when the EVM starts it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalTxCall {
    /// Numeric call kind, see [`CallKind::from_code`]
    pub kind: i32,
    /// EVM message flags (bit 0 = static)
    #[serde(default)]
    pub flags: u32,
    /// Call depth; the transaction's own call is depth 0
    pub depth: i32,
    /// Gas made available to the call
    pub gas: i64,
    /// Caller
    pub sender: H160,
    /// Callee
    pub destination: H160,
    /// Transferred value
    #[serde(default)]
    pub value: U256,
    /// Call data
    #[serde(with = "hex::serde", default)]
    pub input: Vec<u8>,
}

/// Exit of an internal call, recorded when the call completes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalTxReturn {
    /// EVM status code, see [`evm_status_name`]
    pub status_code: i32,
    /// Gas left when the call returned
    pub gas_left: i64,
    /// Return data
    #[serde(with = "hex::serde", default)]
    pub output: Vec<u8>,
    /// Address created by CREATE/CREATE2, zero otherwise
    #[serde(default)]
    pub create_address: H160,
}
