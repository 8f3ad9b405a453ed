//! Blocks and block references

use std::fmt;
use std::str::FromStr;

use primitive_types::{H160, H256};
use serde::{Deserialize, Serialize};

use crate::error::ParseBlockNumberError;

/// Block number as supplied by a caller: either absolute or a symbolic tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockNumber {
    /// Current chain tip
    #[default]
    Latest,
    /// Block under construction; resolved like `Latest`
    Pending,
    /// Genesis
    Earliest,
    /// Absolute height
    Number(u64),
}

impl From<u64> for BlockNumber {
    fn from(n: u64) -> Self {
        BlockNumber::Number(n)
    }
}

impl FromStr for BlockNumber {
    type Err = ParseBlockNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "latest" => Ok(BlockNumber::Latest),
            "pending" => Ok(BlockNumber::Pending),
            "earliest" => Ok(BlockNumber::Earliest),
            other => {
                let digits = other
                    .strip_prefix("0x")
                    .ok_or_else(|| ParseBlockNumberError::InvalidTag(s.to_string()))?;
                if digits.is_empty() {
                    return Err(ParseBlockNumberError::InvalidNumber(s.to_string()));
                }
                u64::from_str_radix(digits, 16)
                    .map(BlockNumber::Number)
                    .map_err(|e| ParseBlockNumberError::InvalidNumber(format!("{}: {}", s, e)))
            }
        }
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockNumber::Latest => write!(f, "latest"),
            BlockNumber::Pending => write!(f, "pending"),
            BlockNumber::Earliest => write!(f, "earliest"),
            BlockNumber::Number(n) => write!(f, "0x{:x}", n),
        }
    }
}

/// Block reference accepted by `sbch_call`: a number/tag or a block hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockNumberOrHash {
    /// Number or tag
    Number(BlockNumber),
    /// Block hash
    Hash(H256),
}

impl Default for BlockNumberOrHash {
    fn default() -> Self {
        BlockNumberOrHash::Number(BlockNumber::Latest)
    }
}

impl From<BlockNumber> for BlockNumberOrHash {
    fn from(n: BlockNumber) -> Self {
        BlockNumberOrHash::Number(n)
    }
}

impl From<H256> for BlockNumberOrHash {
    fn from(h: H256) -> Self {
        BlockNumberOrHash::Hash(h)
    }
}

impl FromStr for BlockNumberOrHash {
    type Err = ParseBlockNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 0x + 64 hex digits is a hash, anything shorter a quantity
        if s.len() == 66 && (s.starts_with("0x") || s.starts_with("0X")) {
            return parse_h256(s).map(BlockNumberOrHash::Hash);
        }
        s.parse().map(BlockNumberOrHash::Number)
    }
}

/// Parse a 0x-prefixed 32-byte hash
pub(crate) fn parse_h256(s: &str) -> Result<H256, ParseBlockNumberError> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| ParseBlockNumberError::InvalidHash(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(ParseBlockNumberError::InvalidHash(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(H256::from_slice(&bytes))
}

/// Block header summary as reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Height
    pub number: u64,
    /// Block hash
    pub hash: H256,
    /// Parent block hash
    pub parent_hash: H256,
    /// Proposer
    pub miner: H160,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    /// Gas used by all transactions in the block
    #[serde(default)]
    pub gas_used: u64,
    /// Encoded size in bytes
    #[serde(default)]
    pub size: u64,
    /// Transaction hashes in block order
    #[serde(default)]
    pub transactions: Vec<H256>,
}
