//! Cross-chain ledger records

use primitive_types::{H160, H256};
use serde::{Deserialize, Serialize};

/// Length of a main-chain UTXO id: 32-byte txid followed by a 4-byte output index
pub const UTXO_ID_LEN: usize = 36;

/// Cross-chain epoch as kept by the cross-chain ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CcEpoch {
    /// Epoch number
    pub number: i64,
    /// First main-chain height of the epoch
    pub start_height: i64,
    /// Unix time the epoch closed
    pub end_time: i64,
    /// Transfers into the side chain observed in this epoch
    #[serde(default)]
    pub transfer_infos: Vec<CcTransferInfo>,
}

/// One main-chain to side-chain transfer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CcTransferInfo {
    /// Packed UTXO id, see [`UTXO_ID_LEN`]
    #[serde(with = "hex::serde")]
    pub utxo: Vec<u8>,
    /// Side-chain recipient
    pub receiver: H160,
    /// Amount in satoshis
    pub amount: u64,
}

impl CcTransferInfo {
    /// Split the UTXO id into main-chain txid and big-endian output index
    pub fn outpoint(&self) -> Option<(H256, u32)> {
        if self.utxo.len() != UTXO_ID_LEN {
            return None;
        }
        let txid = H256::from_slice(&self.utxo[..32]);
        let mut index = [0u8; 4];
        index.copy_from_slice(&self.utxo[32..]);
        Some((txid, u32::from_be_bytes(index)))
    }
}
