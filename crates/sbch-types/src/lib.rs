//! # sbch-types
//!
//! Backend-native records for the `sbch_*` query facade.
//!
//! These are the shapes the node's indexes and staking ledgers hand back:
//! numeric codes, fixed-width byte fields and positional pairings. The
//! facade in `sbch-rpc` reshapes them into the documented response format;
//! nothing in this crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod block;
mod call;
mod crosschain;
mod error;
mod staking;
mod transaction;

pub use block::{Block, BlockNumber, BlockNumberOrHash};
pub use call::{
    AccountOp, BlockHashOp, BytecodeOp, CallDetail, CallLog, CallTx, CreationCounterOp, RwLists,
    StorageOp, DEFAULT_CALL_GAS,
};
pub use crosschain::{CcEpoch, CcTransferInfo, UTXO_ID_LEN};
pub use error::ParseBlockNumberError;
pub use staking::{Epoch, Nomination, PendingReward, Validator, ValidatorsInfo};
pub use transaction::{
    evm_status_name, CallKind, EvmLog, InternalTxCall, InternalTxReturn, TxRecord, TxSignature,
    TX_STATUS_FAILED, TX_STATUS_SUCCESS,
};

// Re-export the fixed-width types every record is built from
pub use primitive_types::{H160, H256, U256};

/// 20-byte account address
pub type Address = H160;
