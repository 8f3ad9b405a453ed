//! # sbch-rpc
//!
//! The `sbch_*` JSON-RPC query namespace of a smartBCH node.
//!
//! This crate sits between a generic JSON-RPC server and the node's indexes.
//! It resolves symbolic and reversed height bounds, asks the backend, and
//! reshapes the backend's records (transactions, receipts, internal calls,
//! logs, epochs, call traces) into the documented response format.
//!
//! ## Features
//!
//! - Height range resolution against the backend's half-open index convention
//! - Receipt shaping with internal-call traces paired and laid out as a call tree
//! - Staking and cross-chain epoch recasting
//! - Liveness check from the latest block's age
//! - In-memory backend for tests and the mock node
//! - HTTP server with CORS support
//!
//! ## Usage
//!
//! ```ignore
//! use sbch_rpc::{MemoryBackend, RpcHandler, RpcServer, SbchApi, ServerConfig};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::from_snapshot(snapshot));
//! let api = Arc::new(SbchApi::new(backend));
//!
//! let server = RpcServer::new(ServerConfig::default(), RpcHandler::new(api));
//! server.run().await?;
//! ```
//!
//! ## Supported Methods
//!
//! | Method | Description |
//! |--------|-------------|
//! | `sbch_getStandbyTxQueue` | Not implemented, always fails |
//! | `sbch_queryTxBySrc` | Transactions sent by an address |
//! | `sbch_queryTxByDst` | Transactions received by an address |
//! | `sbch_queryTxByAddr` | Transactions sent or received by an address |
//! | `sbch_queryLogs` | Logs of a contract filtered by topics |
//! | `sbch_getTxListByHeight` | Receipts of a block's transactions |
//! | `sbch_getTxListByHeightWithRange` | Receipts of a slice of a block's transactions |
//! | `sbch_getAddressCount` | Transaction count of an address (`from`/`to`/`both`) |
//! | `sbch_getSep20AddressCount` | Token transfer count of an address |
//! | `sbch_getEpochs` | Staking epochs as stored |
//! | `sbch_getEpochs2` | Staking epochs in readable form |
//! | `sbch_getCurrEpoch` | Epoch in progress |
//! | `sbch_getCCEpochs` | Cross-chain epochs as stored |
//! | `sbch_getCCEpochs2` | Cross-chain epochs in readable form |
//! | `sbch_healthCheck` | Whether the latest block is recent |
//! | `sbch_getTransactionReceipt` | Receipt with internal calls, or null |
//! | `sbch_call` | Traced call execution |
//! | `sbch_validatorsInfo` | Validator set snapshot |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod backend;
pub mod error;
pub mod handler;
pub mod health;
pub mod memory;
pub mod methods;
pub mod range;
pub mod response;
pub mod server;
pub mod shape;
pub mod types;

// Re-export main types
pub use api::{AddressCountKind, ApiConfig, SbchApi, DEFAULT_EPOCH_WINDOW};
pub use backend::{BackendError, BackendResult, BackendService, TxsWithSigs};
pub use error::{JsonRpcError, RpcError, RpcResult};
pub use handler::{MethodRegistry, RpcHandler};
pub use health::DEFAULT_LATEST_BLOCK_TOO_OLD_AGE;
pub use memory::{ChainSnapshot, MemoryBackend, RecordedCall, Sep20Transfer, SignedTxRecord};
pub use range::HeightRange;
pub use response::{
    HealthReport, RpcCallDetail, RpcCcEpoch, RpcInternalTx, RpcLog, RpcReceipt, RpcTransaction,
    StakingEpoch,
};
pub use server::{RpcServer, ServerConfig};
pub use types::{CallArgs, CallRequestRaw, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
