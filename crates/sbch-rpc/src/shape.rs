//! Conversion from backend records to response shapes
//!
//! Everything here is a pure function of its input.

use sbch_types::{
    evm_status_name, CallDetail, CallKind, CcEpoch, CcTransferInfo, Epoch, EvmLog, InternalTxCall,
    InternalTxReturn, RwLists, TxRecord, TxSignature,
};

use crate::response::{
    RpcAccountOp, RpcBlockHashOp, RpcBytecodeOp, RpcCallDetail, RpcCallLog, RpcCcEpoch,
    RpcCcTransferInfo, RpcCreationCounterOp, RpcInternalTx, RpcLog, RpcNomination, RpcReceipt,
    RpcRwLists, RpcStorageOp, RpcTransaction, StakingEpoch,
};
use crate::types::{format_address, format_bytes, format_h256, format_u256, format_u64};

/// Shape a transaction together with its signature
pub fn tx_to_rpc(tx: &TxRecord, sig: &TxSignature) -> RpcTransaction {
    RpcTransaction {
        block_hash: format_h256(&tx.block_hash),
        block_number: format_u64(tx.block_number),
        from: format_address(&tx.from),
        gas: format_u64(tx.gas),
        gas_price: format_u256(&tx.gas_price),
        hash: format_h256(&tx.hash),
        input: format_bytes(&tx.input),
        nonce: format_u64(tx.nonce),
        to: (!tx.is_creation()).then(|| format_address(&tx.to)),
        transaction_index: format_u64(tx.transaction_index),
        value: format_u256(&tx.value),
        v: format_u64(sig.legacy_v()),
        r: format_h256(&sig.r),
        s: format_h256(&sig.s),
    }
}

/// Shape transactions, pairing them with signatures by position
///
/// A transaction without a signature at its position gets an all-zero one.
pub fn txs_to_rpc_resp(txs: &[TxRecord], sigs: &[TxSignature]) -> Vec<RpcTransaction> {
    txs.iter()
        .enumerate()
        .map(|(i, tx)| tx_to_rpc(tx, &sigs.get(i).copied().unwrap_or_default()))
        .collect()
}

/// Shape a transaction as a receipt, internal calls included
pub fn tx_to_receipt(tx: &TxRecord) -> RpcReceipt {
    let status_str = match (tx.status_str.is_empty(), tx.is_success()) {
        (false, _) => tx.status_str.clone(),
        (true, true) => "success".to_string(),
        (true, false) => "failure".to_string(),
    };

    RpcReceipt {
        transaction_hash: format_h256(&tx.hash),
        transaction_index: format_u64(tx.transaction_index),
        block_hash: format_h256(&tx.block_hash),
        block_number: format_u64(tx.block_number),
        from: format_address(&tx.from),
        to: (!tx.is_creation()).then(|| format_address(&tx.to)),
        cumulative_gas_used: format_u64(tx.cumulative_gas_used),
        gas_used: format_u64(tx.gas_used),
        contract_address: (!tx.contract_address.is_zero())
            .then(|| format_address(&tx.contract_address)),
        logs: to_rpc_logs(&tx.logs),
        logs_bloom: format_bytes(&tx.logs_bloom),
        status: format_u64(tx.status),
        status_str,
        out_data: format_bytes(&tx.out_data),
        internal_transactions: build_internal_txs(&tx.internal_tx_calls, &tx.internal_tx_returns),
    }
}

/// Shape a list of transactions as receipts
pub fn txs_to_receipts(txs: &[TxRecord]) -> Vec<RpcReceipt> {
    txs.iter().map(tx_to_receipt).collect()
}

/// Shape a single log
pub fn to_rpc_log(log: &EvmLog) -> RpcLog {
    RpcLog {
        address: format_address(&log.address),
        topics: log.topics.iter().map(format_h256).collect(),
        data: format_bytes(&log.data),
        block_hash: format_h256(&log.block_hash),
        block_number: format_u64(log.block_number),
        transaction_hash: format_h256(&log.tx_hash),
        transaction_index: format_u64(log.tx_index),
        log_index: format_u64(log.index),
        removed: log.removed,
    }
}

/// Shape a list of logs
pub fn to_rpc_logs(logs: &[EvmLog]) -> Vec<RpcLog> {
    logs.iter().map(to_rpc_log).collect()
}

/// Pair internal calls with their results and lay them out in execution order
///
/// `calls` is in entry (pre-)order, `returns` in completion (post-)order. A
/// call completes when a later call at the same or a shallower depth starts,
/// or when the trace ends, so replaying the entries against a stack recovers
/// which return belongs to which call. Surplus calls keep no result.
pub fn build_internal_txs(
    calls: &[InternalTxCall],
    returns: &[InternalTxReturn],
) -> Vec<RpcInternalTx> {
    let Some(first) = calls.first() else {
        return Vec::new();
    };
    let base_depth = first.depth;

    let mut paired: Vec<Option<&InternalTxReturn>> = vec![None; calls.len()];
    let mut paths = Vec::with_capacity(calls.len());
    let mut open: Vec<usize> = Vec::new();
    let mut position: Vec<usize> = Vec::new();
    let mut next_return = returns.iter();

    for (i, call) in calls.iter().enumerate() {
        while let Some(&top) = open.last() {
            if calls[top].depth < call.depth {
                break;
            }
            open.pop();
            paired[top] = next_return.next();
        }
        open.push(i);

        let level = usize::try_from(call.depth.saturating_sub(base_depth))
            .unwrap_or(0)
            .min(position.len());
        if level < position.len() {
            position.truncate(level + 1);
            position[level] += 1;
        } else {
            position.push(0);
        }
        paths.push(call_path(call.kind, &position));
    }
    while let Some(top) = open.pop() {
        paired[top] = next_return.next();
    }

    calls
        .iter()
        .zip(paired)
        .zip(paths)
        .map(|((call, ret), path)| internal_tx(call, ret, path))
        .collect()
}

fn call_path(kind: i32, position: &[usize]) -> String {
    let name = CallKind::from_code(kind).map_or("unknown", |k| k.name());
    let mut path = name.to_string();
    for index in position {
        path.push('_');
        path.push_str(&index.to_string());
    }
    path
}

fn internal_tx(
    call: &InternalTxCall,
    ret: Option<&InternalTxReturn>,
    call_path: String,
) -> RpcInternalTx {
    let creates = CallKind::from_code(call.kind).is_some_and(|k| k.is_create());
    RpcInternalTx {
        call_path,
        from: format_address(&call.sender),
        to: format_address(&call.destination),
        gas: format_u64(call.gas.max(0) as u64),
        gas_used: ret.map(|r| format_u64(call.gas.saturating_sub(r.gas_left).max(0) as u64)),
        value: format_u256(&call.value),
        input: format_bytes(&call.input),
        status: ret.map(|r| evm_status_name(r.status_code).to_string()),
        output: ret.map(|r| format_bytes(&r.output)),
        contract_address: ret
            .filter(|r| creates && !r.create_address.is_zero())
            .map(|r| format_address(&r.create_address)),
    }
}

/// Recast a staking epoch
pub fn cast_staking_epoch(epoch: &Epoch) -> StakingEpoch {
    StakingEpoch {
        number: format_u64(epoch.number.max(0) as u64),
        start_height: format_u64(epoch.start_height.max(0) as u64),
        end_time: epoch.end_time,
        nominations: epoch
            .nominations
            .iter()
            .map(|n| RpcNomination {
                pubkey: format_h256(&n.pubkey),
                nominated_count: n.nominated_count,
            })
            .collect(),
    }
}

/// Recast a list of staking epochs
pub fn cast_staking_epochs(epochs: &[Epoch]) -> Vec<StakingEpoch> {
    epochs.iter().map(cast_staking_epoch).collect()
}

/// Recast a cross-chain epoch
pub fn cast_cc_epoch(epoch: &CcEpoch) -> RpcCcEpoch {
    RpcCcEpoch {
        number: format_u64(epoch.number.max(0) as u64),
        start_height: format_u64(epoch.start_height.max(0) as u64),
        end_time: epoch.end_time,
        transfer_infos: epoch.transfer_infos.iter().map(cast_cc_transfer).collect(),
    }
}

/// Recast a list of cross-chain epochs
pub fn cast_cc_epochs(epochs: &[CcEpoch]) -> Vec<RpcCcEpoch> {
    epochs.iter().map(cast_cc_epoch).collect()
}

fn cast_cc_transfer(info: &CcTransferInfo) -> RpcCcTransferInfo {
    let outpoint = info.outpoint();
    RpcCcTransferInfo {
        utxo: format_bytes(&info.utxo),
        txid: outpoint.map(|(txid, _)| format_h256(&txid)),
        vout: outpoint.map(|(_, vout)| vout),
        receiver: format_address(&info.receiver),
        amount: format_u64(info.amount),
    }
}

/// Shape the result of a traced call
pub fn to_rpc_call_detail(detail: &CallDetail) -> RpcCallDetail {
    RpcCallDetail {
        status: evm_status_name(detail.status).to_string(),
        status_code: detail.status,
        gas_used: format_u64(detail.gas_used),
        return_data: format_bytes(&detail.out_data),
        logs: detail
            .logs
            .iter()
            .map(|log| RpcCallLog {
                address: format_address(&log.address),
                topics: log.topics.iter().map(format_h256).collect(),
                data: format_bytes(&log.data),
            })
            .collect(),
        contract_address: (!detail.created_contract_address.is_zero())
            .then(|| format_address(&detail.created_contract_address)),
        internal_transactions: build_internal_txs(
            &detail.internal_tx_calls,
            &detail.internal_tx_returns,
        ),
        rw_lists: detail.rw_lists.as_ref().map(to_rpc_rw_lists),
    }
}

fn to_rpc_rw_lists(lists: &RwLists) -> RpcRwLists {
    let counters = |ops: &[sbch_types::CreationCounterOp]| {
        ops.iter()
            .map(|op| RpcCreationCounterOp {
                lsb: op.lsb,
                counter: format_u64(op.counter),
            })
            .collect()
    };
    let accounts = |ops: &[sbch_types::AccountOp]| {
        ops.iter()
            .map(|op| RpcAccountOp {
                address: format_address(&op.addr),
                nonce: format_u64(op.nonce),
                balance: format_u256(&op.balance),
            })
            .collect()
    };
    let bytecodes = |ops: &[sbch_types::BytecodeOp]| {
        ops.iter()
            .map(|op| RpcBytecodeOp {
                address: format_address(&op.addr),
                bytecode: format_bytes(&op.bytecode),
            })
            .collect()
    };
    let storage = |ops: &[sbch_types::StorageOp]| {
        ops.iter()
            .map(|op| RpcStorageOp {
                seq: format_u64(op.seq),
                key: format_h256(&op.key),
                value: format_bytes(&op.value),
            })
            .collect()
    };

    RpcRwLists {
        creation_counter_reads: counters(&lists.creation_counter_r_list),
        creation_counter_writes: counters(&lists.creation_counter_w_list),
        account_reads: accounts(&lists.account_r_list),
        account_writes: accounts(&lists.account_w_list),
        bytecode_reads: bytecodes(&lists.bytecode_r_list),
        bytecode_writes: bytecodes(&lists.bytecode_w_list),
        storage_reads: storage(&lists.storage_r_list),
        storage_writes: storage(&lists.storage_w_list),
        block_hashes: lists
            .block_hash_list
            .iter()
            .map(|op| RpcBlockHashOp {
                height: format_u64(op.height),
                hash: format_h256(&op.hash),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbch_types::{
        AccountOp, BlockHashOp, CallLog, CcTransferInfo, Nomination, H160, H256, TX_STATUS_SUCCESS,
        U256,
    };

    fn call(kind: i32, depth: i32, gas: i64) -> InternalTxCall {
        InternalTxCall {
            kind,
            depth,
            gas,
            sender: H160::repeat_byte(depth as u8 + 1),
            destination: H160::repeat_byte(depth as u8 + 2),
            ..Default::default()
        }
    }

    fn ret(status_code: i32, gas_left: i64, tag: u8) -> InternalTxReturn {
        InternalTxReturn {
            status_code,
            gas_left,
            output: vec![tag],
            create_address: H160::zero(),
        }
    }

    fn sample_tx() -> TxRecord {
        TxRecord {
            hash: H256::repeat_byte(0x11),
            transaction_index: 2,
            nonce: 9,
            block_hash: H256::repeat_byte(0x22),
            block_number: 100,
            from: H160::repeat_byte(0xaa),
            to: H160::repeat_byte(0xbb),
            value: U256::from(1000u64),
            gas_price: U256::from(1_000_000_000u64),
            gas: 21000,
            input: vec![0xab, 0xcd],
            cumulative_gas_used: 42000,
            gas_used: 21000,
            status: TX_STATUS_SUCCESS,
            ..Default::default()
        }
    }

    // ===== Transaction Shaping Tests =====

    #[test]
    fn test_tx_to_rpc_fields() {
        let sig = TxSignature {
            r: H256::repeat_byte(0x01),
            s: H256::repeat_byte(0x02),
            v: 1,
        };
        let rpc = tx_to_rpc(&sample_tx(), &sig);
        assert_eq!(rpc.block_number, "0x64");
        assert_eq!(rpc.nonce, "0x9");
        assert_eq!(rpc.transaction_index, "0x2");
        assert_eq!(rpc.gas_price, "0x3b9aca00");
        assert_eq!(rpc.value, "0x3e8");
        assert_eq!(rpc.input, "0xabcd");
        assert_eq!(rpc.v, "0x1c");
        assert_eq!(rpc.r, format!("0x{}", "01".repeat(32)));
        assert_eq!(rpc.to, Some(format!("0x{}", "bb".repeat(20))));
    }

    #[test]
    fn test_txs_pair_signatures_by_position() {
        let mut second = sample_tx();
        second.hash = H256::repeat_byte(0x33);
        let sigs = [TxSignature {
            v: 1,
            ..Default::default()
        }];
        let rpc = txs_to_rpc_resp(&[sample_tx(), second], &sigs);
        assert_eq!(rpc.len(), 2);
        assert_eq!(rpc[0].v, "0x1c");
        assert_eq!(rpc[1].v, "0x1b");
        assert_eq!(rpc[1].hash, format!("0x{}", "33".repeat(32)));
    }

    // ===== Receipt Shaping Tests =====

    #[test]
    fn test_receipt_without_internal_calls_has_empty_list() {
        let receipt = tx_to_receipt(&sample_tx());
        assert!(receipt.internal_transactions.is_empty());
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["internalTransactions"], serde_json::json!([]));
        assert_eq!(receipt.status, "0x1");
        assert_eq!(receipt.status_str, "success");
        assert!(receipt.contract_address.is_none());
    }

    #[test]
    fn test_receipt_for_creation() {
        let mut tx = sample_tx();
        tx.to = H160::zero();
        tx.contract_address = H160::repeat_byte(0xcc);
        tx.status = 0;
        tx.status_str = "revert".to_string();
        let receipt = tx_to_receipt(&tx);
        assert!(receipt.to.is_none());
        assert_eq!(receipt.contract_address, Some(format!("0x{}", "cc".repeat(20))));
        assert_eq!(receipt.status, "0x0");
        assert_eq!(receipt.status_str, "revert");
    }

    #[test]
    fn test_receipt_logs() {
        let mut tx = sample_tx();
        tx.logs.push(EvmLog {
            address: H160::repeat_byte(0x05),
            topics: vec![H256::repeat_byte(0x06)],
            data: vec![1, 2],
            block_number: 100,
            tx_hash: tx.hash,
            tx_index: 2,
            block_hash: tx.block_hash,
            index: 7,
            removed: false,
        });
        let receipt = tx_to_receipt(&tx);
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].log_index, "0x7");
        assert_eq!(receipt.logs[0].data, "0x0102");
        assert_eq!(receipt.logs[0].transaction_hash, receipt.transaction_hash);
    }

    // ===== Internal Call Shaping Tests =====

    #[test]
    fn test_internal_txs_flat() {
        let calls = [call(0, 1, 100), call(0, 1, 200)];
        let returns = [ret(0, 40, 1), ret(2, 50, 2)];
        let itxs = build_internal_txs(&calls, &returns);
        assert_eq!(itxs[0].call_path, "call_0");
        assert_eq!(itxs[1].call_path, "call_1");
        assert_eq!(itxs[0].gas_used.as_deref(), Some("0x3c"));
        assert_eq!(itxs[0].status.as_deref(), Some("success"));
        assert_eq!(itxs[1].status.as_deref(), Some("revert"));
        assert_eq!(itxs[1].output.as_deref(), Some("0x02"));
    }

    #[test]
    fn test_internal_txs_nested_pairing() {
        // A calls B, B calls C, then A calls D
        let calls = [call(0, 1, 1000), call(1, 2, 500), call(3, 3, 100), call(0, 2, 300)];
        // completion order: C, B, D, A
        let returns = [ret(0, 10, 0xc), ret(0, 20, 0xb), ret(0, 30, 0xd), ret(0, 40, 0xa)];
        let itxs = build_internal_txs(&calls, &returns);

        let paths: Vec<_> = itxs.iter().map(|t| t.call_path.as_str()).collect();
        assert_eq!(paths, ["call_0", "delegatecall_0_0", "create_0_0_0", "call_0_1"]);

        let outputs: Vec<_> = itxs.iter().map(|t| t.output.clone().unwrap()).collect();
        assert_eq!(outputs, ["0x0a", "0x0b", "0x0c", "0x0d"]);
    }

    #[test]
    fn test_internal_txs_missing_returns() {
        let calls = [call(0, 1, 100), call(0, 2, 50)];
        let itxs = build_internal_txs(&calls, &[ret(0, 10, 1)]);
        assert_eq!(itxs[1].output.as_deref(), Some("0x01"));
        assert!(itxs[0].status.is_none());
        assert!(itxs[0].gas_used.is_none());
    }

    #[test]
    fn test_internal_tx_gas_used_saturates() {
        let itxs = build_internal_txs(&[call(0, 0, 10)], &[ret(3, 50, 0)]);
        assert_eq!(itxs[0].gas_used.as_deref(), Some("0x0"));
        assert_eq!(itxs[0].status.as_deref(), Some("out-of-gas"));
    }

    #[test]
    fn test_internal_tx_created_contract() {
        let mut r = ret(0, 0, 0);
        r.create_address = H160::repeat_byte(0xee);
        let itxs = build_internal_txs(&[call(4, 0, 10)], &[r]);
        assert_eq!(itxs[0].call_path, "create2_0");
        assert_eq!(itxs[0].contract_address, Some(format!("0x{}", "ee".repeat(20))));
    }

    #[test]
    fn test_internal_tx_unknown_kind() {
        let itxs = build_internal_txs(&[call(42, 0, 10)], &[]);
        assert_eq!(itxs[0].call_path, "unknown_0");
    }

    // ===== Epoch Shaping Tests =====

    #[test]
    fn test_cast_staking_epoch() {
        let epoch = Epoch {
            number: 3,
            start_height: 700_000,
            end_time: 1_650_000_000,
            nominations: vec![Nomination {
                pubkey: H256::repeat_byte(0x0f),
                nominated_count: 12,
            }],
        };
        let shaped = cast_staking_epoch(&epoch);
        assert_eq!(shaped.number, "0x3");
        assert_eq!(shaped.start_height, "0xaae60");
        assert_eq!(shaped.end_time, 1_650_000_000);
        assert_eq!(shaped.nominations[0].nominated_count, 12);
        assert_eq!(shaped.nominations[0].pubkey, format!("0x{}", "0f".repeat(32)));
    }

    #[test]
    fn test_cast_cc_epoch_decodes_utxo() {
        let mut utxo = vec![0x44u8; 32];
        utxo.extend_from_slice(&[0, 0, 0, 3]);
        let epoch = CcEpoch {
            number: 1,
            start_height: 10,
            end_time: 20,
            transfer_infos: vec![
                CcTransferInfo {
                    utxo,
                    receiver: H160::repeat_byte(0x01),
                    amount: 5000,
                },
                CcTransferInfo {
                    utxo: vec![1, 2, 3],
                    receiver: H160::zero(),
                    amount: 1,
                },
            ],
        };
        let shaped = cast_cc_epoch(&epoch);
        let first = &shaped.transfer_infos[0];
        assert_eq!(first.txid, Some(format!("0x{}", "44".repeat(32))));
        assert_eq!(first.vout, Some(3));
        assert_eq!(first.amount, "0x1388");
        let second = &shaped.transfer_infos[1];
        assert_eq!(second.utxo, "0x010203");
        assert!(second.txid.is_none());
        assert!(second.vout.is_none());
    }

    // ===== Call Detail Shaping Tests =====

    #[test]
    fn test_call_detail_shape() {
        let detail = CallDetail {
            status: 2,
            gas_used: 500,
            out_data: vec![0x08, 0xc3],
            logs: vec![CallLog {
                address: H160::repeat_byte(0x01),
                topics: vec![H256::zero()],
                data: vec![],
            }],
            rw_lists: Some(RwLists {
                account_r_list: vec![AccountOp {
                    addr: H160::repeat_byte(0x02),
                    nonce: 1,
                    balance: U256::from(10u64),
                }],
                block_hash_list: vec![BlockHashOp {
                    height: 5,
                    hash: H256::zero(),
                }],
                ..Default::default()
            }),
            ..Default::default()
        };
        let shaped = to_rpc_call_detail(&detail);
        assert_eq!(shaped.status, "revert");
        assert_eq!(shaped.status_code, 2);
        assert_eq!(shaped.gas_used, "0x1f4");
        assert_eq!(shaped.return_data, "0x08c3");
        assert_eq!(shaped.logs[0].data, "0x");
        assert!(shaped.contract_address.is_none());
        assert!(shaped.internal_transactions.is_empty());
        let lists = shaped.rw_lists.unwrap();
        assert_eq!(lists.account_reads[0].balance, "0xa");
        assert_eq!(lists.block_hashes[0].height, "0x5");
        assert!(lists.storage_writes.is_empty());
    }

    #[test]
    fn test_call_detail_creation() {
        let detail = CallDetail {
            created_contract_address: H160::repeat_byte(0x09),
            ..Default::default()
        };
        let shaped = to_rpc_call_detail(&detail);
        assert_eq!(shaped.status, "success");
        assert_eq!(shaped.contract_address, Some(format!("0x{}", "09".repeat(20))));
        assert!(shaped.rw_lists.is_none());
    }
}
