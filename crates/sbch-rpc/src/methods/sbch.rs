//! smartBCH namespace RPC methods (sbch_*)
//!
//! Parameters are parsed on the async side; the facade call itself runs on
//! the blocking pool since every backend query may block.

use std::sync::Arc;

use sbch_types::BlockNumberOrHash;
use serde::Serialize;
use serde_json::Value;

use crate::api::SbchApi;
use crate::error::JsonRpcError;
use crate::types::{
    format_u64, parse_address, parse_block_number, parse_block_number_or_hash, parse_h256,
    parse_topics, parse_u64, parse_u64_or_zero, required_param, CallArgs, CallRequestRaw,
};

fn to_json<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

fn parse_kind(value: &Value) -> Result<String, JsonRpcError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| JsonRpcError::invalid_params("kind must be a string"))
}

/// Run a facade call on the blocking pool
async fn blocking<F>(api: Arc<SbchApi>, f: F) -> Result<Value, JsonRpcError>
where
    F: FnOnce(&SbchApi) -> Result<Value, JsonRpcError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&api))
        .await
        .map_err(|e| JsonRpcError::internal_error(format!("facade task failed: {}", e)))?
}

/// sbch_getStandbyTxQueue - Not implemented
pub async fn sbch_get_standby_tx_queue(
    api: Arc<SbchApi>,
    _params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    Ok(api.get_standby_tx_queue()?)
}

/// sbch_queryTxBySrc - Returns transactions sent by an address
pub async fn sbch_query_tx_by_src(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let addr = parse_address(required_param(&params, 0, "address")?)?;
    let start = parse_block_number(required_param(&params, 1, "start height")?)?;
    let end = parse_block_number(required_param(&params, 2, "end height")?)?;
    let limit = parse_u64_or_zero(params.get(3))?;

    blocking(api, move |api| {
        to_json(&api.query_tx_by_src(addr, start, end, limit)?)
    })
    .await
}

/// sbch_queryTxByDst - Returns transactions received by an address
pub async fn sbch_query_tx_by_dst(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let addr = parse_address(required_param(&params, 0, "address")?)?;
    let start = parse_block_number(required_param(&params, 1, "start height")?)?;
    let end = parse_block_number(required_param(&params, 2, "end height")?)?;
    let limit = parse_u64_or_zero(params.get(3))?;

    blocking(api, move |api| {
        to_json(&api.query_tx_by_dst(addr, start, end, limit)?)
    })
    .await
}

/// sbch_queryTxByAddr - Returns transactions sent or received by an address
pub async fn sbch_query_tx_by_addr(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let addr = parse_address(required_param(&params, 0, "address")?)?;
    let start = parse_block_number(required_param(&params, 1, "start height")?)?;
    let end = parse_block_number(required_param(&params, 2, "end height")?)?;
    let limit = parse_u64_or_zero(params.get(3))?;

    blocking(api, move |api| {
        to_json(&api.query_tx_by_addr(addr, start, end, limit)?)
    })
    .await
}

/// sbch_queryLogs - Returns logs of a contract matching topics
pub async fn sbch_query_logs(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let addr = parse_address(required_param(&params, 0, "address")?)?;
    let topics = parse_topics(params.get(1))?;
    let start = parse_block_number(required_param(&params, 2, "start height")?)?;
    let end = parse_block_number(required_param(&params, 3, "end height")?)?;
    let limit = parse_u64_or_zero(params.get(4))?;

    blocking(api, move |api| {
        to_json(&api.query_logs(addr, &topics, start, end, limit)?)
    })
    .await
}

/// sbch_getTxListByHeight - Returns receipts of all transactions in a block
pub async fn sbch_get_tx_list_by_height(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let height = parse_block_number(required_param(&params, 0, "height")?)?;

    blocking(api, move |api| to_json(&api.get_tx_list_by_height(height)?)).await
}

/// sbch_getTxListByHeightWithRange - Returns receipts of a slice of a block's transactions
pub async fn sbch_get_tx_list_by_height_with_range(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let height = parse_block_number(required_param(&params, 0, "height")?)?;
    let start = parse_u64_or_zero(params.get(1))?;
    let end = parse_u64_or_zero(params.get(2))?;

    blocking(api, move |api| {
        to_json(&api.get_tx_list_by_height_with_range(height, start, end)?)
    })
    .await
}

/// sbch_getAddressCount - Returns the number of transactions touching an address
pub async fn sbch_get_address_count(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let kind = parse_kind(required_param(&params, 0, "kind")?)?;
    let addr = parse_address(required_param(&params, 1, "address")?)?;

    blocking(api, move |api| {
        Ok(Value::String(format_u64(api.get_address_count(&kind, addr))))
    })
    .await
}

/// sbch_getSep20AddressCount - Returns the number of token transfers touching an address
pub async fn sbch_get_sep20_address_count(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let kind = parse_kind(required_param(&params, 0, "kind")?)?;
    let contract = parse_address(required_param(&params, 1, "contract")?)?;
    let addr = parse_address(required_param(&params, 2, "address")?)?;

    blocking(api, move |api| {
        let count = api.get_sep20_address_count(&kind, contract, addr);
        Ok(Value::String(format_u64(count)))
    })
    .await
}

/// sbch_getEpochs - Returns staking epochs as stored
pub async fn sbch_get_epochs(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let start = parse_u64(required_param(&params, 0, "start")?)?;
    let end = parse_u64_or_zero(params.get(1))?;

    blocking(api, move |api| to_json(&api.get_epochs(start, end)?)).await
}

/// sbch_getEpochs2 - Returns staking epochs in readable form
pub async fn sbch_get_epochs2(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let start = parse_u64(required_param(&params, 0, "start")?)?;
    let end = parse_u64_or_zero(params.get(1))?;

    blocking(api, move |api| to_json(&api.get_epochs2(start, end)?)).await
}

/// sbch_getCurrEpoch - Returns the epoch in progress
pub async fn sbch_get_curr_epoch(
    api: Arc<SbchApi>,
    _params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    blocking(api, |api| to_json(&api.get_curr_epoch())).await
}

/// sbch_getCCEpochs - Returns cross-chain epochs as stored
pub async fn sbch_get_cc_epochs(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let start = parse_u64(required_param(&params, 0, "start")?)?;
    let end = parse_u64_or_zero(params.get(1))?;

    blocking(api, move |api| to_json(&api.get_cc_epochs(start, end)?)).await
}

/// sbch_getCCEpochs2 - Returns cross-chain epochs in readable form
pub async fn sbch_get_cc_epochs2(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let start = parse_u64(required_param(&params, 0, "start")?)?;
    let end = parse_u64_or_zero(params.get(1))?;

    blocking(api, move |api| to_json(&api.get_cc_epochs2(start, end)?)).await
}

/// sbch_healthCheck - Returns whether the latest block is recent enough
pub async fn sbch_health_check(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let max_age = parse_u64_or_zero(params.first())?;

    blocking(api, move |api| to_json(&api.health_check(max_age))).await
}

/// sbch_getTransactionReceipt - Returns a receipt with internal calls, or null
pub async fn sbch_get_transaction_receipt(
    api: Arc<SbchApi>,
    params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let hash = parse_h256(required_param(&params, 0, "transaction hash")?)?;

    blocking(api, move |api| match api.get_transaction_receipt(hash) {
        Some(receipt) => to_json(&receipt),
        None => Ok(Value::Null),
    })
    .await
}

/// sbch_call - Executes a call and returns its trace
pub async fn sbch_call(api: Arc<SbchApi>, params: Vec<Value>) -> Result<Value, JsonRpcError> {
    let request = required_param(&params, 0, "call request")?.clone();
    let raw: CallRequestRaw = serde_json::from_value(request)
        .map_err(|e| JsonRpcError::invalid_params(format!("invalid call request: {}", e)))?;
    let args = CallArgs::from_raw(raw)?;
    let block = match params.get(1) {
        None | Some(Value::Null) => BlockNumberOrHash::default(),
        Some(value) => parse_block_number_or_hash(value)?,
    };

    blocking(api, move |api| to_json(&api.call(args, block)?)).await
}

/// sbch_validatorsInfo - Returns the validator set snapshot
pub async fn sbch_validators_info(
    api: Arc<SbchApi>,
    _params: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    blocking(api, |api| Ok(api.validators_info()?)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_code;
    use crate::memory::MemoryBackend;
    use serde_json::json;

    fn api() -> Arc<SbchApi> {
        Arc::new(SbchApi::new(Arc::new(MemoryBackend::with_latest_height(10))))
    }

    #[tokio::test]
    async fn test_standby_queue_reports_not_supported() {
        let err = sbch_get_standby_tx_queue(api(), vec![]).await.unwrap_err();
        assert_eq!(err.code, error_code::METHOD_NOT_SUPPORTED);
    }

    #[tokio::test]
    async fn test_query_tx_missing_params() {
        let err = sbch_query_tx_by_src(api(), vec![]).await.unwrap_err();
        assert_eq!(err.code, error_code::INVALID_PARAMS);
        assert!(err.message.contains("address"));

        let params = vec![json!("0x0000000000000000000000000000000000000001"), json!("0x1")];
        let err = sbch_query_tx_by_src(api(), params).await.unwrap_err();
        assert!(err.message.contains("end height"));
    }

    #[tokio::test]
    async fn test_query_tx_limit_optional() {
        let params = vec![
            json!("0x0000000000000000000000000000000000000001"),
            json!("0x1"),
            json!("latest"),
        ];
        let result = sbch_query_tx_by_dst(api(), params).await.unwrap();
        assert_eq!(result, json!([]));
    }

    #[tokio::test]
    async fn test_address_count_unknown_kind() {
        let params = vec![json!("sideways"), json!("0x0000000000000000000000000000000000000001")];
        let result = sbch_get_address_count(api(), params).await.unwrap();
        assert_eq!(result, json!("0x0"));
    }

    #[tokio::test]
    async fn test_address_count_kind_must_be_string() {
        let params = vec![json!(1), json!("0x0000000000000000000000000000000000000001")];
        let err = sbch_get_address_count(api(), params).await.unwrap_err();
        assert_eq!(err.code, error_code::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_receipt_not_found_is_null() {
        let params = vec![json!(format!("0x{}", "ab".repeat(32)))];
        let result = sbch_get_transaction_receipt(api(), params).await.unwrap();
        assert!(result.is_null());
    }

    #[tokio::test]
    async fn test_health_check_without_params() {
        let result = sbch_health_check(api(), vec![]).await.unwrap();
        assert_eq!(result["ok"], false);
        assert_eq!(result["latestBlockHeight"], "0x0");
    }

    #[tokio::test]
    async fn test_call_defaults_block_to_latest() {
        let params = vec![json!({"to": "0x0000000000000000000000000000000000000002"})];
        let result = sbch_call(api(), params).await.unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["statusCode"], 0);
        assert_eq!(result["internalTransactions"], json!([]));
    }

    #[tokio::test]
    async fn test_call_rejects_bad_request() {
        let err = sbch_call(api(), vec![json!("nope")]).await.unwrap_err();
        assert_eq!(err.code, error_code::INVALID_PARAMS);
    }
}
