//! JSON-RPC envelope, parameter parsing and quantity formatting

use primitive_types::{H160, H256, U256};
use sbch_types::{BlockNumber, BlockNumberOrHash, CallTx, DEFAULT_CALL_GAS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcError;

/// JSON-RPC request ID (can be number, string, or null)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// Numeric ID
    Number(u64),
    /// String ID
    String(String),
    /// Null ID
    #[default]
    Null,
}

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID
    #[serde(default)]
    pub id: JsonRpcId,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Vec<Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version
    pub jsonrpc: String,
    /// Request ID
    pub id: JsonRpcId,
    /// Result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create success response
    pub fn success(id: JsonRpcId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create error response
    pub fn error(id: JsonRpcId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Positional parameter that must be present
pub fn required_param<'a>(
    params: &'a [Value],
    index: usize,
    name: &str,
) -> Result<&'a Value, JsonRpcError> {
    params
        .get(index)
        .ok_or_else(|| JsonRpcError::invalid_params(format!("missing {} parameter", name)))
}

/// Parse a block number or tag from JSON value
pub fn parse_block_number(value: &Value) -> Result<BlockNumber, JsonRpcError> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|e| JsonRpcError::invalid_params(format!("invalid block number: {}", e))),
        Value::Number(n) => n
            .as_u64()
            .map(BlockNumber::Number)
            .ok_or_else(|| JsonRpcError::invalid_params("invalid block number")),
        _ => Err(JsonRpcError::invalid_params("invalid block number type")),
    }
}

/// Parse a block number, tag or hash from JSON value
///
/// Besides the plain forms this accepts `{"blockNumber": ..}` and `{"blockHash": ..}`.
pub fn parse_block_number_or_hash(value: &Value) -> Result<BlockNumberOrHash, JsonRpcError> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|e| JsonRpcError::invalid_params(format!("invalid block reference: {}", e))),
        Value::Number(_) => parse_block_number(value).map(BlockNumberOrHash::Number),
        Value::Object(map) => match (map.get("blockNumber"), map.get("blockHash")) {
            (Some(number), None) => parse_block_number(number).map(BlockNumberOrHash::Number),
            (None, Some(hash)) => parse_h256(hash).map(BlockNumberOrHash::Hash),
            _ => Err(JsonRpcError::invalid_params(
                "block reference needs exactly one of blockNumber and blockHash",
            )),
        },
        _ => Err(JsonRpcError::invalid_params("invalid block reference type")),
    }
}

/// Parse address from JSON value
pub fn parse_address(value: &Value) -> Result<H160, JsonRpcError> {
    let s = value
        .as_str()
        .ok_or_else(|| JsonRpcError::invalid_params("address must be a string"))?;
    address_from_hex(s).map_err(|e| JsonRpcError::invalid_params(format!("invalid address: {}", e)))
}

/// Parse H256 from JSON value
pub fn parse_h256(value: &Value) -> Result<H256, JsonRpcError> {
    let s = value
        .as_str()
        .ok_or_else(|| JsonRpcError::invalid_params("hash must be a string"))?;
    let bytes = decode_fixed(s, 32)
        .map_err(|e| JsonRpcError::invalid_params(format!("invalid hash: {}", e)))?;
    Ok(H256::from_slice(&bytes))
}

/// Parse a topic list; `null` or a missing value means no topic filter
pub fn parse_topics(value: Option<&Value>) -> Result<Vec<H256>, JsonRpcError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(parse_h256).collect(),
        Some(_) => Err(JsonRpcError::invalid_params("topics must be an array")),
    }
}

/// Parse hex bytes from JSON value
pub fn parse_hex_bytes(value: &Value) -> Result<Vec<u8>, JsonRpcError> {
    let s = value
        .as_str()
        .ok_or_else(|| JsonRpcError::invalid_params("data must be a hex string"))?;

    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| JsonRpcError::invalid_params(format!("invalid hex data: {}", e)))
}

/// Parse u64 from JSON value (hex string or plain number)
pub fn parse_u64(value: &Value) -> Result<u64, JsonRpcError> {
    match value {
        Value::String(s) => parse_hex_u64(s),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| JsonRpcError::invalid_params("quantity must be unsigned")),
        _ => Err(JsonRpcError::invalid_params("quantity must be a hex string")),
    }
}

/// Parse an optional u64; absent or `null` reads as zero
pub fn parse_u64_or_zero(value: Option<&Value>) -> Result<u64, JsonRpcError> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(v) => parse_u64(v),
    }
}

/// Format U256 as hex string
pub fn format_u256(value: &U256) -> String {
    format!("0x{:x}", value)
}

/// Format u64 as hex string
pub fn format_u64(value: u64) -> String {
    format!("0x{:x}", value)
}

/// Format bytes as hex string
pub fn format_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Format an address as a full-length hex string
pub fn format_address(address: &H160) -> String {
    format_bytes(address.as_bytes())
}

/// Format a 32-byte hash as a full-length hex string
pub fn format_h256(hash: &H256) -> String {
    format_bytes(hash.as_bytes())
}

/// Call request for sbch_call (raw JSON form)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequestRaw {
    /// From address (optional, defaults to zero address)
    pub from: Option<String>,
    /// To address (None for contract creation)
    pub to: Option<String>,
    /// Gas limit (optional)
    pub gas: Option<String>,
    /// Gas price (optional)
    pub gas_price: Option<String>,
    /// Value to send (optional)
    pub value: Option<String>,
    /// Input data (optional)
    #[serde(default, alias = "input")]
    pub data: Option<String>,
}

/// Call request for sbch_call (parsed form)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    /// From address (optional, defaults to zero address)
    pub from: Option<H160>,
    /// To address (None for contract creation)
    pub to: Option<H160>,
    /// Gas limit (optional)
    pub gas: Option<u64>,
    /// Gas price (optional)
    pub gas_price: Option<U256>,
    /// Value to send (optional)
    pub value: Option<U256>,
    /// Input data (optional)
    pub data: Option<Vec<u8>>,
}

impl CallArgs {
    /// Parse from raw JSON form
    pub fn from_raw(raw: CallRequestRaw) -> Result<Self, JsonRpcError> {
        Ok(Self {
            from: raw
                .from
                .map(|s| address_from_hex(&s))
                .transpose()
                .map_err(|e| JsonRpcError::invalid_params(format!("invalid from: {}", e)))?,
            to: raw
                .to
                .map(|s| address_from_hex(&s))
                .transpose()
                .map_err(|e| JsonRpcError::invalid_params(format!("invalid to: {}", e)))?,
            gas: raw.gas.map(|s| parse_hex_u64(&s)).transpose()?,
            gas_price: raw.gas_price.map(|s| parse_hex_u256(&s, "gasPrice")).transpose()?,
            value: raw.value.map(|s| parse_hex_u256(&s, "value")).transpose()?,
            data: raw
                .data
                .map(|s| parse_hex_bytes(&Value::String(s)))
                .transpose()?,
        })
    }

    /// Sender and unsigned transaction handed to the executor
    pub fn into_call_tx(self) -> (H160, CallTx) {
        let from = self.from.unwrap_or_else(H160::zero);
        let tx = CallTx {
            to: self.to,
            value: self.value.unwrap_or_default(),
            gas: self.gas.unwrap_or(DEFAULT_CALL_GAS),
            gas_price: self.gas_price.unwrap_or_default(),
            data: self.data.unwrap_or_default(),
            nonce: 0,
        };
        (from, tx)
    }
}

fn address_from_hex(s: &str) -> Result<H160, String> {
    decode_fixed(s, 20).map(|bytes| H160::from_slice(&bytes))
}

fn decode_fixed(s: &str, len: usize) -> Result<Vec<u8>, String> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| e.to_string())?;
    if bytes.len() != len {
        return Err(format!("expected {} bytes, got {}", len, bytes.len()));
    }
    Ok(bytes)
}

fn parse_hex_u64(s: &str) -> Result<u64, JsonRpcError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16)
        .map_err(|e| JsonRpcError::invalid_params(format!("invalid hex u64: {}", e)))
}

fn parse_hex_u256(s: &str, field: &str) -> Result<U256, JsonRpcError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    U256::from_str_radix(s, 16)
        .map_err(|e| JsonRpcError::invalid_params(format!("invalid {}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ===== Block Reference Parsing Tests =====

    #[test]
    fn test_parse_block_number_tags() {
        assert_eq!(parse_block_number(&json!("latest")).unwrap(), BlockNumber::Latest);
        assert_eq!(parse_block_number(&json!("Pending")).unwrap(), BlockNumber::Pending);
        assert_eq!(parse_block_number(&json!("earliest")).unwrap(), BlockNumber::Earliest);
    }

    #[test]
    fn test_parse_block_number_hex_and_json_number() {
        assert_eq!(parse_block_number(&json!("0x10")).unwrap(), BlockNumber::Number(16));
        assert_eq!(parse_block_number(&json!(100)).unwrap(), BlockNumber::Number(100));
    }

    #[test]
    fn test_parse_block_number_invalid() {
        assert!(parse_block_number(&json!("safe")).is_err());
        assert!(parse_block_number(&json!(-1)).is_err());
        assert!(parse_block_number(&json!(true)).is_err());
    }

    #[test]
    fn test_parse_block_number_or_hash_forms() {
        let hash = "0x00000000000000000000000000000000000000000000000000000000000000ff";
        assert!(matches!(
            parse_block_number_or_hash(&json!(hash)).unwrap(),
            BlockNumberOrHash::Hash(_)
        ));
        assert_eq!(
            parse_block_number_or_hash(&json!("0x5")).unwrap(),
            BlockNumberOrHash::Number(BlockNumber::Number(5))
        );
        assert_eq!(
            parse_block_number_or_hash(&json!({"blockNumber": "latest"})).unwrap(),
            BlockNumberOrHash::Number(BlockNumber::Latest)
        );
        match parse_block_number_or_hash(&json!({ "blockHash": hash })).unwrap() {
            BlockNumberOrHash::Hash(h) => assert_eq!(h.as_bytes()[31], 0xff),
            other => panic!("expected hash, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_block_number_or_hash_ambiguous_object() {
        let value = json!({"blockNumber": "0x1", "blockHash": "0x00"});
        assert!(parse_block_number_or_hash(&value).is_err());
        assert!(parse_block_number_or_hash(&json!({})).is_err());
    }

    // ===== Address / Hash Parsing Tests =====

    #[test]
    fn test_parse_address_valid() {
        let addr = parse_address(&json!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")).unwrap();
        assert_eq!(addr.as_bytes()[0], 0xf3);
        assert_eq!(addr.as_bytes()[19], 0x66);
    }

    #[test]
    fn test_parse_address_invalid() {
        assert!(parse_address(&json!(123)).is_err());
        assert!(parse_address(&json!("0xGGGG")).is_err());
        assert!(parse_address(&json!("0x1234")).is_err());
    }

    #[test]
    fn test_parse_h256_invalid_length() {
        assert!(parse_h256(&json!("0x1234")).is_err());
    }

    #[test]
    fn test_parse_topics() {
        let topic = "0x0000000000000000000000000000000000000000000000000000000000000001";
        assert_eq!(parse_topics(Some(&json!([topic, topic]))).unwrap().len(), 2);
        assert!(parse_topics(None).unwrap().is_empty());
        assert!(parse_topics(Some(&Value::Null)).unwrap().is_empty());
        assert!(parse_topics(Some(&json!(topic))).is_err());
    }

    // ===== Quantity Parsing Tests =====

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64(&json!("0xff")).unwrap(), 255);
        assert_eq!(parse_u64(&json!(7)).unwrap(), 7);
        assert!(parse_u64(&json!("0xzz")).is_err());
        assert_eq!(parse_u64_or_zero(None).unwrap(), 0);
        assert_eq!(parse_u64_or_zero(Some(&Value::Null)).unwrap(), 0);
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert!(parse_hex_bytes(&json!("0x")).unwrap().is_empty());
        assert_eq!(parse_hex_bytes(&json!("abcd")).unwrap(), vec![0xab, 0xcd]);
    }

    // ===== Formatting Tests =====

    #[test]
    fn test_format_u64() {
        assert_eq!(format_u64(0), "0x0");
        assert_eq!(format_u64(255), "0xff");
    }

    #[test]
    fn test_format_u256() {
        assert_eq!(format_u256(&U256::zero()), "0x0");
        assert_eq!(
            format_u256(&U256::from(1_000_000_000_000_000_000u64)),
            "0xde0b6b3a7640000"
        );
    }

    #[test]
    fn test_format_address_is_not_abbreviated() {
        let addr = H160::repeat_byte(0xab);
        assert_eq!(format_address(&addr), format!("0x{}", "ab".repeat(20)));
        assert_eq!(format_h256(&H256::zero()).len(), 66);
    }

    // ===== JSON-RPC Envelope Tests =====

    #[test]
    fn test_json_rpc_request_no_params() {
        let json = r#"{"jsonrpc": "2.0", "id": 1, "method": "sbch_validatorsInfo"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, JsonRpcId::Number(1));
        assert!(req.params.is_empty());
    }

    #[test]
    fn test_json_rpc_id_default() {
        assert_eq!(JsonRpcId::default(), JsonRpcId::Null);
    }

    #[test]
    fn test_json_rpc_response_success_serialize() {
        let response = JsonRpcResponse::success(JsonRpcId::Number(1), json!("0x10"));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"result\":\"0x10\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_json_rpc_response_error_serialize() {
        let response = JsonRpcResponse::error(
            JsonRpcId::String("a".into()),
            JsonRpcError::invalid_params("missing parameter"),
        );
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":-32602"));
        assert!(!json.contains("\"result\""));
    }

    // ===== Call Request Tests =====

    #[test]
    fn test_call_request_defaults() {
        let raw: CallRequestRaw = serde_json::from_str("{}").unwrap();
        let (from, tx) = CallArgs::from_raw(raw).unwrap().into_call_tx();
        assert!(from.is_zero());
        assert!(tx.to.is_none());
        assert_eq!(tx.gas, DEFAULT_CALL_GAS);
        assert!(tx.gas_price.is_zero());
        assert!(tx.value.is_zero());
        assert!(tx.data.is_empty());
    }

    #[test]
    fn test_call_request_full() {
        let json = r#"{
            "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "to": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "gas": "0x5208",
            "gasPrice": "0x3b9aca00",
            "value": "0xde0b6b3a7640000",
            "input": "0xabcd"
        }"#;
        let raw: CallRequestRaw = serde_json::from_str(json).unwrap();
        let (from, tx) = CallArgs::from_raw(raw).unwrap().into_call_tx();
        assert_eq!(from.as_bytes()[0], 0xf3);
        assert_eq!(tx.to.unwrap().as_bytes()[0], 0x70);
        assert_eq!(tx.gas, 21000);
        assert_eq!(tx.gas_price, U256::from(1_000_000_000u64));
        assert_eq!(tx.data, vec![0xab, 0xcd]);
    }

    #[test]
    fn test_call_request_invalid_from() {
        let raw = CallRequestRaw {
            from: Some("invalid".to_string()),
            ..Default::default()
        };
        assert!(CallArgs::from_raw(raw).is_err());
    }

    #[test]
    fn test_call_request_data_decoding() {
        let raw = CallRequestRaw {
            data: Some("a9059cbb".to_string()),
            ..Default::default()
        };
        let (_, tx) = CallArgs::from_raw(raw).unwrap().into_call_tx();
        assert_eq!(tx.data, vec![0xa9, 0x05, 0x9c, 0xbb]);

        let raw = CallRequestRaw {
            data: Some("0xzz".to_string()),
            ..Default::default()
        };
        let err = CallArgs::from_raw(raw).unwrap_err();
        assert_eq!(err.code, crate::error::error_code::INVALID_PARAMS);
        assert!(err.message.contains("invalid hex data"));
    }
}
