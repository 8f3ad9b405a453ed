//! RPC error types

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::backend::BackendError;

/// Standard JSON-RPC 2.0 error codes
pub mod error_code {
    /// Parse error: Invalid JSON was received
    pub const PARSE_ERROR: i64 = -32700;
    /// Invalid Request: The JSON is not a valid Request object
    pub const INVALID_REQUEST: i64 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i64 = -32603;

    /// Backend query failed; the message is the backend's own
    pub const SERVER_ERROR: i64 = -32000;
    /// Method exists but is not implemented
    pub const METHOD_NOT_SUPPORTED: i64 = -32004;
}

/// JSON-RPC error response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Optional additional data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new JSON-RPC error
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create error with additional data
    pub fn with_data(code: i64, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Parse error
    pub fn parse_error() -> Self {
        Self::new(error_code::PARSE_ERROR, "Parse error")
    }

    /// Invalid request
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(error_code::INVALID_REQUEST, message)
    }

    /// Method not found
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_code::METHOD_NOT_FOUND,
            format!("method not found: {}", method),
        )
    }

    /// Invalid params
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(error_code::INVALID_PARAMS, message)
    }

    /// Internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_code::INTERNAL_ERROR, message)
    }

    /// Backend failure, message passed through unchanged
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(error_code::SERVER_ERROR, message)
    }

    /// Method not supported
    pub fn not_supported(method: &str) -> Self {
        Self::new(
            error_code::METHOD_NOT_SUPPORTED,
            format!("method not implemented: {}", method),
        )
    }
}

/// Facade and server errors
#[derive(Debug, Error)]
pub enum RpcError {
    /// Backend query failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The operation is a placeholder with no implementation
    #[error("method not implemented: {0}")]
    NotImplemented(&'static str),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Server bind error
    #[error("failed to bind server: {0}")]
    Bind(#[from] std::io::Error),
}

impl From<RpcError> for JsonRpcError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Backend(e) => JsonRpcError::server_error(e.to_string()),
            RpcError::NotImplemented(method) => JsonRpcError::not_supported(method),
            RpcError::Serialization(e) => JsonRpcError::internal_error(e.to_string()),
            RpcError::Bind(e) => JsonRpcError::internal_error(e.to_string()),
        }
    }
}

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code::PARSE_ERROR, -32700);
        assert_eq!(error_code::INVALID_REQUEST, -32600);
        assert_eq!(error_code::METHOD_NOT_FOUND, -32601);
        assert_eq!(error_code::INVALID_PARAMS, -32602);
        assert_eq!(error_code::INTERNAL_ERROR, -32603);
        assert_eq!(error_code::SERVER_ERROR, -32000);
        assert_eq!(error_code::METHOD_NOT_SUPPORTED, -32004);
    }

    #[test]
    fn test_json_rpc_error_with_data() {
        let data = serde_json::json!({"key": "value"});
        let err = JsonRpcError::with_data(-32000, "custom error", data.clone());
        assert_eq!(err.code, -32000);
        assert_eq!(err.data, Some(data));
    }

    #[test]
    fn test_json_rpc_error_method_not_found() {
        let err = JsonRpcError::method_not_found("sbch_unknown");
        assert_eq!(err.code, error_code::METHOD_NOT_FOUND);
        assert!(err.message.contains("sbch_unknown"));
    }

    #[test]
    fn test_json_rpc_error_serialize_without_data() {
        let err = JsonRpcError::invalid_params("test");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":-32602"));
        assert!(json.contains("\"message\":\"test\""));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_backend_error_passes_message_verbatim() {
        let err: RpcError = BackendError::Query("range too wide".to_string()).into();
        let json_err: JsonRpcError = err.into();
        assert_eq!(json_err.code, error_code::SERVER_ERROR);
        assert_eq!(json_err.message, "range too wide");
    }

    #[test]
    fn test_backend_unavailable_passes_message_verbatim() {
        let err: RpcError = BackendError::Unavailable("db closed".to_string()).into();
        assert_eq!(err.to_string(), "db closed");
    }

    #[test]
    fn test_not_implemented_maps_to_not_supported() {
        let json_err: JsonRpcError = RpcError::NotImplemented("sbch_getStandbyTxQueue").into();
        assert_eq!(json_err.code, error_code::METHOD_NOT_SUPPORTED);
        assert!(json_err.message.contains("sbch_getStandbyTxQueue"));
    }

    #[test]
    fn test_rpc_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let err: RpcError = io_err.into();
        assert!(matches!(err, RpcError::Bind(_)));
    }
}
