//! Request handler and method dispatcher

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::api::SbchApi;
use crate::error::JsonRpcError;
use crate::methods::sbch;
use crate::types::{JsonRpcRequest, JsonRpcResponse};

/// Boxed future returned by a method handler
pub type MethodFuture = Pin<Box<dyn Future<Output = Result<Value, JsonRpcError>> + Send>>;

/// Type alias for async method handler
pub type MethodFn = Box<dyn Fn(Arc<SbchApi>, Vec<Value>) -> MethodFuture + Send + Sync>;

/// Method registry for dispatching RPC calls
pub struct MethodRegistry {
    methods: HashMap<String, MethodFn>,
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRegistry {
    /// Create a new method registry with all methods registered
    pub fn new() -> Self {
        let mut registry = Self {
            methods: HashMap::new(),
        };

        registry.register("sbch_getStandbyTxQueue", sbch::sbch_get_standby_tx_queue);
        registry.register("sbch_queryTxBySrc", sbch::sbch_query_tx_by_src);
        registry.register("sbch_queryTxByDst", sbch::sbch_query_tx_by_dst);
        registry.register("sbch_queryTxByAddr", sbch::sbch_query_tx_by_addr);
        registry.register("sbch_queryLogs", sbch::sbch_query_logs);
        registry.register("sbch_getTxListByHeight", sbch::sbch_get_tx_list_by_height);
        registry.register(
            "sbch_getTxListByHeightWithRange",
            sbch::sbch_get_tx_list_by_height_with_range,
        );
        registry.register("sbch_getAddressCount", sbch::sbch_get_address_count);
        registry.register("sbch_getSep20AddressCount", sbch::sbch_get_sep20_address_count);
        registry.register("sbch_getEpochs", sbch::sbch_get_epochs);
        registry.register("sbch_getEpochs2", sbch::sbch_get_epochs2);
        registry.register("sbch_getCurrEpoch", sbch::sbch_get_curr_epoch);
        registry.register("sbch_getCCEpochs", sbch::sbch_get_cc_epochs);
        registry.register("sbch_getCCEpochs2", sbch::sbch_get_cc_epochs2);
        registry.register("sbch_healthCheck", sbch::sbch_health_check);
        registry.register("sbch_getTransactionReceipt", sbch::sbch_get_transaction_receipt);
        registry.register("sbch_call", sbch::sbch_call);
        registry.register("sbch_validatorsInfo", sbch::sbch_validators_info);

        registry
    }

    /// Register a method handler
    pub fn register<F, Fut>(&mut self, name: &str, handler: F)
    where
        F: Fn(Arc<SbchApi>, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, JsonRpcError>> + Send + 'static,
    {
        self.methods.insert(
            name.to_string(),
            Box::new(move |api, params| Box::pin(handler(api, params))),
        );
    }

    /// Dispatch a method call
    pub async fn dispatch(
        &self,
        api: Arc<SbchApi>,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, JsonRpcError> {
        match self.methods.get(method) {
            Some(handler) => handler(api, params).await,
            None => Err(JsonRpcError::method_not_found(method)),
        }
    }

    /// Check if a method is registered
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Get list of registered methods
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(|s| s.as_str()).collect()
    }
}

/// RPC request handler
pub struct RpcHandler {
    api: Arc<SbchApi>,
    registry: MethodRegistry,
}

impl RpcHandler {
    /// Create a new RPC handler
    pub fn new(api: Arc<SbchApi>) -> Self {
        Self {
            api,
            registry: MethodRegistry::new(),
        }
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request("invalid JSON-RPC version"),
            );
        }

        match self
            .registry
            .dispatch(self.api.clone(), &request.method, request.params)
            .await
        {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => {
                tracing::debug!(method = %request.method, code = error.code, "request failed");
                JsonRpcResponse::error(request.id, error)
            }
        }
    }

    /// Get the facade
    pub fn api(&self) -> &Arc<SbchApi> {
        &self.api
    }
}
