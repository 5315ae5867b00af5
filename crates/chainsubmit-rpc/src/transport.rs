//! The `RpcTransport` trait — the abstraction every JSON-RPC endpoint sits behind.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// The central async trait every RPC transport must implement.
///
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;
}

/// Call `method` and deserialize its result.
pub async fn call<T: DeserializeOwned>(
    transport: &dyn RpcTransport,
    id: u64,
    method: &str,
    params: Vec<Value>,
) -> Result<T, TransportError> {
    let req = JsonRpcRequest::new(id, method, params);
    let resp = transport.send(req).await?;
    let result = resp.into_result().map_err(TransportError::Rpc)?;
    serde_json::from_value(result).map_err(TransportError::Deserialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::JsonRpcError;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl RpcTransport for Echo {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            match req.method.as_str() {
                "eth_chainId" => Ok(JsonRpcResponse::success(1, json!("0x89"))),
                _ => Ok(JsonRpcResponse::failure(
                    1,
                    JsonRpcError {
                        code: -32601,
                        message: "method not found".into(),
                        data: None,
                    },
                )),
            }
        }

        fn url(&self) -> &str {
            "echo://"
        }
    }

    #[tokio::test]
    async fn call_deserializes_result() {
        let chain: String = call(&Echo, 1, "eth_chainId", vec![]).await.unwrap();
        assert_eq!(chain, "0x89");
    }

    #[tokio::test]
    async fn call_surfaces_rpc_errors() {
        let err = call::<String>(&Echo, 1, "eth_foo", vec![]).await.unwrap_err();
        assert_eq!(err.rpc_error().map(|e| e.code), Some(-32601));
        assert!(!err.is_retryable());
    }
}
