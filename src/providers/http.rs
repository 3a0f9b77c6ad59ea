//! JSON-RPC 2.0 provider over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::Provider;
use crate::common::error::ProviderError;

/// [`Provider`] implementation speaking JSON-RPC 2.0 to an HTTP endpoint.
pub struct HttpProvider {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<String, ProviderError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        log::debug!("rpc request: {method}");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        match envelope.result {
            Some(Value::String(hex)) => Ok(hex),
            Some(other) => Err(ProviderError::InvalidResponse(format!(
                "expected hex string result, got {other}"
            ))),
            None => Err(ProviderError::InvalidResponse(
                "response carried neither result nor error".to_string(),
            )),
        }
    }
}
