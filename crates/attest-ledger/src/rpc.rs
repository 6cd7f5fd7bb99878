//! # JSON-RPC Transport
//!
//! A minimal `eth_call` client over reqwest. One request per call; no
//! batching and no retry.

use std::time::Duration;

use attest_core::{Address, NetworkId};
use url::Url;

use crate::abi::{AbiWord, Calldata};
use crate::error::LedgerError;

/// Shared HTTP client for every configured network.
#[derive(Debug, Clone)]
pub struct JsonRpc {
    client: reqwest::Client,
}

impl JsonRpc {
    /// Build a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unavailable`] if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Send a JSON-RPC request and return the `result` field.
    pub async fn call(
        &self,
        network: &NetworkId,
        url: &Url,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, LedgerError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let resp = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LedgerError::Timeout {
                        network: network.clone(),
                    }
                } else {
                    LedgerError::Http {
                        network: network.clone(),
                        source: e,
                    }
                }
            })?;

        if !resp.status().is_success() {
            return Err(LedgerError::Status {
                network: network.clone(),
                status: resp.status().as_u16(),
            });
        }

        let json: serde_json::Value = resp.json().await.map_err(|e| LedgerError::Decode {
            query: "json-rpc",
            reason: format!("invalid JSON response from {network}: {e}"),
        })?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown RPC error");
            return Err(LedgerError::Rpc {
                network: network.clone(),
                message: message.to_string(),
            });
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| LedgerError::Decode {
                query: "json-rpc",
                reason: format!("response from {network} missing 'result' field"),
            })
    }

    /// `eth_call` against `to` at the latest block, decoding one word.
    pub async fn eth_call(
        &self,
        query: &'static str,
        network: &NetworkId,
        url: &Url,
        to: &Address,
        data: &Calldata,
    ) -> Result<AbiWord, LedgerError> {
        let tx = serde_json::json!({
            "to": to.as_str(),
            "data": data.to_hex(),
        });
        let result = self
            .call(network, url, "eth_call", serde_json::json!([tx, "latest"]))
            .await?;
        let raw = result.as_str().ok_or_else(|| LedgerError::Decode {
            query,
            reason: "eth_call returned non-string result".to_string(),
        })?;
        tracing::debug!(%network, query, "eth_call answered");
        AbiWord::from_hex(query, raw)
    }
}
