//! Minimal JSON-RPC 2.0 client over HTTP

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    data: Option<Value>,
}

pub struct RpcClient {
    url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            url: url.into(),
            token,
            http: reqwest::Client::new(),
        }
    }

    /// Call `method`; the bearer token (if any) is merged into `params`
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params: with_token(params, self.token.as_deref()),
            id: 1,
        };

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to daemon")?
            .json()
            .await
            .context("Failed to parse response")?;

        if let Some(error) = response.error {
            match error.data {
                Some(data) => anyhow::bail!("RPC error ({}): {} {}", error.code, error.message, data),
                None => anyhow::bail!("RPC error ({}): {}", error.code, error.message),
            }
        }

        response
            .result
            .ok_or_else(|| anyhow::anyhow!("No result in response"))
    }
}

fn with_token(params: Value, token: Option<&str>) -> Value {
    match (params, token) {
        (Value::Object(mut map), Some(token)) => {
            map.insert("token".to_string(), Value::String(token.to_string()));
            Value::Object(map)
        }
        (params, _) => params,
    }
}
