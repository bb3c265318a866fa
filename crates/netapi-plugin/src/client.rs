// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-RPC 2.0 client for remote vendor plugins.
//!
//! Each capability maps to one remote method. Secret devices are called with
//! `[host, username, secret]`, token devices with `[host, token]`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use netapi_config::model::PluginConfig;
use netapi_core::{CallAuth, CallTarget, Capability, NetApiError, Payload, VendorPlugin};

#[derive(Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// A vendor plugin reached over HTTP.
///
/// Holds one `reqwest::Client` for its lifetime, so connections to the
/// plugin are pooled and reused across calls.
#[derive(Debug)]
pub struct JsonRpcPluginClient {
    vendor: String,
    endpoint: String,
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcPluginClient {
    /// Build a client for `config`. No connection is attempted here.
    pub fn new(
        config: &PluginConfig,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, NetApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| NetApiError::Config(format!("failed to build HTTP client: {e}")))?;

        let endpoint = config.endpoint();
        Ok(Self {
            vendor: config.vendor.clone(),
            url: format!("http://{endpoint}/"),
            endpoint,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// `host:port` of the plugin server.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn params(target: &CallTarget<'_>) -> Vec<Value> {
        match target.auth {
            CallAuth::Secret { username, secret } => {
                vec![json!(target.host), json!(username), json!(secret)]
            }
            CallAuth::Token(token) => vec![json!(target.host), json!(token)],
        }
    }

    fn plugin_error(&self, message: impl Into<String>) -> NetApiError {
        NetApiError::Plugin {
            vendor: self.vendor.clone(),
            message: message.into(),
        }
    }

    fn classify_transport(&self, err: reqwest::Error) -> NetApiError {
        if err.is_connect() {
            NetApiError::ConnectionRefused {
                vendor: self.vendor.clone(),
                endpoint: self.endpoint.clone(),
            }
        } else if err.is_timeout() {
            self.plugin_error("request timed out")
        } else {
            self.plugin_error(format!("request failed: {err}"))
        }
    }

    async fn call(
        &self,
        capability: Capability,
        target: &CallTarget<'_>,
    ) -> Result<Payload, NetApiError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: capability.remote_method(),
            params: Self::params(target),
        };
        debug!(
            vendor = %self.vendor,
            method = request.method,
            id = request.id,
            "sending plugin request"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.plugin_error(format!("HTTP {status}")));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| self.plugin_error(format!("malformed response: {e}")))?;

        match body {
            RpcResponse {
                error: Some(err), ..
            } => Err(self.plugin_error(format!("{} (code {})", err.message, err.code))),
            RpcResponse { result, .. } => Ok(result.unwrap_or(Value::Null)),
        }
    }
}

#[async_trait]
impl VendorPlugin for JsonRpcPluginClient {
    fn vendor(&self) -> &str {
        &self.vendor
    }

    async fn device_info(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.call(Capability::DeviceInfo, target).await
    }

    async fn hardware(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.call(Capability::Hardware, target).await
    }

    async fn interfaces(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.call(Capability::Interfaces, target).await
    }

    async fn lldp_neighbors(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.call(Capability::LldpNeighbors, target).await
    }

    async fn mac_table(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.call(Capability::MacTable, target).await
    }

    async fn ospf_state(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.call(Capability::OspfState, target).await
    }

    async fn routing_table(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.call(Capability::RoutingTable, target).await
    }

    async fn vlans(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.call(Capability::Vlans, target).await
    }
}
