// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock vendor plugin for deterministic testing.
//!
//! `MockPlugin` implements `VendorPlugin`, answers from a FIFO queue of
//! outcomes, and records each call together with the auth convention used.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use netapi_core::{CallAuth, CallTarget, Capability, NetApiError, Payload, VendorPlugin};

/// Authentication arguments as the plugin received them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAuth {
    Secret { username: String, secret: String },
    Token(String),
}

/// One call received by a [`MockPlugin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub capability: Capability,
    pub host: String,
    pub auth: RecordedAuth,
}

enum Outcome {
    Payload(Payload),
    Refused,
    Fail(String),
}

/// A plugin that returns queued outcomes.
///
/// When the queue is empty it answers with
/// `{"vendor": ..., "capability": ..., "host": ...}`.
pub struct MockPlugin {
    vendor: String,
    outcomes: Arc<Mutex<VecDeque<Outcome>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockPlugin {
    pub fn new(vendor: &str) -> Self {
        Self {
            vendor: vendor.to_string(),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Hold each call open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_payload(&self, payload: Payload) {
        self.outcomes.lock().await.push_back(Outcome::Payload(payload));
    }

    /// Queue a connection-refused failure.
    pub async fn push_refused(&self) {
        self.outcomes.lock().await.push_back(Outcome::Refused);
    }

    /// Queue a plugin failure carrying `message`.
    pub async fn push_error(&self, message: &str) {
        self.outcomes
            .lock()
            .await
            .push_back(Outcome::Fail(message.to_string()));
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Highest number of calls observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn handle(
        &self,
        capability: Capability,
        target: &CallTarget<'_>,
    ) -> Result<Payload, NetApiError> {
        let auth = match target.auth {
            CallAuth::Secret { username, secret } => RecordedAuth::Secret {
                username: username.to_string(),
                secret: secret.to_string(),
            },
            CallAuth::Token(token) => RecordedAuth::Token(token.to_string()),
        };
        self.calls.lock().await.push(RecordedCall {
            capability,
            host: target.host.to_string(),
            auth,
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.outcomes.lock().await.pop_front() {
            Some(Outcome::Payload(payload)) => Ok(payload),
            Some(Outcome::Refused) => Err(NetApiError::ConnectionRefused {
                vendor: self.vendor.clone(),
                endpoint: "mock".to_string(),
            }),
            Some(Outcome::Fail(message)) => Err(NetApiError::Plugin {
                vendor: self.vendor.clone(),
                message,
            }),
            None => Ok(json!({
                "vendor": self.vendor,
                "capability": capability.to_string(),
                "host": target.host,
            })),
        }
    }
}

#[async_trait]
impl VendorPlugin for MockPlugin {
    fn vendor(&self) -> &str {
        &self.vendor
    }

    async fn device_info(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.handle(Capability::DeviceInfo, target).await
    }

    async fn hardware(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.handle(Capability::Hardware, target).await
    }

    async fn interfaces(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.handle(Capability::Interfaces, target).await
    }

    async fn lldp_neighbors(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.handle(Capability::LldpNeighbors, target).await
    }

    async fn mac_table(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.handle(Capability::MacTable, target).await
    }

    async fn ospf_state(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.handle(Capability::OspfState, target).await
    }

    async fn routing_table(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.handle(Capability::RoutingTable, target).await
    }

    async fn vlans(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError> {
        self.handle(Capability::Vlans, target).await
    }
}
