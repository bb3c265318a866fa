// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed capability interface implemented by every vendor plugin.

use async_trait::async_trait;

use crate::error::NetApiError;
use crate::types::{CallTarget, Capability, Payload};

/// A vendor-specific handler, one method per capability.
///
/// Implementations report an unreachable endpoint as
/// [`NetApiError::ConnectionRefused`]; every other failure is treated as a
/// plugin error by the dispatcher.
#[async_trait]
pub trait VendorPlugin: Send + Sync + 'static {
    /// Vendor key this plugin serves.
    fn vendor(&self) -> &str;

    async fn device_info(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError>;

    async fn hardware(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError>;

    async fn interfaces(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError>;

    async fn lldp_neighbors(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError>;

    async fn mac_table(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError>;

    async fn ospf_state(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError>;

    async fn routing_table(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError>;

    async fn vlans(&self, target: &CallTarget<'_>) -> Result<Payload, NetApiError>;
}

/// Route a capability to the matching trait method.
pub async fn call_capability(
    plugin: &dyn VendorPlugin,
    capability: Capability,
    target: &CallTarget<'_>,
) -> Result<Payload, NetApiError> {
    match capability {
        Capability::DeviceInfo => plugin.device_info(target).await,
        Capability::Hardware => plugin.hardware(target).await,
        Capability::Interfaces => plugin.interfaces(target).await,
        Capability::LldpNeighbors => plugin.lldp_neighbors(target).await,
        Capability::MacTable => plugin.mac_table(target).await,
        Capability::OspfState => plugin.ospf_state(target).await,
        Capability::RoutingTable => plugin.routing_table(target).await,
        Capability::Vlans => plugin.vlans(target).await,
    }
}
