//! Messages exchanged with the cloud transport.
//!
//! Inbound messages are what the [`TransportPort`](super::ports::TransportPort)
//! yields from `poll()`; outbound messages are handed to `deliver()` and are
//! owned by the transport from then on.

use crate::rpc::dispatcher::CommandResponse;
use crate::twin::encoder::ReportBuffer;

/// Requests arriving from the cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Desired-property update (full twin or patch), UTF-8 JSON text.
    DesiredProperties(String),

    /// Direct-method invocation.
    MethodCall { name: String, payload: Vec<u8> },
}

/// Messages the agent sends to the cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// One reported-property document.
    ReportedProperties(ReportBuffer),

    /// Fire-and-forget telemetry, e.g. `{"buttonA":"0"}`.
    Telemetry(ReportBuffer),

    /// Response to a direct-method call.
    MethodResponse(CommandResponse),
}
