//! Port traits: the hexagonal boundary between the agent core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AgentService (core)
//! ```
//!
//! Driven adapters (GPIO, cloud transport, timers, network query) implement
//! these traits.  The [`AgentService`](super::service::AgentService) and
//! the twin/RPC components consume them via generics, so the core never
//! touches hardware or sockets directly.
//!
//! All port calls are synchronous and bounded; the single-threaded outer
//! loop serialises every call.

use core::fmt;

use crate::error::HardwareError;
use crate::twin::property::{GpioLine, LineLevel};

use super::messages::{InboundMessage, OutboundMessage};

// ───────────────────────────────────────────────────────────────
// Hardware port (driven adapter: core ↔ GPIO)
// ───────────────────────────────────────────────────────────────

/// Digital I/O on the board's GPIO lines.
pub trait HardwarePort {
    /// Open `line` as a push-pull output driven to `initial`.
    fn configure_output(&mut self, line: GpioLine, initial: LineLevel) -> Result<(), HardwareError>;

    /// Sample the current level of `line`.
    fn read_state(&mut self, line: GpioLine) -> Result<LineLevel, HardwareError>;

    /// Drive `line` to `level`.
    fn write_state(&mut self, line: GpioLine, level: LineLevel) -> Result<(), HardwareError>;
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: core ↔ cloud session)
// ───────────────────────────────────────────────────────────────

/// Cloud session.  Connection management, retries and TLS trust all live
/// behind this trait.
pub trait TransportPort {
    /// Whether a cloud session is currently established.
    fn connected(&self) -> bool;

    /// Hand an outbound message to the transport, which owns it from here on.
    fn deliver(&mut self, message: OutboundMessage) -> Result<(), TransportError>;

    /// Next inbound message, if one is pending.  Never blocks.
    fn poll(&mut self) -> Option<InboundMessage>;
}

/// Errors from [`TransportPort::deliver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No cloud session.
    NotConnected,
    /// The underlying channel is closed.
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Closed => write!(f, "channel closed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Periodic timer (driven adapter: core → sensor poll timer)
// ───────────────────────────────────────────────────────────────

/// The sensor-poll timer whose period `setSensorPollTime` changes.
pub trait PeriodicTimer {
    fn set_period(&mut self, seconds: u32);
}

// ───────────────────────────────────────────────────────────────
// Network info (driven adapter: core ← network interface)
// ───────────────────────────────────────────────────────────────

/// Snapshot of the currently associated WiFi network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub ssid: String,
    pub frequency_mhz: u32,
    pub bssid: [u8; 6],
}

impl NetworkInfo {
    /// `aa:bb:cc:dd:ee:ff`
    pub fn bssid_string(&self) -> String {
        let b = &self.bssid;
        format!(
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

pub trait NetworkInfoPort {
    /// `None` while not associated with any network.
    fn current_network(&mut self) -> Option<NetworkInfo>;
}
