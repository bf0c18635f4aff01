//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full GPIO and
//! transport history without touching real lines or a cloud session.

use std::collections::{HashMap, HashSet, VecDeque};

use twinlink::app::messages::{InboundMessage, OutboundMessage};
use twinlink::app::ports::{
    HardwarePort, NetworkInfo, NetworkInfoPort, PeriodicTimer, TransportError, TransportPort,
};
use twinlink::error::HardwareError;
use twinlink::twin::property::{GpioLine, LineLevel};

// ── GPIO call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioCall {
    Configure(GpioLine, LineLevel),
    Write(GpioLine, LineLevel),
}

// ── MockGpio ──────────────────────────────────────────────────

/// Lines idle HIGH.  Lines in `fail_writes` / `fail_reads` error out.
#[derive(Default)]
pub struct MockGpio {
    pub calls: Vec<GpioCall>,
    pub levels: HashMap<GpioLine, LineLevel>,
    pub fail_writes: HashSet<GpioLine>,
    pub fail_reads: HashSet<GpioLine>,
    pub fail_configure: HashSet<GpioLine>,
}

#[allow(dead_code)]
impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, line: GpioLine) -> LineLevel {
        self.levels.get(&line).copied().unwrap_or(LineLevel::High)
    }

    pub fn press(&mut self, line: GpioLine) {
        self.levels.insert(line, LineLevel::Low);
    }

    pub fn release(&mut self, line: GpioLine) {
        self.levels.insert(line, LineLevel::High);
    }

    pub fn writes(&self) -> Vec<(GpioLine, LineLevel)> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                GpioCall::Write(l, v) => Some((l, v)),
                GpioCall::Configure(..) => None,
            })
            .collect()
    }
}

impl HardwarePort for MockGpio {
    fn configure_output(&mut self, line: GpioLine, initial: LineLevel) -> Result<(), HardwareError> {
        if self.fail_configure.contains(&line) {
            return Err(HardwareError::OpenFailed(line));
        }
        self.calls.push(GpioCall::Configure(line, initial));
        self.levels.insert(line, initial);
        Ok(())
    }

    fn read_state(&mut self, line: GpioLine) -> Result<LineLevel, HardwareError> {
        if self.fail_reads.contains(&line) {
            return Err(HardwareError::ReadFailed(line));
        }
        Ok(self.level(line))
    }

    fn write_state(&mut self, line: GpioLine, level: LineLevel) -> Result<(), HardwareError> {
        if self.fail_writes.contains(&line) {
            return Err(HardwareError::WriteFailed(line));
        }
        self.calls.push(GpioCall::Write(line, level));
        self.levels.insert(line, level);
        Ok(())
    }
}

// ── MockTransport ─────────────────────────────────────────────

pub struct MockTransport {
    pub connected: bool,
    pub inbound: VecDeque<InboundMessage>,
    pub sent: Vec<OutboundMessage>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            connected: true,
            inbound: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    pub fn push_desired(&mut self, json: &str) {
        self.inbound
            .push_back(InboundMessage::DesiredProperties(json.to_string()));
    }

    pub fn push_method(&mut self, name: &str, payload: &[u8]) {
        self.inbound.push_back(InboundMessage::MethodCall {
            name: name.to_string(),
            payload: payload.to_vec(),
        });
    }

    pub fn reported(&self) -> Vec<String> {
        self.sent
            .iter()
            .filter_map(|m| match m {
                OutboundMessage::ReportedProperties(r) => Some(r.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn telemetry(&self) -> Vec<String> {
        self.sent
            .iter()
            .filter_map(|m| match m {
                OutboundMessage::Telemetry(t) => Some(t.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn responses(&self) -> Vec<(u16, String)> {
        self.sent
            .iter()
            .filter_map(|m| match m {
                OutboundMessage::MethodResponse(r) => Some((r.status_code(), r.payload.clone())),
                _ => None,
            })
            .collect()
    }
}

impl TransportPort for MockTransport {
    fn connected(&self) -> bool {
        self.connected
    }

    fn deliver(&mut self, message: OutboundMessage) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.sent.push(message);
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        self.inbound.pop_front()
    }
}

// ── MockTimer ─────────────────────────────────────────────────

/// Shares its recorded periods with the test through an `Rc`.
#[derive(Clone, Default)]
pub struct MockTimer {
    pub periods: std::rc::Rc<std::cell::RefCell<Vec<u32>>>,
}

impl PeriodicTimer for MockTimer {
    fn set_period(&mut self, seconds: u32) {
        self.periods.borrow_mut().push(seconds);
    }
}

// ── MockNetwork ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockNetwork {
    pub info: Option<NetworkInfo>,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn associated(ssid: &str) -> Self {
        Self {
            info: Some(NetworkInfo {
                ssid: ssid.to_string(),
                frequency_mhz: 5180,
                bssid: [0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22],
            }),
        }
    }
}

impl NetworkInfoPort for MockNetwork {
    fn current_network(&mut self) -> Option<NetworkInfo> {
        self.info.clone()
    }
}
