//! Agent service: the hexagonal core.
//!
//! [`AgentService`] owns the property registry, the twin reconciler, the
//! method dispatcher and the input monitors.  All I/O flows through port
//! traits injected at call sites, so the whole service runs against mock
//! adapters in tests.
//!
//! ```text
//!  TransportPort ──▶ ┌──────────────────────────┐ ──▶ TransportPort
//!   (inbound)        │       AgentService       │     (reports, responses)
//!                    │ registry · reconciler ·  │
//!  HardwarePort ◀───▶│ dispatcher · monitors    │◀── NetworkInfoPort
//!                    └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::board::BUTTONS;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::network::NetworkReporter;
use crate::rpc::dispatcher::CommandDispatcher;
use crate::telemetry::ButtonMonitor;
use crate::termination::{FatalReason, TerminationFlag};
use crate::twin::document::DesiredDocument;
use crate::twin::encoder::ReportBuffer;
use crate::twin::reconciler::{ReconcileOutcome, TwinReconciler};
use crate::twin::registry::PropertyRegistry;

use super::messages::{InboundMessage, OutboundMessage};
use super::ports::{HardwarePort, NetworkInfoPort, TransportPort};

// ───────────────────────────────────────────────────────────────
// AgentService
// ───────────────────────────────────────────────────────────────

pub struct AgentService {
    registry: PropertyRegistry,
    reconciler: TwinReconciler,
    dispatcher: CommandDispatcher,
    buttons: ButtonMonitor,
    network: NetworkReporter,
    termination: TerminationFlag,
}

impl AgentService {
    /// Assemble the service.  Hardware is untouched until [`start`].
    ///
    /// [`start`]: AgentService::start
    pub fn new(
        config: &AgentConfig,
        registry: PropertyRegistry,
        dispatcher: CommandDispatcher,
        termination: TerminationFlag,
    ) -> Self {
        Self {
            registry,
            reconciler: TwinReconciler::new(config.dialect),
            dispatcher,
            buttons: ButtonMonitor::new(&BUTTONS),
            network: NetworkReporter::new(config.version_string.clone()),
            termination,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Open every bound output at its initial level.  Any failure aborts
    /// startup.
    pub fn start(&mut self, hw: &mut impl HardwarePort) -> Result<()> {
        TwinReconciler::initialize_hardware(&self.registry, hw)?;
        info!(
            "agent: started, {} properties, methods [{}]",
            self.registry.len(),
            self.dispatcher.method_names().collect::<Vec<_>>().join(", ")
        );
        Ok(())
    }

    /// Drive every output to its inactive level.
    pub fn shutdown(&mut self, hw: &mut impl HardwarePort) {
        TwinReconciler::release_hardware(&self.registry, hw);
        match self.termination.reason() {
            Some(reason) => info!("agent: stopped ({:?})", reason),
            None => info!("agent: stopped"),
        }
    }

    pub fn should_terminate(&self) -> bool {
        self.termination.is_set()
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One pass of the main loop: drain inbound messages, then sample
    /// buttons and network state.
    pub fn run_once(
        &mut self,
        hw: &mut impl HardwarePort,
        net: &mut impl NetworkInfoPort,
        transport: &mut impl TransportPort,
    ) {
        while !self.should_terminate() {
            let Some(msg) = transport.poll() else { break };
            self.handle_inbound(msg, hw, transport);
        }
        if self.should_terminate() {
            return;
        }
        self.poll_inputs(hw, net, transport);
    }

    pub fn handle_inbound(
        &mut self,
        msg: InboundMessage,
        hw: &mut impl HardwarePort,
        transport: &mut impl TransportPort,
    ) {
        match msg {
            InboundMessage::DesiredProperties(text) => {
                if let Err(e) = self.apply_desired(&text, hw, transport) {
                    warn!("agent: desired document rejected: {}", e);
                }
            }
            InboundMessage::MethodCall { name, payload } => {
                self.call_method(&name, &payload, transport);
            }
        }
    }

    /// Reconcile a desired-properties document and deliver every
    /// acknowledgement.  An unparseable document changes nothing and
    /// surfaces as [`crate::Error::Document`].
    pub fn apply_desired(
        &mut self,
        text: &str,
        hw: &mut impl HardwarePort,
        transport: &mut impl TransportPort,
    ) -> Result<ReconcileOutcome> {
        let doc = DesiredDocument::parse(text)?;
        let outcome = self
            .reconciler
            .apply(&doc, &mut self.registry, hw, &self.termination);
        for report in &outcome.reports {
            send(transport, OutboundMessage::ReportedProperties(report.clone()));
        }
        Ok(outcome)
    }

    /// Dispatch a direct method and deliver its response.  Failure to
    /// allocate the response is fatal.
    pub fn call_method(&mut self, name: &str, payload: &[u8], transport: &mut impl TransportPort) {
        match self.dispatcher.dispatch(name, payload) {
            Ok(response) => send(transport, OutboundMessage::MethodResponse(response)),
            Err(e) => {
                warn!("agent: no response for '{}': {}", name, e);
                self.termination.request(FatalReason::Allocation);
            }
        }
    }

    /// Sample buttons, and while connected report network metadata.
    pub fn poll_inputs(
        &mut self,
        hw: &mut impl HardwarePort,
        net: &mut impl NetworkInfoPort,
        transport: &mut impl TransportPort,
    ) {
        for msg in self.buttons.poll(hw, &self.termination) {
            send(transport, OutboundMessage::Telemetry(msg));
        }

        if !transport.connected() {
            return;
        }
        let mut reports: Vec<ReportBuffer> = self.network.poll(net, &mut self.registry, &self.reconciler);
        reports.extend(self.network.report_version(true, &mut self.registry, &self.reconciler));
        for report in reports {
            send(transport, OutboundMessage::ReportedProperties(report));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn session_version(&self) -> i64 {
        self.reconciler.session_version()
    }
}

/// Outbound delivery is best effort: a refused message is logged and
/// dropped.
fn send(transport: &mut impl TransportPort, msg: OutboundMessage) {
    if let Err(e) = deliver(transport, msg) {
        warn!("agent: outbound message dropped: {}", e);
    }
}

fn deliver(transport: &mut impl TransportPort, msg: OutboundMessage) -> Result<()> {
    transport.deliver(msg)?;
    Ok(())
}
