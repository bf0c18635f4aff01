//! Twin reconciler: applies desired properties to local state and
//! hardware, and produces the reported-state acknowledgements.
//!
//! ```text
//! DesiredDocument ──▶ decode (per kind) ──▶ GPIO write (if bound)
//!                                             │ ok        │ err
//!                                             ▼           ▼
//!                                     store + report   termination flag
//! ```
//!
//! The session version is the last `$version` seen.  It is echoed in every
//! acknowledgement until a newer document replaces it; versions are taken
//! as they come, without ordering checks.

use log::{error, info, warn};

use crate::app::ports::HardwarePort;
use crate::error::{Error, HardwareError};
use crate::termination::{FatalReason, TerminationFlag};

use super::document::{DecodeError, DesiredDocument, decode_value};
use super::encoder::{Dialect, ReportBuffer, ReportedDocument, ReportedStateEncoder};
use super::property::{HardwareBinding, PropertyKind, PropertyValue};
use super::registry::PropertyRegistry;

/// Result of applying one desired document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Encoded acknowledgements, in registry order.
    pub reports: Vec<ReportBuffer>,
    /// Properties whose new value was applied.
    pub applied: usize,
    /// Properties present in the document but skipped (bad type,
    /// unimplemented kind, report too large).
    pub skipped: usize,
    /// A hardware write failed and termination was requested.
    pub fatal: bool,
}

pub struct TwinReconciler {
    dialect: Dialect,
    encoder: ReportedStateEncoder,
    session_version: i64,
}

impl TwinReconciler {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            encoder: ReportedStateEncoder::new(),
            session_version: 0,
        }
    }

    /// Latest desired version seen this session (0 before any).
    pub fn session_version(&self) -> i64 {
        self.session_version
    }

    /// Apply `doc` to the registry slots and bound output lines.
    ///
    /// A failed hardware write requests termination and stops processing:
    /// the failing property keeps its previous slot value and is not
    /// acknowledged.
    pub fn apply(
        &mut self,
        doc: &DesiredDocument,
        registry: &mut PropertyRegistry,
        hw: &mut impl HardwarePort,
        termination: &TerminationFlag,
    ) -> ReconcileOutcome {
        if let Some(version) = doc.version() {
            self.session_version = version;
        }

        let mut outcome = ReconcileOutcome::default();

        let targets: Vec<(&'static str, PropertyKind, Option<HardwareBinding>)> = registry
            .iter()
            .filter(|d| doc.contains(d.key()))
            .map(|d| (d.key(), d.kind(), d.binding()))
            .collect();

        for (key, kind, binding) in targets {
            let Some(raw) = doc.raw(key) else { continue };

            let value = match decode_value(raw, kind) {
                Ok(v) => v,
                Err(DecodeError::Unsupported(kind)) => {
                    warn!("twin: desired {:?} property '{}' not implemented, skipped", kind, key);
                    outcome.skipped += 1;
                    continue;
                }
                Err(DecodeError::TypeMismatch(kind)) => {
                    warn!("twin: '{}' expects {:?}, got {}, skipped", key, kind, raw);
                    outcome.skipped += 1;
                    continue;
                }
            };

            if let Some(binding) = binding {
                if let Err(e) = drive(binding, &value, hw) {
                    error!("twin: could not set '{}' ({}), local and physical state diverge", key, e);
                    termination.request(FatalReason::HardwareWrite);
                    outcome.fatal = true;
                    return outcome;
                }
            }

            registry.store(key, value.clone());
            outcome.applied += 1;
            info!("twin: received device update, new {} is {}", key, value);

            match self.encoder.encode(&ReportedDocument {
                key,
                value: &value,
                dialect: self.dialect,
                desired_version: self.session_version,
            }) {
                Ok(report) => outcome.reports.push(report),
                Err(e) => {
                    warn!("twin: report for '{}' dropped: {}", key, e);
                    outcome.skipped += 1;
                }
            }
        }

        outcome
    }

    /// Record a locally originated value (sensor read, network metadata)
    /// and encode a plain report for it.
    pub fn report_local(
        &self,
        registry: &mut PropertyRegistry,
        key: &'static str,
        value: PropertyValue,
    ) -> Result<ReportBuffer, Error> {
        let report = self.encoder.encode(&ReportedDocument {
            key,
            value: &value,
            dialect: Dialect::Plain,
            desired_version: self.session_version,
        });
        match registry.store(key, value) {
            None => return Err(Error::UnknownProperty(key)),
            Some(false) => return Err(Error::KindMismatch(key)),
            Some(true) => {}
        }
        Ok(report?)
    }

    /// Configure every bound line as an output at the level matching its
    /// slot's current value.
    pub fn initialize_hardware(
        registry: &PropertyRegistry,
        hw: &mut impl HardwarePort,
    ) -> Result<(), HardwareError> {
        for d in registry.iter() {
            let Some(binding) = d.binding() else { continue };
            let on = d.value().as_logical().unwrap_or(false);
            hw.configure_output(binding.line, binding.level_for(on))?;
            info!("twin: GPIO {} -> '{}' ({})", binding.line, d.key(), if on { "on" } else { "off" });
        }
        Ok(())
    }

    /// Drive every bound line to its inactive level (teardown).
    pub fn release_hardware(registry: &PropertyRegistry, hw: &mut impl HardwarePort) {
        registry.for_each(|d| {
            if let Some(binding) = d.binding() {
                if let Err(e) = hw.write_state(binding.line, binding.inactive_level()) {
                    warn!("twin: release of '{}' failed: {}", d.key(), e);
                }
            }
        });
    }
}

fn drive(
    binding: HardwareBinding,
    value: &PropertyValue,
    hw: &mut impl HardwarePort,
) -> Result<(), HardwareError> {
    // Registry admission guarantees bound properties have a logical view.
    let on = value.as_logical().unwrap_or(false);
    hw.write_state(binding.line, binding.level_for(on))
}
