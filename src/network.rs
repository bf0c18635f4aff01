//! Device metadata reporting: network association and firmware version.
//!
//! These properties are software-only registry entries.  They are
//! reported in the plain dialect whenever the associated SSID changes, and
//! the version string once per session after the first connection.

use log::{info, warn};

use crate::app::ports::NetworkInfoPort;
use crate::twin::encoder::ReportBuffer;
use crate::twin::property::PropertyValue;
use crate::twin::reconciler::TwinReconciler;
use crate::twin::registry::PropertyRegistry;

pub const SSID_KEY: &str = "ssid";
pub const FREQUENCY_KEY: &str = "freq";
pub const BSSID_KEY: &str = "bssid";
pub const VERSION_KEY: &str = "versionString";

pub struct NetworkReporter {
    last_ssid: Option<String>,
    version: String,
    version_sent: bool,
}

impl NetworkReporter {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            last_ssid: None,
            version: version.into(),
            version_sent: false,
        }
    }

    /// Query the network and report ssid/freq/bssid if the SSID changed.
    pub fn poll(
        &mut self,
        net: &mut impl NetworkInfoPort,
        registry: &mut PropertyRegistry,
        reconciler: &TwinReconciler,
    ) -> Vec<ReportBuffer> {
        let Some(info) = net.current_network() else {
            return Vec::new();
        };
        if self.last_ssid.as_deref() == Some(info.ssid.as_str()) {
            return Vec::new();
        }

        info!(
            "network: SSID {} at {} MHz, bssid {}",
            info.ssid,
            info.frequency_mhz,
            info.bssid_string()
        );

        let updates = [
            (SSID_KEY, PropertyValue::Text(info.ssid.clone())),
            (
                FREQUENCY_KEY,
                PropertyValue::Integer(i32::try_from(info.frequency_mhz).unwrap_or(i32::MAX)),
            ),
            (BSSID_KEY, PropertyValue::Text(info.bssid_string())),
        ];
        self.last_ssid = Some(info.ssid);

        updates
            .into_iter()
            .filter_map(|(key, value)| match reconciler.report_local(registry, key, value) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("network: {} not reported: {}", key, e);
                    None
                }
            })
            .collect()
    }

    /// Report the version string the first time the session is connected.
    pub fn report_version(
        &mut self,
        connected: bool,
        registry: &mut PropertyRegistry,
        reconciler: &TwinReconciler,
    ) -> Option<ReportBuffer> {
        if self.version_sent || !connected {
            return None;
        }
        self.version_sent = true;
        match reconciler.report_local(registry, VERSION_KEY, PropertyValue::Text(self.version.clone())) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("network: versionString not reported: {}", e);
                None
            }
        }
    }
}
