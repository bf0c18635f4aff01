//! Network information adapter.
//!
//! Host builds have no WiFi station; [`StaticNetwork`] reports a fixed
//! association (or none) so the metadata path runs end to end.

use crate::app::ports::{NetworkInfo, NetworkInfoPort};

#[derive(Debug, Clone, Default)]
pub struct StaticNetwork {
    info: Option<NetworkInfo>,
}

impl StaticNetwork {
    pub fn new(info: Option<NetworkInfo>) -> Self {
        Self { info }
    }

    /// The network the simulated station associates with.
    pub fn simulated() -> Self {
        Self::new(Some(NetworkInfo {
            ssid: "twinlink-sim".into(),
            frequency_mhz: 2437,
            bssid: [0x02, 0x00, 0x00, 0x00, 0x00, 0x01],
        }))
    }
}

impl NetworkInfoPort for StaticNetwork {
    fn current_network(&mut self) -> Option<NetworkInfo> {
        self.info.clone()
    }
}
