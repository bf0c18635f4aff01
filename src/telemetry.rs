//! Button transition telemetry.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups: HIGH when released, LOW
//! while pressed.  [`ButtonMonitor::poll`] is called from the main loop at
//! the button poll rate and compares each line against its last sample.
//!
//! | Transition  | Action                                      |
//! |-------------|---------------------------------------------|
//! | HIGH → LOW  | telemetry `{"<name>":"0"}` (level as string) |
//! | LOW → HIGH  | logged only                                 |

use log::{error, info};

use crate::app::ports::HardwarePort;
use crate::termination::{FatalReason, TerminationFlag};
use crate::twin::encoder::{ReportBuffer, ReportedStateEncoder};
use crate::twin::property::{GpioLine, LineLevel};

struct Button {
    name: &'static str,
    line: GpioLine,
    last: LineLevel,
}

pub struct ButtonMonitor {
    buttons: Vec<Button>,
    encoder: ReportedStateEncoder,
}

impl ButtonMonitor {
    /// Buttons start in the released (HIGH) state.
    pub fn new(buttons: &[(&'static str, GpioLine)]) -> Self {
        Self {
            buttons: buttons
                .iter()
                .map(|&(name, line)| Button {
                    name,
                    line,
                    last: LineLevel::High,
                })
                .collect(),
            encoder: ReportedStateEncoder::new(),
        }
    }

    /// Sample every button and return telemetry for new presses.
    ///
    /// A failed read requests termination and yields no telemetry for
    /// this poll.
    pub fn poll(
        &mut self,
        hw: &mut impl HardwarePort,
        termination: &TerminationFlag,
    ) -> Vec<ReportBuffer> {
        let mut out = Vec::new();
        for button in &mut self.buttons {
            let level = match hw.read_state(button.line) {
                Ok(level) => level,
                Err(e) => {
                    error!("button: could not read {} ({})", button.name, e);
                    termination.request(FatalReason::HardwareRead);
                    return Vec::new();
                }
            };
            if level == button.last {
                continue;
            }
            button.last = level;

            if level == LineLevel::Low {
                info!("button: {} pressed", button.name);
                let digit = level.as_digit().to_string();
                match self.encoder.encode_telemetry(button.name, &digit) {
                    Ok(msg) => out.push(msg),
                    Err(e) => error!("button: telemetry for {} dropped: {}", button.name, e),
                }
            } else {
                info!("button: {} released", button.name);
            }
        }
        out
    }
}
