//! Direct-method handlers.
//!
//! Each handler owns the capabilities it needs (injected at construction)
//! and receives the already bounded, parsed JSON payload.

use log::info;
use serde_json::Value;

use crate::app::ports::PeriodicTimer;
use crate::error::Error;
use crate::termination::{FatalReason, TerminationFlag};

use super::dispatcher::CommandResponse;

pub const HALT_APPLICATION: &str = "haltApplication";
pub const SET_SENSOR_POLL_TIME: &str = "setSensorPollTime";

/// A named direct method.
pub trait MethodHandler {
    fn name(&self) -> &'static str;

    /// Execute with the parsed payload.  `Err` only on allocation failure.
    fn invoke(&mut self, args: &Value) -> Result<CommandResponse, Error>;
}

// ───────────────────────────────────────────────────────────────
// haltApplication
// ───────────────────────────────────────────────────────────────

/// `haltApplication`: no payload fields; asks the outer loop to stop.
pub struct HaltApplication {
    termination: TerminationFlag,
}

impl HaltApplication {
    pub fn new(termination: TerminationFlag) -> Self {
        Self { termination }
    }
}

impl MethodHandler for HaltApplication {
    fn name(&self) -> &'static str {
        HALT_APPLICATION
    }

    fn invoke(&mut self, _args: &Value) -> Result<CommandResponse, Error> {
        info!("rpc: haltApplication, shutting down");
        let response = CommandResponse::success("Halting Application")?;
        self.termination.request(FatalReason::HaltRequested);
        Ok(response)
    }
}

// ───────────────────────────────────────────────────────────────
// setSensorPollTime
// ───────────────────────────────────────────────────────────────

/// `setSensorPollTime`: `{"pollTime": <seconds>}`, seconds ≥ 1.
pub struct SetSensorPollTime<T: PeriodicTimer> {
    timer: T,
}

impl<T: PeriodicTimer> SetSensorPollTime<T> {
    pub fn new(timer: T) -> Self {
        Self { timer }
    }
}

impl<T: PeriodicTimer> MethodHandler for SetSensorPollTime<T> {
    fn name(&self) -> &'static str {
        SET_SENSOR_POLL_TIME
    }

    fn invoke(&mut self, args: &Value) -> Result<CommandResponse, Error> {
        let Some(seconds) = poll_time(args) else {
            return CommandResponse::bad_request();
        };
        info!("rpc: new sensor poll time {}s", seconds);
        let response = CommandResponse::success(&format!("New Sensor Poll Time {seconds} seconds"))?;
        self.timer.set_period(seconds);
        Ok(response)
    }
}

/// Fractional seconds truncate toward zero; anything below 1 is rejected.
fn poll_time(args: &Value) -> Option<u32> {
    let raw = args.as_object()?.get("pollTime")?;
    let n = raw.as_i64().or_else(|| raw.as_f64().map(|f| f as i64))?;
    if n < 1 {
        return None;
    }
    u32::try_from(n).ok()
}
