//! Sensor-poll timer.
//!
//! [`SharedPeriod`] is the handle given to the `setSensorPollTime`
//! handler; [`SensorTimer`] is polled by the main loop and reads the same
//! period, so a change takes effect from the next expiry.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::app::ports::PeriodicTimer;

/// Cloneable period in seconds, shared between handler and loop.
#[derive(Debug, Clone)]
pub struct SharedPeriod(Rc<Cell<u32>>);

impl SharedPeriod {
    pub fn new(seconds: u32) -> Self {
        Self(Rc::new(Cell::new(seconds)))
    }

    pub fn seconds(&self) -> u32 {
        self.0.get()
    }
}

impl PeriodicTimer for SharedPeriod {
    fn set_period(&mut self, seconds: u32) {
        self.0.set(seconds);
    }
}

/// Monotonic periodic deadline driven by a [`SharedPeriod`].
pub struct SensorTimer {
    period: SharedPeriod,
    last: Instant,
}

impl SensorTimer {
    pub fn new(period: SharedPeriod) -> Self {
        Self {
            period,
            last: Instant::now(),
        }
    }

    /// `true` once per elapsed period; re-arms on expiry.
    pub fn expired(&mut self, now: Instant) -> bool {
        let period = Duration::from_secs(u64::from(self.period.seconds()));
        if now.saturating_duration_since(self.last) < period {
            return false;
        }
        self.last = now;
        true
    }
}
