//! GPIO adapter: bridges `embedded-hal` digital pins to [`HardwarePort`].
//!
//! [`GpioBank`] maps board line numbers to concrete pin objects.  Any HAL
//! whose pins implement `embedded_hal::digital::{StatefulOutputPin,
//! InputPin}` plugs in unchanged; on hosts without a GPIO controller the
//! bank is filled with [`SimPin`]s.

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin, PinState, StatefulOutputPin};
use log::debug;

use crate::app::ports::HardwarePort;
use crate::error::HardwareError;
use crate::twin::property::{GpioLine, LineLevel};

/// Line-numbered collection of output and input pins.
pub struct GpioBank<O, I> {
    outputs: Vec<(GpioLine, O)>,
    inputs: Vec<(GpioLine, I)>,
}

impl<O, I> Default for GpioBank<O, I> {
    fn default() -> Self {
        Self {
            outputs: Vec::new(),
            inputs: Vec::new(),
        }
    }
}

impl<O, I> GpioBank<O, I>
where
    O: StatefulOutputPin,
    I: InputPin,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, line: GpioLine, pin: O) -> Self {
        self.outputs.push((line, pin));
        self
    }

    pub fn with_input(mut self, line: GpioLine, pin: I) -> Self {
        self.inputs.push((line, pin));
        self
    }

    fn output(&mut self, line: GpioLine) -> Result<&mut O, HardwareError> {
        self.outputs
            .iter_mut()
            .find(|(l, _)| *l == line)
            .map(|(_, pin)| pin)
            .ok_or(HardwareError::UnknownLine(line))
    }
}

fn pin_state(level: LineLevel) -> PinState {
    PinState::from(level.is_high())
}

// ── HardwarePort implementation ───────────────────────────────

impl<O, I> HardwarePort for GpioBank<O, I>
where
    O: StatefulOutputPin,
    I: InputPin,
{
    fn configure_output(&mut self, line: GpioLine, initial: LineLevel) -> Result<(), HardwareError> {
        self.output(line)?
            .set_state(pin_state(initial))
            .map_err(|_| HardwareError::OpenFailed(line))?;
        debug!("gpio: {} output, initial {:?}", line, initial);
        Ok(())
    }

    fn read_state(&mut self, line: GpioLine) -> Result<LineLevel, HardwareError> {
        if let Some((_, pin)) = self.inputs.iter_mut().find(|(l, _)| *l == line) {
            return pin
                .is_high()
                .map(LineLevel::from_bool)
                .map_err(|_| HardwareError::ReadFailed(line));
        }
        self.output(line)?
            .is_set_high()
            .map(LineLevel::from_bool)
            .map_err(|_| HardwareError::ReadFailed(line))
    }

    fn write_state(&mut self, line: GpioLine, level: LineLevel) -> Result<(), HardwareError> {
        self.output(line)?
            .set_state(pin_state(level))
            .map_err(|_| HardwareError::WriteFailed(line))
    }
}

// ───────────────────────────────────────────────────────────────
// Simulated pin
// ───────────────────────────────────────────────────────────────

/// Fault raised by a [`SimPin`] with fault injection enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinFault;

impl embedded_hal::digital::Error for SimPinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// In-memory pin for host runs and tests.  Inputs idle HIGH (pull-up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPin {
    high: bool,
    faulty: bool,
}

impl Default for SimPin {
    fn default() -> Self {
        Self {
            high: true,
            faulty: false,
        }
    }
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pin whose every operation fails.
    pub fn faulty() -> Self {
        Self {
            faulty: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), SimPinFault> {
        if self.faulty { Err(SimPinFault) } else { Ok(()) }
    }
}

impl ErrorType for SimPin {
    type Error = SimPinFault;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(!self.high)
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(!self.high)
    }
}

/// A bank with a [`SimPin`] on every listed line.
pub fn simulated_bank(outputs: &[GpioLine], inputs: &[GpioLine]) -> GpioBank<SimPin, SimPin> {
    let bank = outputs
        .iter()
        .fold(GpioBank::new(), |bank, &line| bank.with_output(line, SimPin::new()));
    inputs
        .iter()
        .fold(bank, |bank, &line| bank.with_input(line, SimPin::new()))
}
