//! Process-wide termination flag.
//!
//! Fatal conditions inside the core (hardware write failure, response
//! allocation failure, the halt method) never unwind: they raise this flag
//! and return normally.  The outer loop checks [`TerminationFlag::is_set`]
//! at every iteration boundary and shuts down cleanly.
//!
//! The flag is a shared `Arc<AtomicBool>` so that `signal_hook::flag` can
//! set it directly from a SIGTERM handler.  The first reason recorded wins;
//! a flag raised by a signal handler reports [`FatalReason::Signal`].

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use log::error;

/// Why the agent asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FatalReason {
    /// A property's output line could not be driven.
    HardwareWrite = 1,
    /// An input line (button) could not be sampled.
    HardwareRead = 2,
    /// A response or report buffer could not be allocated.
    Allocation = 3,
    /// The `haltApplication` direct method was invoked.
    HaltRequested = 4,
    /// SIGTERM / SIGINT, or the transport gave up.
    Signal = 5,
}

impl FatalReason {
    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::HardwareWrite),
            2 => Some(Self::HardwareRead),
            3 => Some(Self::Allocation),
            4 => Some(Self::HaltRequested),
            5 => Some(Self::Signal),
            _ => None,
        }
    }
}

/// Cloneable handle to the shared termination state.
#[derive(Debug, Clone, Default)]
pub struct TerminationFlag {
    requested: Arc<AtomicBool>,
    reason: Arc<AtomicU8>,
}

impl TerminationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the outer loop to stop.  Only the first reason is kept.
    pub fn request(&self, reason: FatalReason) {
        if self
            .reason
            .compare_exchange(0, reason as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            error!("termination requested: {:?}", reason);
        }
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Reason for termination, if the flag is set.
    pub fn reason(&self) -> Option<FatalReason> {
        if !self.is_set() {
            return None;
        }
        FatalReason::from_u8(self.reason.load(Ordering::Acquire)).or(Some(FatalReason::Signal))
    }

    /// The raw flag, for `signal_hook::flag::register`.
    pub fn as_signal_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.requested)
    }
}
