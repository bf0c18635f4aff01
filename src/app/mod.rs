//! Application core: twin and method orchestration, zero I/O.
//!
//! All interaction with hardware and the cloud happens through **port
//! traits** defined in [`ports`], keeping this layer testable without real
//! peripherals or a network.

pub mod messages;
pub mod ports;
pub mod service;
