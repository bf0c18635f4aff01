//! TwinLink device agent library.
//!
//! Keeps a device twin in sync with local GPIO outputs and dispatches
//! cloud-invoked direct methods.  The core ([`app`], [`twin`], [`rpc`]) is
//! hardware-agnostic; [`adapters`] supply the concrete ports.

pub mod adapters;
pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod network;
pub mod rpc;
pub mod telemetry;
pub mod termination;
pub mod twin;

pub use error::{Error, Result};
