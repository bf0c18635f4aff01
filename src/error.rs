//! Unified error types for the TwinLink agent.
//!
//! A single [`Error`] enum that every subsystem converts into, keeping the
//! top-level loop's error handling uniform.  All variants are `Copy` so
//! they can be passed around the reconciler and dispatcher without
//! allocation.
//!
//! Fatal runtime conditions are *not* modelled here: they are raised on the
//! [`TerminationFlag`](crate::termination::TerminationFlag) instead.

use core::fmt;

use crate::app::ports::TransportError;
use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level agent error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The property table is inconsistent (startup only).
    Registry(RegistryError),
    /// A GPIO line could not be driven or sampled.
    Hardware(HardwareError),
    /// An inbound desired-property document could not be used.
    Document(DocumentError),
    /// A reported-property document did not fit its buffer.
    Encode(EncodeError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The transport refused an outbound message.
    Transport(TransportError),
    /// The key is not in the property registry.
    UnknownProperty(&'static str),
    /// A value of the wrong kind was offered for a property slot.
    KindMismatch(&'static str),
    /// A response or report buffer could not be allocated.
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Document(e) => write!(f, "document: {e}"),
            Self::Encode(e) => write!(f, "encode: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::UnknownProperty(key) => write!(f, "unknown property '{key}'"),
            Self::KindMismatch(key) => write!(f, "kind mismatch for property '{key}'"),
            Self::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Two descriptors share the same key.
    DuplicateKey(&'static str),
    /// A hardware binding was attached to a kind that has no logical level.
    UnsupportedBinding(&'static str),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey(k) => write!(f, "duplicate property key '{k}'"),
            Self::UnsupportedBinding(k) => {
                write!(f, "property '{k}' kind cannot drive a hardware line")
            }
        }
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// The line is not known to the hardware adapter.
    UnknownLine(u32),
    /// Configuring the line as an output failed.
    OpenFailed(u32),
    /// Driving the output level failed.
    WriteFailed(u32),
    /// Sampling the input level failed.
    ReadFailed(u32),
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLine(l) => write!(f, "GPIO {l} not available"),
            Self::OpenFailed(l) => write!(f, "GPIO {l} open failed"),
            Self::WriteFailed(l) => write!(f, "GPIO {l} write failed"),
            Self::ReadFailed(l) => write!(f, "GPIO {l} read failed"),
        }
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Desired-document errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentError {
    /// The text is not valid JSON.
    InvalidJson,
    /// The JSON root (after unwrapping `desired`) is not an object.
    NotAnObject,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson => write!(f, "invalid JSON"),
            Self::NotAnObject => write!(f, "root is not a JSON object"),
        }
    }
}

impl From<DocumentError> for Error {
    fn from(e: DocumentError) -> Self {
        Self::Document(e)
    }
}

// ---------------------------------------------------------------------------
// Encoding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The formatted document would exceed the output buffer.
    Overflow { capacity: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { capacity } => {
                write!(f, "report exceeds {capacity}-byte buffer")
            }
        }
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Agent-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
