//! Device twin: property registry, desired-document parsing, reported-state
//! encoding, and the reconciler that ties them to hardware.
//!
//! ```text
//!  desired JSON ──▶ document ──▶ reconciler ──▶ HardwarePort
//!                                   │  ▲
//!                                   ▼  │
//!                     encoder ◀── registry
//!                        │
//!                        ▼
//!                 reported JSON
//! ```

pub mod document;
pub mod encoder;
pub mod property;
pub mod reconciler;
pub mod registry;
