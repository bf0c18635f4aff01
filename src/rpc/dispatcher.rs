//! Direct-method dispatcher.
//!
//! Resolves a cloud-invoked method name against a fixed handler table,
//! bounds and parses the payload, runs the handler, and normalises the
//! outcome into a status code plus an owned JSON response payload.
//!
//! ```text
//! Received ──▶ Validated ──▶ Executed ──▶ Responded
//!    │  payload > 32 B ───────────────▶ Rejected (400)
//!    │  no such method ───────────────▶ Unknown  (404)
//!    └─ payload not JSON ─────────────▶ Rejected (400)
//! ```
//!
//! The size check runs before the name lookup, so an oversized payload is
//! a 400 even for an unknown method.

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, RegistryError};

use super::methods::MethodHandler;

/// Largest accepted method payload, in bytes.
pub const MAX_PAYLOAD_LEN: usize = 32;

/// A request payload that has passed the size check.
pub type MethodPayload = heapless::Vec<u8, MAX_PAYLOAD_LEN>;

/// HTTP-style method status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum MethodStatus {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
}

impl MethodStatus {
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// Outcome of one method call, handed to the transport for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub status: MethodStatus,
    pub payload: String,
}

#[derive(Serialize)]
struct Reply<'a> {
    success: bool,
    message: &'a str,
}

const NO_PAYLOAD_MESSAGE: &str = "request does not contain an identifiable payload";

/// Fixed text of a 404 reply, without the method name.
const NOT_FOUND_TEXT_LEN: usize = "method not found ''".len();

/// Room for the `{"success":..,"message":""}` envelope.
const REPLY_ENVELOPE_LEN: usize = 32;

impl CommandResponse {
    /// 200 with `{"success":true,"message":...}`.
    pub fn success(message: &str) -> Result<Self, Error> {
        Ok(Self {
            status: MethodStatus::Ok,
            payload: render(&Reply { success: true, message }, message.len())?,
        })
    }

    /// 400 with the fixed "no identifiable payload" reply.
    pub fn bad_request() -> Result<Self, Error> {
        Ok(Self {
            status: MethodStatus::BadRequest,
            payload: render(
                &Reply {
                    success: false,
                    message: NO_PAYLOAD_MESSAGE,
                },
                NO_PAYLOAD_MESSAGE.len(),
            )?,
        })
    }

    /// 404 with a JSON string naming the method.
    pub fn not_found(method: &str) -> Result<Self, Error> {
        Ok(Self {
            status: MethodStatus::NotFound,
            payload: render(
                &format_args!("method not found '{method}'"),
                NOT_FOUND_TEXT_LEN + method.len(),
            )?,
        })
    }

    pub fn status_code(&self) -> u16 {
        self.status.code()
    }
}

/// Serialise `body`, whose text is `text_len` bytes, into a freshly
/// allocated response buffer.  Allocation failure is the only error.
fn render(body: &impl Serialize, text_len: usize) -> Result<String, Error> {
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve(reply_capacity(text_len))
        .map_err(|_| Error::OutOfMemory)?;
    serde_json::to_writer(&mut buf, body).map_err(|_| Error::OutOfMemory)?;
    String::from_utf8(buf).map_err(|_| Error::OutOfMemory)
}

/// Worst-case rendered size: every text byte escaped as `\u00XX`.  The
/// whole reply fits the reservation, so serialisation never grows it.
fn reply_capacity(text_len: usize) -> usize {
    text_len.saturating_mul(6).saturating_add(REPLY_ENVELOPE_LEN)
}

/// Fixed table of direct-method handlers, built at startup.
#[derive(Default)]
pub struct CommandDispatcher {
    handlers: Vec<Box<dyn MethodHandler>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler.  Two handlers with the same name are a
    /// configuration error.
    pub fn register(&mut self, handler: Box<dyn MethodHandler>) -> Result<(), RegistryError> {
        let name = handler.name();
        if self.handlers.iter().any(|h| h.name() == name) {
            return Err(RegistryError::DuplicateKey(name));
        }
        self.handlers.push(handler);
        Ok(())
    }

    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|h| h.name())
    }

    /// Run one method call to completion.
    ///
    /// Request errors are folded into the response status; `Err` is
    /// returned only when the response buffer cannot be allocated.
    pub fn dispatch(&mut self, method: &str, payload: &[u8]) -> Result<CommandResponse, Error> {
        info!("rpc: direct method called {}", method);

        let Ok(payload) = MethodPayload::from_slice(payload) else {
            warn!(
                "rpc: payload {} bytes > {} bytes, '{}' not executed",
                payload.len(),
                MAX_PAYLOAD_LEN,
                method
            );
            return CommandResponse::bad_request();
        };

        let Some(handler) = self.handlers.iter_mut().find(|h| h.name() == method) else {
            info!("rpc: direct method \"{}\" not found", method);
            return CommandResponse::not_found(method);
        };

        let args = match parse_payload(&payload) {
            Some(v) => v,
            None => {
                info!("rpc: unrecognised payload format for '{}'", method);
                return CommandResponse::bad_request();
            }
        };
        debug!("rpc: '{}' validated, args={}", method, args);

        let response = handler.invoke(&args)?;
        debug!("rpc: '{}' -> {}", method, response.status_code());
        Ok(response)
    }
}

/// An empty payload is `null`; anything else must be valid JSON.
fn parse_payload(payload: &[u8]) -> Option<Value> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Some(Value::Null);
    }
    serde_json::from_slice(payload).ok()
}
