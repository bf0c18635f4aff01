//! Line-oriented console transport for host runs.
//!
//! A reader thread turns stdin lines into [`InboundMessage`]s:
//!
//! ```text
//! twin {"desired":{"appLed":true,"$version":3}}
//! method setSensorPollTime {"pollTime":5}
//! method haltApplication
//! ```
//!
//! Outbound messages are written to stdout, one per line, prefixed with
//! `reported`, `telemetry` or `response <status>`.  End of input closes
//! the session.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use log::{info, warn};

use crate::app::messages::{InboundMessage, OutboundMessage};
use crate::app::ports::{TransportError, TransportPort};

pub struct StdioTransport {
    rx: Receiver<String>,
    closed: bool,
}

impl StdioTransport {
    /// Spawn the stdin reader thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self { rx, closed: false })
    }

    /// Whether stdin has reached end of input.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl TransportPort for StdioTransport {
    fn connected(&self) -> bool {
        !self.closed
    }

    fn deliver(&mut self, message: OutboundMessage) -> Result<(), TransportError> {
        let line = render_line(&message);
        let mut out = io::stdout().lock();
        writeln!(out, "{line}").map_err(|_| TransportError::Closed)?;
        out.flush().map_err(|_| TransportError::Closed)
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        while !self.closed {
            match self.rx.try_recv() {
                Ok(line) => {
                    if let Some(msg) = parse_line(&line) {
                        return Some(msg);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    info!("stdio: end of input, session closed");
                    self.closed = true;
                }
            }
        }
        None
    }
}

/// Parse one console line.  Blank lines and `#` comments are ignored.
pub fn parse_line(line: &str) -> Option<InboundMessage> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    match verb {
        "twin" => Some(InboundMessage::DesiredProperties(rest.to_string())),
        "method" => {
            let (name, payload) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if name.is_empty() {
                warn!("stdio: method line without a name");
                return None;
            }
            Some(InboundMessage::MethodCall {
                name: name.to_string(),
                payload: payload.trim().as_bytes().to_vec(),
            })
        }
        other => {
            warn!("stdio: unknown verb '{}'", other);
            None
        }
    }
}

fn render_line(message: &OutboundMessage) -> String {
    match message {
        OutboundMessage::ReportedProperties(doc) => format!("reported {doc}"),
        OutboundMessage::Telemetry(doc) => format!("telemetry {doc}"),
        OutboundMessage::MethodResponse(resp) => {
            format!("response {} {}", resp.status_code(), resp.payload)
        }
    }
}
