//! Reported-state encoder.
//!
//! Formats one property into a bounded JSON document in one of two wire
//! dialects:
//!
//! ```text
//! Plain:         {"appLed": false}
//! Acknowledged:  {"appLed": {"value": false, "status": "completed", "desiredVersion": 3}}
//! ```
//!
//! Output lives in a fixed [`REPORT_CAPACITY`]-byte buffer.  A document that
//! would not fit is refused as a whole; a truncated report is never
//! produced.

use core::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

use super::property::PropertyValue;

/// Maximum size of one encoded report or telemetry message.
pub const REPORT_CAPACITY: usize = 128;

/// Fixed-capacity buffer holding one encoded document.
pub type ReportBuffer = heapless::String<REPORT_CAPACITY>;

/// Wire shape of reported-property documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `{key: value}`
    #[default]
    Plain,
    /// `{key: {value, status: "completed", desiredVersion}}`
    Acknowledged,
}

/// One outbound reported-property document, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedDocument<'a> {
    pub key: &'a str,
    pub value: &'a PropertyValue,
    pub dialect: Dialect,
    pub desired_version: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportedStateEncoder;

impl ReportedStateEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, doc: &ReportedDocument<'_>) -> Result<ReportBuffer, EncodeError> {
        let mut out = ReportBuffer::new();
        write_report(&mut out, doc).map_err(|_| EncodeError::Overflow {
            capacity: REPORT_CAPACITY,
        })?;
        Ok(out)
    }

    /// Discrete telemetry event: `{"<name>":"<value>"}`.
    pub fn encode_telemetry(&self, name: &str, value: &str) -> Result<ReportBuffer, EncodeError> {
        let mut out = ReportBuffer::new();
        write_telemetry(&mut out, name, value).map_err(|_| EncodeError::Overflow {
            capacity: REPORT_CAPACITY,
        })?;
        Ok(out)
    }
}

fn write_report(out: &mut ReportBuffer, doc: &ReportedDocument<'_>) -> core::fmt::Result {
    out.write_char('{')?;
    write_json_str(out, doc.key)?;
    out.write_str(": ")?;
    match doc.dialect {
        Dialect::Plain => write_value(out, doc.value)?,
        Dialect::Acknowledged => {
            out.write_str("{\"value\": ")?;
            write_value(out, doc.value)?;
            write!(
                out,
                ", \"status\": \"completed\", \"desiredVersion\": {}}}",
                doc.desired_version
            )?;
        }
    }
    out.write_char('}')
}

fn write_telemetry(out: &mut ReportBuffer, name: &str, value: &str) -> core::fmt::Result {
    out.write_char('{')?;
    write_json_str(out, name)?;
    out.write_char(':')?;
    write_json_str(out, value)?;
    out.write_char('}')
}

fn write_value(out: &mut ReportBuffer, value: &PropertyValue) -> core::fmt::Result {
    match value {
        PropertyValue::Integer(i) => write!(out, "{i}"),
        PropertyValue::Float(f) if f.is_finite() => write!(out, "{f:.2}"),
        PropertyValue::Float(_) => out.write_str("null"),
        PropertyValue::Boolean(b) => write!(out, "{b}"),
        PropertyValue::Text(s) => write_json_str(out, s),
    }
}

/// Quoted, escaped JSON string.
fn write_json_str(out: &mut ReportBuffer, s: &str) -> core::fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| core::fmt::Error)?;
    out.write_str(&quoted)
}
