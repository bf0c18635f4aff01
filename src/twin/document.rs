//! Inbound desired-property documents.
//!
//! The transport hands over UTF-8 JSON.  A full twin document nests the
//! desired section under `"desired"`; a patch carries the properties at the
//! root.  Either way the optional `$version` number identifies the desired
//! generation.
//!
//! ```text
//! {"desired": {"userLedRed": true, "$version": 7}, "reported": {...}}
//! {"userLedRed": {"value": true}, "$version": 8}
//! ```

use serde_json::{Map, Value};

use crate::error::DocumentError;

use super::property::{PropertyKind, PropertyValue};

const DESIRED_KEY: &str = "desired";
const VERSION_KEY: &str = "$version";
const WRAPPED_VALUE_KEY: &str = "value";

/// One parsed desired-property update.  Transient: built per inbound
/// message and dropped after reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredDocument {
    version: Option<i64>,
    properties: Map<String, Value>,
}

impl DesiredDocument {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let root: Value = serde_json::from_str(text).map_err(|_| DocumentError::InvalidJson)?;
        let Value::Object(mut root) = root else {
            return Err(DocumentError::NotAnObject);
        };

        let properties = match root.remove(DESIRED_KEY) {
            Some(Value::Object(desired)) => desired,
            Some(other) => {
                // Not a nested document; `desired` is an ordinary key.
                root.insert(DESIRED_KEY.to_string(), other);
                root
            }
            None => root,
        };

        let version = properties.get(VERSION_KEY).and_then(number_as_i64);
        Ok(Self { version, properties })
    }

    /// Desired generation carried by this document, if any.
    pub fn version(&self) -> Option<i64> {
        self.version
    }

    /// Raw JSON value for `key`, if present.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}

/// Why a raw desired value could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Desired-side decoding is not implemented for this kind.
    Unsupported(PropertyKind),
    /// The JSON type does not match the property's kind.
    TypeMismatch(PropertyKind),
}

/// Decode a raw desired value according to `kind`.
///
/// An object carrying a `value` field (acknowledgement-style desired
/// properties) is unwrapped first.  Numbers decode into integers by
/// truncation toward zero, saturating at the `i32` range.
pub fn decode_value(raw: &Value, kind: PropertyKind) -> Result<PropertyValue, DecodeError> {
    let raw = match raw {
        Value::Object(obj) => obj.get(WRAPPED_VALUE_KEY).unwrap_or(raw),
        other => other,
    };

    match kind {
        PropertyKind::Boolean => raw
            .as_bool()
            .map(PropertyValue::Boolean)
            .ok_or(DecodeError::TypeMismatch(kind)),
        PropertyKind::Integer => number_as_i64(raw)
            .map(|n| PropertyValue::Integer(n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32))
            .ok_or(DecodeError::TypeMismatch(kind)),
        PropertyKind::Float => raw
            .as_f64()
            .map(|f| PropertyValue::Float(f as f32))
            .ok_or(DecodeError::TypeMismatch(kind)),
        PropertyKind::Text => Err(DecodeError::Unsupported(kind)),
    }
}

fn number_as_i64(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
}
