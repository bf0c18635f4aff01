//! Property descriptors: one per synchronised twin property.
//!
//! A descriptor owns the in-process value slot for its key.  The slot is a
//! tagged [`PropertyValue`] whose variant is fixed by the descriptor's
//! [`PropertyKind`] at registration; nothing ever reinterprets it as a
//! different kind.

use core::fmt;

/// GPIO line identifier on the board.
pub type GpioLine = u32;

/// Physical level of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    Low,
    High,
}

impl LineLevel {
    pub fn from_bool(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    pub fn is_high(self) -> bool {
        self == Self::High
    }

    /// 0 / 1, as sent in telemetry messages.
    pub fn as_digit(self) -> u8 {
        u8::from(self.is_high())
    }
}

/// The four value kinds a twin property can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Integer,
    Float,
    Boolean,
    Text,
}

/// A natively-typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Integer(i32),
    Float(f32),
    Boolean(bool),
    Text(String),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Integer(_) => PropertyKind::Integer,
            Self::Float(_) => PropertyKind::Float,
            Self::Boolean(_) => PropertyKind::Boolean,
            Self::Text(_) => PropertyKind::Text,
        }
    }

    /// Logical on/off state for values that can drive an output line.
    pub fn as_logical(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::Integer(i) => Some(*i != 0),
            Self::Float(_) | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:.2}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Output line driven by a property, plus its active level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareBinding {
    pub line: GpioLine,
    /// `true` if logical "on" is a high level on the line.
    pub active_high: bool,
}

impl HardwareBinding {
    pub const fn active_high(line: GpioLine) -> Self {
        Self { line, active_high: true }
    }

    pub const fn active_low(line: GpioLine) -> Self {
        Self { line, active_high: false }
    }

    /// Physical level that represents the logical state `on`.
    pub fn level_for(&self, on: bool) -> LineLevel {
        LineLevel::from_bool(on == self.active_high)
    }

    /// Level of the line when the property is logically off.
    pub fn inactive_level(&self) -> LineLevel {
        self.level_for(false)
    }
}

/// Static description of one twin property plus its live value slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    key: &'static str,
    kind: PropertyKind,
    value: PropertyValue,
    binding: Option<HardwareBinding>,
}

impl PropertyDescriptor {
    /// Software-only property.
    pub fn new(key: &'static str, initial: PropertyValue) -> Self {
        Self {
            key,
            kind: initial.kind(),
            value: initial,
            binding: None,
        }
    }

    /// Property backed by an output line.
    pub fn with_binding(key: &'static str, initial: PropertyValue, binding: HardwareBinding) -> Self {
        Self {
            binding: Some(binding),
            ..Self::new(key, initial)
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn binding(&self) -> Option<HardwareBinding> {
        self.binding
    }

    /// Replace the slot value.  Returns `false` (slot untouched) if the
    /// value's kind differs from the registered kind.
    pub(crate) fn store(&mut self, value: PropertyValue) -> bool {
        if value.kind() != self.kind {
            return false;
        }
        self.value = value;
        true
    }
}
