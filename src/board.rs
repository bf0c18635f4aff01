//! GPIO assignments and the twin property table for the MT3620 starter kit.
//!
//! Single source of truth: the registry built here is the only place a
//! property name is tied to a line.
//!
//! | Property           | Line       | Polarity    |
//! |--------------------|------------|-------------|
//! | `userLedRed`       | GPIO 8     | active-low  |
//! | `userLedGreen`     | GPIO 9     | active-low  |
//! | `userLedBlue`      | GPIO 10    | active-low  |
//! | `appLed`           | GPIO 4     | active-low  |
//! | `wifiLed`          | GPIO 5     | active-low  |
//! | `clickBoardRelay1` | GPIO 34    | active-high |
//! | `clickBoardRelay2` | GPIO 0     | active-high |

use crate::error::RegistryError;
use crate::network::{BSSID_KEY, FREQUENCY_KEY, SSID_KEY, VERSION_KEY};
use crate::twin::property::{GpioLine, HardwareBinding, PropertyDescriptor, PropertyValue};
use crate::twin::registry::PropertyRegistry;

// ---------------------------------------------------------------------------
// User LED 1 (RGB, common anode)
// ---------------------------------------------------------------------------

pub const USER_LED_RED_GPIO: GpioLine = 8;
pub const USER_LED_GREEN_GPIO: GpioLine = 9;
pub const USER_LED_BLUE_GPIO: GpioLine = 10;

// ---------------------------------------------------------------------------
// Status LEDs
// ---------------------------------------------------------------------------

pub const APP_LED_GPIO: GpioLine = 4;
pub const WIFI_LED_GPIO: GpioLine = 5;

// ---------------------------------------------------------------------------
// Click socket 1 relay board (CS and PWM pins)
// ---------------------------------------------------------------------------

pub const RELAY1_GPIO: GpioLine = 34;
pub const RELAY2_GPIO: GpioLine = 0;

// ---------------------------------------------------------------------------
// Buttons (pull-up, LOW = pressed)
// ---------------------------------------------------------------------------

pub const BUTTON_A_GPIO: GpioLine = 12;
pub const BUTTON_B_GPIO: GpioLine = 13;

pub const BUTTONS: [(&str, GpioLine); 2] = [("buttonA", BUTTON_A_GPIO), ("buttonB", BUTTON_B_GPIO)];

/// Every output line, for adapters that need to open them up front.
pub const OUTPUT_LINES: [GpioLine; 7] = [
    USER_LED_RED_GPIO,
    USER_LED_GREEN_GPIO,
    USER_LED_BLUE_GPIO,
    APP_LED_GPIO,
    WIFI_LED_GPIO,
    RELAY1_GPIO,
    RELAY2_GPIO,
];

const OUTPUTS: [(&str, HardwareBinding); 7] = [
    ("userLedRed", HardwareBinding::active_low(USER_LED_RED_GPIO)),
    ("userLedGreen", HardwareBinding::active_low(USER_LED_GREEN_GPIO)),
    ("userLedBlue", HardwareBinding::active_low(USER_LED_BLUE_GPIO)),
    ("appLed", HardwareBinding::active_low(APP_LED_GPIO)),
    ("wifiLed", HardwareBinding::active_low(WIFI_LED_GPIO)),
    ("clickBoardRelay1", HardwareBinding::active_high(RELAY1_GPIO)),
    ("clickBoardRelay2", HardwareBinding::active_high(RELAY2_GPIO)),
];

/// Build the property registry: bound outputs (all initially off) followed
/// by the software-only device metadata.
pub fn build_registry() -> Result<PropertyRegistry, RegistryError> {
    let mut registry = PropertyRegistry::new();
    for (key, binding) in OUTPUTS {
        registry.register(PropertyDescriptor::with_binding(
            key,
            PropertyValue::Boolean(false),
            binding,
        ))?;
    }
    registry.register(PropertyDescriptor::new(SSID_KEY, PropertyValue::Text(String::new())))?;
    registry.register(PropertyDescriptor::new(FREQUENCY_KEY, PropertyValue::Integer(0)))?;
    registry.register(PropertyDescriptor::new(BSSID_KEY, PropertyValue::Text(String::new())))?;
    registry.register(PropertyDescriptor::new(VERSION_KEY, PropertyValue::Text(String::new())))?;
    Ok(registry)
}
