//! Twin reconciliation against the board property table and mock GPIO.

use twinlink::board::{self, APP_LED_GPIO, RELAY1_GPIO, USER_LED_RED_GPIO, WIFI_LED_GPIO};
use twinlink::termination::{FatalReason, TerminationFlag};
use twinlink::twin::document::DesiredDocument;
use twinlink::twin::encoder::Dialect;
use twinlink::twin::property::{LineLevel, PropertyValue};
use twinlink::twin::reconciler::TwinReconciler;

use super::mock_hw::{GpioCall, MockGpio};

fn doc(json: &str) -> DesiredDocument {
    DesiredDocument::parse(json).unwrap()
}

#[test]
fn startup_opens_every_output_in_its_off_level() {
    let registry = board::build_registry().unwrap();
    let mut gpio = MockGpio::new();
    TwinReconciler::initialize_hardware(&registry, &mut gpio).unwrap();

    assert!(gpio.calls.contains(&GpioCall::Configure(USER_LED_RED_GPIO, LineLevel::High)));
    assert!(gpio.calls.contains(&GpioCall::Configure(APP_LED_GPIO, LineLevel::High)));
    assert!(gpio.calls.contains(&GpioCall::Configure(RELAY1_GPIO, LineLevel::Low)));
    assert_eq!(gpio.calls.len(), board::OUTPUT_LINES.len());
}

#[test]
fn active_low_led_polarity_both_ways() {
    let mut registry = board::build_registry().unwrap();
    let mut rec = TwinReconciler::new(Dialect::Plain);
    let mut gpio = MockGpio::new();
    let flag = TerminationFlag::new();

    rec.apply(&doc(r#"{"userLedRed": true}"#), &mut registry, &mut gpio, &flag);
    assert_eq!(gpio.writes(), [(USER_LED_RED_GPIO, LineLevel::Low)]);

    rec.apply(&doc(r#"{"userLedRed": false}"#), &mut registry, &mut gpio, &flag);
    assert_eq!(gpio.level(USER_LED_RED_GPIO), LineLevel::High);
}

#[test]
fn active_high_relay_polarity_both_ways() {
    let mut registry = board::build_registry().unwrap();
    let mut rec = TwinReconciler::new(Dialect::Plain);
    let mut gpio = MockGpio::new();
    let flag = TerminationFlag::new();

    rec.apply(&doc(r#"{"clickBoardRelay1": true}"#), &mut registry, &mut gpio, &flag);
    assert_eq!(gpio.level(RELAY1_GPIO), LineLevel::High);
    rec.apply(&doc(r#"{"clickBoardRelay1": false}"#), &mut registry, &mut gpio, &flag);
    assert_eq!(gpio.level(RELAY1_GPIO), LineLevel::Low);
}

#[test]
fn nested_desired_with_version_is_acknowledged() {
    let mut registry = board::build_registry().unwrap();
    let mut rec = TwinReconciler::new(Dialect::Acknowledged);
    let mut gpio = MockGpio::new();
    let flag = TerminationFlag::new();

    let out = rec.apply(
        &doc(r#"{"desired": {"appLed": false, "$version": 3}, "reported": {}}"#),
        &mut registry,
        &mut gpio,
        &flag,
    );
    assert_eq!(out.applied, 1);
    assert_eq!(
        out.reports[0].as_str(),
        r#"{"appLed": {"value": false, "status": "completed", "desiredVersion": 3}}"#
    );
    assert_eq!(rec.session_version(), 3);
}

#[test]
fn version_is_echoed_until_replaced() {
    let mut registry = board::build_registry().unwrap();
    let mut rec = TwinReconciler::new(Dialect::Acknowledged);
    let mut gpio = MockGpio::new();
    let flag = TerminationFlag::new();

    rec.apply(&doc(r#"{"$version": 7}"#), &mut registry, &mut gpio, &flag);
    let out = rec.apply(&doc(r#"{"wifiLed": true}"#), &mut registry, &mut gpio, &flag);
    assert!(out.reports[0].contains(r#""desiredVersion": 7"#));
    assert_eq!(gpio.level(WIFI_LED_GPIO), LineLevel::Low);
}

#[test]
fn applying_the_same_document_twice_is_idempotent() {
    let mut registry = board::build_registry().unwrap();
    let mut rec = TwinReconciler::new(Dialect::Acknowledged);
    let mut gpio = MockGpio::new();
    let flag = TerminationFlag::new();
    let d = doc(r#"{"appLed": true, "clickBoardRelay2": true, "$version": 4}"#);

    let first = rec.apply(&d, &mut registry, &mut gpio, &flag);
    let levels_after_first = gpio.levels.clone();
    let second = rec.apply(&d, &mut registry, &mut gpio, &flag);

    assert_eq!(gpio.levels, levels_after_first);
    assert_eq!(first.reports, second.reports);
    assert_eq!(first.applied, 2);
}

#[test]
fn text_and_unknown_keys_are_skipped_without_escalation() {
    let mut registry = board::build_registry().unwrap();
    let mut rec = TwinReconciler::new(Dialect::Plain);
    let mut gpio = MockGpio::new();
    let flag = TerminationFlag::new();

    let out = rec.apply(
        &doc(r#"{"ssid": "evil", "noSuchThing": 1, "appLed": "yes"}"#),
        &mut registry,
        &mut gpio,
        &flag,
    );
    assert_eq!(out.applied, 0);
    assert_eq!(out.skipped, 2);
    assert!(out.reports.is_empty());
    assert!(!flag.is_set());
    assert_eq!(
        registry.find("ssid").unwrap().value(),
        &PropertyValue::Text(String::new())
    );
}

#[test]
fn hardware_write_failure_requests_termination() {
    let mut registry = board::build_registry().unwrap();
    let mut rec = TwinReconciler::new(Dialect::Plain);
    let mut gpio = MockGpio::new();
    gpio.fail_writes.insert(RELAY1_GPIO);
    let flag = TerminationFlag::new();

    let out = rec.apply(&doc(r#"{"clickBoardRelay1": true}"#), &mut registry, &mut gpio, &flag);
    assert!(out.fatal);
    assert!(out.reports.is_empty());
    assert_eq!(flag.reason(), Some(FatalReason::HardwareWrite));
    assert_eq!(
        registry.find("clickBoardRelay1").unwrap().value(),
        &PropertyValue::Boolean(false)
    );
}

#[test]
fn release_drives_outputs_inactive() {
    let mut registry = board::build_registry().unwrap();
    let mut rec = TwinReconciler::new(Dialect::Plain);
    let mut gpio = MockGpio::new();
    let flag = TerminationFlag::new();

    rec.apply(&doc(r#"{"appLed": true, "clickBoardRelay1": true}"#), &mut registry, &mut gpio, &flag);
    TwinReconciler::release_hardware(&registry, &mut gpio);

    assert_eq!(gpio.level(APP_LED_GPIO), LineLevel::High);
    assert_eq!(gpio.level(RELAY1_GPIO), LineLevel::Low);
}
