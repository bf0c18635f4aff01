//! End-to-end agent flows: transport in, GPIO and transport out.

use serde_json::Value;

use twinlink::Error;
use twinlink::app::service::AgentService;
use twinlink::board::{self, APP_LED_GPIO, BUTTON_A_GPIO, BUTTON_B_GPIO, RELAY2_GPIO};
use twinlink::config::AgentConfig;
use twinlink::error::DocumentError;
use twinlink::rpc::dispatcher::{CommandDispatcher, CommandResponse};
use twinlink::rpc::methods::MethodHandler;
use twinlink::rpc::standard_dispatcher;
use twinlink::termination::{FatalReason, TerminationFlag};
use twinlink::twin::encoder::Dialect;
use twinlink::twin::property::LineLevel;

use super::mock_hw::{MockGpio, MockNetwork, MockTimer, MockTransport};

struct Rig {
    service: AgentService,
    gpio: MockGpio,
    net: MockNetwork,
    transport: MockTransport,
    timer: MockTimer,
    flag: TerminationFlag,
}

fn rig(dialect: Dialect) -> Rig {
    let config = AgentConfig {
        dialect,
        version_string: "2.1.0".into(),
        ..AgentConfig::default()
    };
    let flag = TerminationFlag::new();
    let timer = MockTimer::default();
    let dispatcher = standard_dispatcher(&flag, timer.clone()).unwrap();
    let mut service = AgentService::new(
        &config,
        board::build_registry().unwrap(),
        dispatcher,
        flag.clone(),
    );
    let mut gpio = MockGpio::new();
    service.start(&mut gpio).unwrap();
    Rig {
        service,
        gpio,
        net: MockNetwork::default(),
        transport: MockTransport::new(),
        timer,
        flag,
    }
}

impl Rig {
    fn run_once(&mut self) {
        self.service
            .run_once(&mut self.gpio, &mut self.net, &mut self.transport);
    }
}

#[test]
fn desired_update_drives_gpio_and_reports() {
    let mut r = rig(Dialect::Acknowledged);
    r.transport
        .push_desired(r#"{"desired":{"appLed":true,"$version":12}}"#);
    r.run_once();

    assert_eq!(r.gpio.level(APP_LED_GPIO), LineLevel::Low);
    assert_eq!(
        r.transport.reported()[0],
        r#"{"appLed": {"value": true, "status": "completed", "desiredVersion": 12}}"#
    );
    assert_eq!(r.service.session_version(), 12);
}

#[test]
fn malformed_desired_json_changes_nothing() {
    let mut r = rig(Dialect::Plain);
    r.transport.push_desired(r#"{"appLed": tru"#);
    r.run_once();
    assert!(r.gpio.writes().is_empty());
    // Only the connect-time version report goes out.
    assert!(r.transport.reported().iter().all(|m| !m.contains("appLed")));
    assert!(!r.service.should_terminate());

    let before = r.transport.reported().len();
    r.transport.connected = false;
    r.transport.push_desired(r#"["appLed"]"#);
    r.run_once();
    assert!(r.gpio.writes().is_empty());
    assert_eq!(r.transport.reported().len(), before);
}

#[test]
fn unparseable_document_is_a_document_error() {
    let mut r = rig(Dialect::Plain);
    let result = r
        .service
        .apply_desired(r#"{"appLed": tru"#, &mut r.gpio, &mut r.transport);
    assert_eq!(result, Err(Error::Document(DocumentError::InvalidJson)));

    let result = r
        .service
        .apply_desired(r#"[true]"#, &mut r.gpio, &mut r.transport);
    assert_eq!(result, Err(Error::Document(DocumentError::NotAnObject)));
    assert!(r.transport.sent.is_empty());
}

#[test]
fn method_responses_are_delivered() {
    let mut r = rig(Dialect::Plain);
    r.transport
        .push_method("setSensorPollTime", br#"{"pollTime":20}"#);
    r.transport.push_method("doSomethingElse", b"");
    r.run_once();

    let responses = r.transport.responses();
    assert_eq!(responses[0].0, 200);
    assert_eq!(responses[1].0, 404);
    assert_eq!(*r.timer.periods.borrow(), [20]);
}

#[test]
fn halt_stops_the_drain_and_teardown_releases_outputs() {
    let mut r = rig(Dialect::Plain);
    r.transport.push_desired(r#"{"clickBoardRelay2":true}"#);
    r.transport.push_method("haltApplication", b"{}");
    r.transport.push_desired(r#"{"appLed":true}"#);
    r.run_once();

    assert!(r.service.should_terminate());
    assert_eq!(r.flag.reason(), Some(FatalReason::HaltRequested));
    // The message queued after the halt is left unprocessed.
    assert_eq!(r.transport.inbound.len(), 1);
    assert_eq!(r.gpio.level(RELAY2_GPIO), LineLevel::High);

    r.service.shutdown(&mut r.gpio);
    assert_eq!(r.gpio.level(RELAY2_GPIO), LineLevel::Low);
    assert_eq!(r.gpio.level(APP_LED_GPIO), LineLevel::High);
}

#[test]
fn button_press_emits_telemetry() {
    let mut r = rig(Dialect::Plain);
    r.gpio.press(BUTTON_B_GPIO);
    r.run_once();
    r.run_once();
    assert_eq!(r.transport.telemetry(), [r#"{"buttonB":"0"}"#]);

    r.gpio.release(BUTTON_B_GPIO);
    r.gpio.press(BUTTON_A_GPIO);
    r.run_once();
    assert_eq!(r.transport.telemetry().len(), 2);
}

#[test]
fn button_read_failure_is_fatal() {
    let mut r = rig(Dialect::Plain);
    r.gpio.fail_reads.insert(BUTTON_A_GPIO);
    r.run_once();
    assert_eq!(r.flag.reason(), Some(FatalReason::HardwareRead));
}

#[test]
fn network_and_version_reported_once_connected() {
    let mut r = rig(Dialect::Acknowledged);
    r.net = MockNetwork::associated("lab");
    r.transport.connected = false;
    r.run_once();
    assert!(r.transport.reported().is_empty());

    r.transport.connected = true;
    r.run_once();
    assert_eq!(
        r.transport.reported(),
        [
            r#"{"ssid": "lab"}"#,
            r#"{"freq": 5180}"#,
            r#"{"bssid": "aa:bb:cc:00:11:22"}"#,
            r#"{"versionString": "2.1.0"}"#,
        ]
    );

    r.run_once();
    assert_eq!(r.transport.reported().len(), 4);
}

#[test]
fn startup_failure_is_reported() {
    let config = AgentConfig::default();
    let flag = TerminationFlag::new();
    let dispatcher = standard_dispatcher(&flag, MockTimer::default()).unwrap();
    let mut service = AgentService::new(&config, board::build_registry().unwrap(), dispatcher, flag);
    let mut gpio = MockGpio::new();
    gpio.fail_configure.insert(APP_LED_GPIO);
    assert!(service.start(&mut gpio).is_err());
}

/// Stands in for a handler whose response buffer cannot be allocated.
struct Exhausted;

impl MethodHandler for Exhausted {
    fn name(&self) -> &'static str {
        "exhausted"
    }
    fn invoke(&mut self, _args: &Value) -> Result<CommandResponse, Error> {
        Err(Error::OutOfMemory)
    }
}

#[test]
fn response_allocation_failure_is_fatal() {
    let flag = TerminationFlag::new();
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.register(Box::new(Exhausted)).unwrap();
    let mut service = AgentService::new(
        &AgentConfig::default(),
        board::build_registry().unwrap(),
        dispatcher,
        flag.clone(),
    );
    let mut gpio = MockGpio::new();
    let mut net = MockNetwork::default();
    let mut transport = MockTransport::new();
    service.start(&mut gpio).unwrap();

    transport.push_method("exhausted", b"{}");
    transport.push_desired(r#"{"appLed":true}"#);
    service.run_once(&mut gpio, &mut net, &mut transport);

    assert_eq!(flag.reason(), Some(FatalReason::Allocation));
    assert!(transport.responses().is_empty());
    // The drain stops at the failed call.
    assert_eq!(transport.inbound.len(), 1);
}
