//! Direct-method dispatch with the standard handler table.

use twinlink::rpc::dispatcher::{CommandDispatcher, MAX_PAYLOAD_LEN, MethodStatus};
use twinlink::rpc::methods::{HALT_APPLICATION, SET_SENSOR_POLL_TIME};
use twinlink::rpc::standard_dispatcher;
use twinlink::termination::{FatalReason, TerminationFlag};

use super::mock_hw::MockTimer;

fn setup() -> (CommandDispatcher, MockTimer, TerminationFlag) {
    let flag = TerminationFlag::new();
    let timer = MockTimer::default();
    let dispatcher = standard_dispatcher(&flag, timer.clone()).unwrap();
    (dispatcher, timer, flag)
}

#[test]
fn poll_time_20_sets_timer_period() {
    let (mut d, timer, _) = setup();
    let resp = d.dispatch(SET_SENSOR_POLL_TIME, br#"{"pollTime": 20}"#).unwrap();
    assert_eq!(resp.status, MethodStatus::Ok);
    assert!(resp.payload.contains("20"));
    assert_eq!(*timer.periods.borrow(), [20]);
}

#[test]
fn poll_time_0_is_rejected_and_timer_untouched() {
    let (mut d, timer, _) = setup();
    let resp = d.dispatch(SET_SENSOR_POLL_TIME, br#"{"pollTime": 0}"#).unwrap();
    assert_eq!(resp.status_code(), 400);
    assert!(timer.periods.borrow().is_empty());
}

#[test]
fn unknown_method_names_itself() {
    let (mut d, _, flag) = setup();
    let resp = d.dispatch("doSomethingElse", b"{}").unwrap();
    assert_eq!(resp.status_code(), 404);
    assert!(resp.payload.contains("doSomethingElse"));
    assert!(!flag.is_set());
}

#[test]
fn oversized_payload_never_reaches_a_handler() {
    let (mut d, timer, flag) = setup();
    let mut payload = br#"{"pollTime": 5, "pad": ""#.to_vec();
    payload.resize(MAX_PAYLOAD_LEN + 8, b'x');
    payload.extend_from_slice(br#""}"#);

    let resp = d.dispatch(SET_SENSOR_POLL_TIME, &payload).unwrap();
    assert_eq!(resp.status_code(), 400);
    assert!(timer.periods.borrow().is_empty());

    let resp = d.dispatch(HALT_APPLICATION, &payload).unwrap();
    assert_eq!(resp.status_code(), 400);
    assert!(!flag.is_set());
}

#[test]
fn halt_sets_the_termination_flag() {
    let (mut d, _, flag) = setup();
    let resp = d.dispatch(HALT_APPLICATION, b"{}").unwrap();
    assert_eq!(resp.status_code(), 200);
    assert_eq!(
        resp.payload,
        r#"{"success":true,"message":"Halting Application"}"#
    );
    assert_eq!(flag.reason(), Some(FatalReason::HaltRequested));
}

#[test]
fn standard_table_lists_both_methods() {
    let (d, _, _) = setup();
    let mut names: Vec<_> = d.method_names().collect();
    names.sort_unstable();
    assert_eq!(names, [HALT_APPLICATION, SET_SENSOR_POLL_TIME]);
}
