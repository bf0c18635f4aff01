//! Fuzz target: `CommandDispatcher::dispatch`
//!
//! The first byte selects the method name, the rest is the payload.  Every
//! call must produce one of the three status codes, and oversized payloads
//! must always be rejected.
//!
//! cargo fuzz run fuzz_method_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use twinlink::adapters::time::SharedPeriod;
use twinlink::rpc::dispatcher::MAX_PAYLOAD_LEN;
use twinlink::rpc::methods::{HALT_APPLICATION, SET_SENSOR_POLL_TIME};
use twinlink::rpc::standard_dispatcher;
use twinlink::termination::TerminationFlag;

const NAMES: [&str; 3] = [SET_SENSOR_POLL_TIME, HALT_APPLICATION, "doSomethingElse"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else { return };
    let name = NAMES[usize::from(selector) % NAMES.len()];

    let flag = TerminationFlag::new();
    let period = SharedPeriod::new(1);
    let Ok(mut dispatcher) = standard_dispatcher(&flag, period.clone()) else { return };

    let Ok(resp) = dispatcher.dispatch(name, payload) else { return };
    assert!(matches!(resp.status_code(), 200 | 400 | 404));
    if payload.len() > MAX_PAYLOAD_LEN {
        assert_eq!(resp.status_code(), 400);
        assert_eq!(period.seconds(), 1);
    }
    if resp.status_code() == 200 && name == SET_SENSOR_POLL_TIME {
        assert!(period.seconds() >= 1);
    }
});
