//! Fuzz target: `DesiredDocument::parse` + `TwinReconciler::apply`
//!
//! Drives arbitrary text through the desired-document parser and, when it
//! parses, reconciles it against the board registry with an in-memory GPIO
//! bank.  Every acknowledgement must fit the report buffer and be valid
//! JSON.
//!
//! cargo fuzz run fuzz_desired_document

#![no_main]

use libfuzzer_sys::fuzz_target;
use twinlink::adapters::hardware::simulated_bank;
use twinlink::board;
use twinlink::termination::TerminationFlag;
use twinlink::twin::document::DesiredDocument;
use twinlink::twin::encoder::{Dialect, REPORT_CAPACITY};
use twinlink::twin::reconciler::TwinReconciler;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else { return };
    let Ok(doc) = DesiredDocument::parse(text) else { return };

    let Ok(mut registry) = board::build_registry() else { return };
    let mut gpio = simulated_bank(&board::OUTPUT_LINES, &[]);
    let flag = TerminationFlag::new();

    for dialect in [Dialect::Plain, Dialect::Acknowledged] {
        let mut reconciler = TwinReconciler::new(dialect);
        let outcome = reconciler.apply(&doc, &mut registry, &mut gpio, &flag);
        for report in &outcome.reports {
            assert!(report.len() <= REPORT_CAPACITY);
            assert!(serde_json::from_str::<serde_json::Value>(report).is_ok());
        }
        assert!(!outcome.fatal, "simulated pins never fail");
    }
});
