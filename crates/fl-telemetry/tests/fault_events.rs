// SPDX-License-Identifier: MIT OR Apache-2.0
//! Verifies the structured events emitted by `log_fault` and by the
//! decision points in the core crates.
//!
//! Uses a capturing writer behind the crate's own subscriber builder, then
//! asserts on the formatted output.

use std::sync::{Arc, Mutex};

use fl_error::{Fault, RenderOptions};
use fl_telemetry::{LogFormat, log_fault, log_fault_with, subscriber};
use tracing_subscriber::fmt::MakeWriter;

// ---------------------------------------------------------------------------
// Capturing infrastructure
// ---------------------------------------------------------------------------

/// Shared buffer that implements `io::Write` + `MakeWriter`.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;
    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

fn capture(filter: &str, format: LogFormat, f: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    let sub = subscriber(filter, format, logs.clone()).unwrap();
    tracing::subscriber::with_default(sub, f);
    logs.contents()
}

fn sample() -> Fault {
    Fault::builder("Sync", 12)
        .description("Could not sync the library.")
        .cause(Fault::builder("POSIX", 5).description("Input/output error").build())
        .build()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn text_event_has_domain_code_and_chain() {
    let out = capture("trace", LogFormat::Text, || log_fault(&sample()));
    assert!(out.contains("ERROR"), "{out}");
    assert!(out.contains("domain=Sync"), "{out}");
    assert!(out.contains("code=12"), "{out}");
    assert!(out.contains("Could not sync the library."), "{out}");
    assert!(out.contains("Domain=POSIX"), "{out}");
}

#[test]
fn json_event_is_one_object_per_fault() {
    let out = capture("trace", LogFormat::Json, || {
        log_fault(&sample());
        log_fault(&Fault::new("URL", -1001));
    });
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2, "{out}");
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["fields"]["domain"], "Sync");
    assert_eq!(first["fields"]["code"], 12);
    assert_eq!(first["fields"]["depth"], 1);
    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["fields"]["code"], -1001);
}

#[test]
fn cancellation_logs_at_debug() {
    let out = capture("info", LogFormat::Text, || log_fault(&Fault::cancelled("user")));
    assert!(out.is_empty(), "{out}");
    let out = capture("debug", LogFormat::Text, || log_fault(&Fault::cancelled("user")));
    assert!(out.contains("operation cancelled"), "{out}");
}

#[test]
fn render_options_limit_logged_chain() {
    let mut f = Fault::new("Leaf", 0);
    for i in 1..10 {
        f = Fault::new("Level", i).with_cause(f);
    }
    let opts = RenderOptions {
        max_depth: 2,
        ..RenderOptions::default()
    };
    let out = capture("error", LogFormat::Text, || log_fault_with(&f, &opts));
    assert!(out.contains("chain truncated at depth 2"), "{out}");
}

#[test]
fn cycle_drop_warning_is_visible() {
    let out = capture("warn", LogFormat::Text, || {
        let inner = Fault::new("A", 1);
        let outer = Fault::new("B", 2).with_cause(inner.clone());
        let _ = inner.with_cause(outer);
    });
    assert!(out.contains("WARN"), "{out}");
}
