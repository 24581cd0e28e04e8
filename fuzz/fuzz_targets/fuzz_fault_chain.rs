// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz fault construction, re-parenting, and rendering.
//!
//! Builds chains from arbitrary steps, including attempts to attach an
//! ancestor as a cause, and verifies:
//! 1. No step panics.
//! 2. Every chain walk is finite and no longer than the number of steps.
//! 3. Rendering stays within the configured depth cap.
//! 4. Snapshot serialization never fails.
#![no_main]
use arbitrary::Arbitrary;
use fl_error::{Fault, RenderOptions, render_with};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    Wrap { domain: u8, code: i64 },
    Describe(String),
    Context { key: String, value: i64 },
    ReattachAncestor(u8),
    DropCause,
}

#[derive(Debug, Arbitrary)]
struct Input {
    max_depth: u8,
    steps: Vec<Step>,
}

const DOMAINS: &[&str] = &["POSIX", "Storage", "URL", "App", "faultline"];

fn one_line(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}

fuzz_target!(|input: Input| {
    let mut history: Vec<Fault> = vec![Fault::new("Leaf", 0)];
    for step in input.steps.iter().take(256) {
        let current = history.last().cloned().unwrap_or_else(|| Fault::new("Leaf", 0));
        let next = match step {
            Step::Wrap { domain, code } => {
                let d = DOMAINS[*domain as usize % DOMAINS.len()];
                fl_error::wrap(d, *code, None, current)
            }
            Step::Describe(s) => current.with_description(one_line(s)),
            Step::Context { key, value } => current.with_context(one_line(key), *value),
            Step::ReattachAncestor(i) => {
                let ancestor = history[*i as usize % history.len()].clone();
                ancestor.with_cause(current)
            }
            Step::DropCause => current.without_cause(),
        };
        history.push(next);
    }

    let last = history.last().cloned().unwrap_or_else(|| Fault::new("Leaf", 0));
    assert!(last.chain().count() <= history.len());

    let max_depth = usize::from(input.max_depth.max(1));
    let opts = RenderOptions {
        max_depth,
        ..RenderOptions::default()
    };
    let out = render_with(&last, &opts);
    let headers = out
        .lines()
        .filter(|l| l.trim_start().starts_with("Error Domain="))
        .count();
    assert!(headers <= max_depth);

    let _ = serde_json::to_string(&last).expect("snapshot serialization");
});
