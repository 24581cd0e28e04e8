// SPDX-License-Identifier: MIT OR Apache-2.0
//! Snapshot tests for rendered fault chains.

use fl_error::{DomainRegistry, Fault, RenderOptions, render, wrap};
use fl_error::render::render_with_registry;

#[test]
fn boundary_translation_renders_child_then_parent() {
    let e1 = Fault::new("POSIX", 4);
    let e2 = wrap("App", -42, None, e1.clone());

    assert_eq!(e2.domain().as_str(), "App");
    assert_eq!(e2.code(), -42);
    assert_eq!(e2.underlying(), Some(&e1));

    let out = render(&e2);
    let outer = out.find("Code=-42").expect("outer code rendered");
    let inner = out.find("Code=4").expect("inner code rendered");
    assert!(outer < inner, "child must render before parent:\n{out}");
}

#[test]
fn full_chain_snapshot() {
    let reg = DomainRegistry::new();
    let posix = reg.intern("POSIX");
    reg.declare(&posix, 13, "EACCES");

    let denied = Fault::builder(posix, 13)
        .failure_reason("Permission denied")
        .file_path("/var/db/app.sqlite")
        .build();
    let storage = Fault::builder(reg.intern("Storage"), 257)
        .description("The file couldn’t be opened because you don’t have permission to view it.")
        .recovery_suggestion("Ask the owner for access.")
        .cause(denied)
        .build();
    let app = Fault::builder(reg.intern("App"), -42)
        .description("Could not load the library.")
        .recovery_options(["Retry", "Quit"])
        .context("attempt", 3i64)
        .cause(storage)
        .build();

    insta::assert_snapshot!(render_with_registry(&app, &RenderOptions::default(), &reg), @r"
    Error Domain=App Code=-42
      description: Could not load the library.
      recovery options: [Retry, Quit]
      attempt: 3
      caused by:
        Error Domain=Storage Code=257
          description: The file couldn’t be opened because you don’t have permission to view it.
          recovery suggestion: Ask the owner for access.
          caused by:
            Error Domain=POSIX Code=13 (EACCES)
              failure reason: Permission denied
              file path: /var/db/app.sqlite
    ");
}

#[test]
fn foreign_root_snapshot() {
    let reg = DomainRegistry::new();
    let f = Fault::builder(reg.intern("URL"), -1005)
        .description("The network connection was lost.")
        .foreign_cause(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))
        .build();

    insta::assert_snapshot!(render_with_registry(&f, &RenderOptions::default(), &reg), @r"
    Error Domain=URL Code=-1005
      description: The network connection was lost.
      caused by:
        Foreign: connection reset by peer
    ");
}

#[test]
fn minimal_fault_always_renders() {
    let out = render(&Fault::new("App", 1));
    assert!(out.starts_with("Error Domain=App Code=1"));
}
