// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end scenarios across the member crates, through the facade.

use std::collections::HashSet;
use std::time::Duration;

use faultline::codes::{PosixCode, Recoverability, StorageCode, UrlCode, classify_chain};
use faultline::prelude::*;
use faultline::propagate::{
    CancellationReason, collect_lenient, run_with_timeout, spawn_operation, spawn_with_callback,
};
use faultline::{Context, RenderOptions, make, render, render_with, wrap};

// ---------------------------------------------------------------------------
// Matching and identity
// ---------------------------------------------------------------------------

#[test]
fn matching_ignores_context_and_cause() {
    let a = Fault::builder("App", 7).description("first").build();
    let b = Fault::builder("App", 7)
        .description("second")
        .cause(Fault::new("POSIX", 1))
        .build();
    assert!(a.matches(&b));
    assert_ne!(a, b);
    assert!(!a.matches(&Fault::new("App", 8)));
    assert!(!a.matches(&Fault::new("Other", 7)));
}

#[test]
fn codes_are_domain_scoped() {
    let posix = make("POSIX", 4, None, None);
    let storage = make("Storage", 4, None, None);
    assert!(!posix.matches(&storage));
    assert_eq!(PosixCode::of(&posix), Some(PosixCode::Eintr));
    assert_eq!(StorageCode::of(&storage), Some(StorageCode::NoSuchFile));
}

#[test]
fn structural_equality_deduplicates() {
    let set: HashSet<Fault> = [
        Fault::new("App", 1),
        Fault::new("App", 1),
        Fault::builder("App", 1).description("differs").build(),
    ]
    .into_iter()
    .collect();
    assert_eq!(set.len(), 2);
}

// ---------------------------------------------------------------------------
// Immutability and chains
// ---------------------------------------------------------------------------

#[test]
fn enrichment_is_copy_on_write() {
    let e = Fault::builder("App", 1).description("original").build();
    let before = e.get(WellKnownKey::Description).map(|v| v.into_owned());
    let enriched = e
        .with_description("replaced")
        .with_context("attempt", 2i64);
    assert_eq!(e.get(WellKnownKey::Description).map(|v| v.into_owned()), before);
    assert!(e.get("attempt").is_none());
    assert_eq!(enriched.description(), Some("replaced"));
}

#[test]
fn reattaching_an_ancestor_does_not_cycle() {
    let root = Fault::new("A", 1);
    let mid = root.with_cause(Fault::new("B", 2));
    let top = Fault::new("C", 3).with_cause(mid.clone());
    let attempt = mid.with_cause(top);
    assert!(attempt.get(WellKnownKey::ChainTruncated).is_some());
    let out = render(&attempt);
    assert!(out.lines().count() < 64, "{out}");
}

#[test]
fn render_terminates_for_deep_chains() {
    let mut f = Fault::new("Leaf", 0);
    for i in 1..500 {
        f = wrap("Level", i, None, f);
    }
    let opts = RenderOptions {
        max_depth: 16,
        ..RenderOptions::default()
    };
    let out = render_with(&f, &opts);
    assert_eq!(out.matches("Error Domain=").count(), 16);
    assert!(out.contains("chain truncated at depth 16"));
}

#[test]
fn translation_at_boundary() {
    let e1 = make("POSIX", 4, None, None);
    let e2 = wrap("App", -42, None, e1.clone());
    assert_eq!(e2.domain().as_str(), "App");
    assert_eq!(e2.code(), -42);
    assert_eq!(e2.underlying(), Some(&e1));
    let out = render(&e2);
    let outer = out.find("-42").unwrap();
    let inner = out.find("Code=4").unwrap();
    assert!(outer < inner, "{out}");
}

#[test]
fn empty_context_reads_as_absent() {
    let f = make("App", 1, Some(Context::new()), None);
    assert!(f.get(WellKnownKey::Description).is_none());
    assert!(f.description().is_none());
    assert!(f.get(WellKnownKey::UnderlyingError).is_none());
    assert!(!f.localized_description().is_empty());
}

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

fn open_db(path: &str, error: Option<&mut ErrorSlot>) -> bool {
    let outcome = std::fs::metadata(path)
        .map(|_| ())
        .map_err(faultline::codes::posix::from_io)
        .wrap_err_with(|_| {
            Fault::builder("Storage", StorageCode::ReadNoSuchFile.code())
                .description("The database could not be opened.")
                .file_path(path)
        });
    faultline::propagate::report_bool(error, outcome)
}

#[test]
fn dual_channel_through_layers() {
    let mut slot = ErrorSlot::new();
    let ok = open_db("/definitely/missing/app.sqlite", Some(&mut slot));
    assert!(!ok);
    let fault = faultline::propagate::collect_bool(ok, &mut slot)
        .unwrap()
        .unwrap_err();
    assert!(StorageCode::ReadNoSuchFile.matches(&fault));
    assert!(PosixCode::Enoent.matches(fault.underlying().unwrap()));
    assert_eq!(classify_chain(&fault), Recoverability::Permanent);

    // Opting out still runs the operation.
    assert!(!open_db("/definitely/missing/app.sqlite", None));
}

#[test]
fn buggy_callee_degrades_to_missing_error() {
    fn buggy(_error: Option<&mut ErrorSlot>) -> Option<u8> {
        None
    }
    let mut slot = ErrorSlot::new();
    let fault = collect_lenient(buggy(Some(&mut slot)), &mut slot).unwrap_err();
    assert!(CoreCode::MissingError.matches(&fault));
}

#[tokio::test]
async fn async_completion_and_cancellation() {
    let ok = spawn_operation(CancellationToken::new(), async { Ok::<_, Fault>(3) });
    assert_eq!(ok.await.unwrap(), 3);

    let token = CancellationToken::new();
    let (tx, rx) = tokio::sync::oneshot::channel();
    let handle = spawn_with_callback(
        token.clone(),
        async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, Fault>(())
        },
        move |out| {
            let _ = tx.send(out);
        },
    );
    token.cancel_with(CancellationReason::SystemShutdown);
    handle.await.unwrap();
    let fault = rx.await.unwrap().unwrap_err();
    assert!(fault.is_cancellation());
    assert!(faultline::codes::is_cancellation(&fault));
}

#[tokio::test]
async fn timeout_is_transient() {
    let fault = run_with_timeout(Duration::from_millis(5), async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok::<(), Fault>(())
    })
    .await
    .unwrap_err();
    assert_eq!(classify_chain(&fault), Recoverability::Transient);
}

#[test]
fn url_fault_carries_failing_url() {
    let f = UrlCode::TimedOut.for_url("https://example.com/feed");
    assert_eq!(f.url(), Some("https://example.com/feed"));
    assert_eq!(
        f.get(faultline::codes::url::FAILING_URL).unwrap().as_str(),
        Some("https://example.com/feed")
    );
}
