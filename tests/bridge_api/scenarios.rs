//! Execute entry-point scenarios against the mock symbol database.

use std::sync::{mpsc, Arc};
use std::thread;

use crate::common::*;
use txbridge::prelude::*;

#[test]
fn rename_symbol_success_commits_once() {
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge = Bridge::spawn_with(move || MockProgram::new(host_calls)).unwrap();
    let resource = bridge.handle();

    let renamed = execute(&resource, "rename-symbol", |host| {
        host.with(|p| p.rename_symbol("foo", "bar"))
    })
    .unwrap();

    assert_eq!(renamed, "bar");
    bridge.close();
    assert_eq!(
        *calls.lock(),
        vec![
            Call::Begin("rename-symbol".to_string()),
            Call::End { id: 1, commit: true },
        ]
    );
}

#[test]
fn rename_symbol_not_found_rolls_back() {
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge = Bridge::spawn_with(move || MockProgram::new(host_calls)).unwrap();
    let resource = bridge.handle();

    let error = execute(&resource, "rename-symbol", |host| {
        host.with(|p| p.rename_symbol("missing", "bar"))
    })
    .unwrap_err();

    assert!(error.is_operation_failure());
    assert_eq!(error.kind().as_str(), "OperationFailure");
    match &error {
        Error::Operation { name, source } => {
            assert_eq!(name, "rename-symbol");
            let cause = source.downcast_ref::<SymbolNotFound>().expect("original cause");
            assert_eq!(cause, &SymbolNotFound("missing".to_string()));
        }
        other => panic!("expected operation failure, got {other:?}"),
    }

    bridge.close();
    assert_eq!(
        *calls.lock(),
        vec![
            Call::Begin("rename-symbol".to_string()),
            Call::End { id: 1, commit: false },
        ]
    );
}

#[test]
fn begin_failure_has_no_end_and_chains_cause() {
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge = Bridge::spawn_with(move || MockProgram::failing_begin(host_calls)).unwrap();
    let resource = bridge.handle();

    let error = execute(&resource, "rename-symbol", |host| {
        host.with(|p| p.rename_symbol("foo", "bar"))
    })
    .unwrap_err();

    assert!(error.is_start_failure());
    assert!(std::error::Error::source(&error).is_some());
    bridge.close();
    assert!(calls.lock().is_empty());
}

#[test]
fn end_failure_after_success_still_returns_value() {
    init_tracing();
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge = Bridge::spawn_with(move || MockProgram::failing_end(host_calls)).unwrap();
    let resource = bridge.handle();

    let renamed = execute(&resource, "rename-symbol", |host| {
        host.with(|p| p.rename_symbol("foo", "bar"))
    })
    .unwrap();

    // The end failure is secondary: logged, never returned.
    assert_eq!(renamed, "bar");
    bridge.close();
    assert_eq!(*calls.lock(), vec![Call::Begin("rename-symbol".to_string())]);
}

#[test]
fn detached_handle_fails_fast_without_side_effects() {
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge = Bridge::spawn_with(move || MockProgram::new(host_calls)).unwrap();
    let resource = bridge.handle();
    bridge.close();

    assert!(!resource.is_attached());
    let error = execute(&resource, "rename-symbol", |host| {
        host.with(|p| p.rename_symbol("foo", "bar"))
    })
    .unwrap_err();

    assert!(error.is_invalid_argument());
    assert!(matches!(error, Error::ResourceDetached));
    assert!(calls.lock().is_empty());
}

#[test]
fn close_is_idempotent() {
    let bridge = Bridge::spawn_with(|| MockProgram::new(recorder())).unwrap();
    bridge.close();
    bridge.close();
}

#[test]
fn close_racing_a_worker_side_close_cannot_deadlock() {
    let bridge = Arc::new(Bridge::spawn_with(|| MockProgram::new(recorder())).unwrap());
    let resource = bridge.handle();
    let worker_side = Arc::clone(&bridge);
    let (started_tx, started_rx) = mpsc::channel();

    // The operation closes its own bridge from the worker thread while the
    // caller thread closes it too. Joining the worker must not happen with
    // the bridge lock held, or the worker-side close would block on it and
    // the join would never return.
    let operation = thread::spawn(move || {
        resource.execute("shutdown-from-inside", move |_host| {
            started_tx.send(()).unwrap();
            worker_side.close();
            Ok::<_, SymbolNotFound>(())
        })
    });

    started_rx.recv().unwrap();
    bridge.close();
    operation.join().unwrap().unwrap();
}

#[test]
fn operation_panic_is_reported_and_worker_survives() {
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge = Bridge::spawn_with(move || MockProgram::new(host_calls)).unwrap();
    let resource = bridge.handle();

    let error = execute(&resource, "explode", |_host| -> Result<(), SymbolNotFound> {
        panic!("splat")
    })
    .unwrap_err();

    assert!(error.is_operation_failure());
    assert!(error.to_string().contains("operation panicked: splat"));

    // The worker kept running and the failed transaction rolled back.
    let renamed = execute(&resource, "rename-symbol", |host| {
        host.with(|p| p.rename_symbol("foo", "bar"))
    })
    .unwrap();
    assert_eq!(renamed, "bar");

    bridge.close();
    assert_eq!(
        *calls.lock(),
        vec![
            Call::Begin("explode".to_string()),
            Call::End { id: 1, commit: false },
            Call::Begin("rename-symbol".to_string()),
            Call::End { id: 2, commit: true },
        ]
    );
}

#[test]
fn caller_blocks_until_the_worker_finishes() {
    let bridge = Bridge::<MockProgram>::builder()
        .thread_name("blocking-test")
        .spawn_with(|| MockProgram::new(recorder()))
        .unwrap();
    let resource = bridge.handle();
    let caller = thread::current().id();

    let worker_thread = execute(&resource, "probe", |host| {
        // Runs on the worker; by the time execute returns, the state
        // change below is visible to the caller.
        host.with(|p| p.rename_symbol("foo", "probe-ran"))?;
        Ok::<_, SymbolNotFound>(thread::current().id())
    })
    .unwrap();

    assert_ne!(worker_thread, caller);
    let present = execute(&resource, "check", |host| {
        Ok::<_, SymbolNotFound>(host.with(|p| p.has_symbol("probe-ran")))
    })
    .unwrap();
    assert!(present);
    assert_eq!(resource.stats().remote(), 2);
    bridge.close();
}
