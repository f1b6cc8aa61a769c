//! End-signature probing observed through the public API.

use crate::common::*;
use txbridge::prelude::*;

#[test]
fn notify_fallback_commits_with_notify_true() {
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge =
        Bridge::spawn_with(move || MockProgram::with_support(host_calls, EndSupport::ThreeArgOnly))
            .unwrap();
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
            Call::EndNotify {
                id: 1,
                commit: true,
                notify: true,
            },
        ]
    );
}

#[test]
fn notify_fallback_carries_the_rollback_flag() {
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge =
        Bridge::spawn_with(move || MockProgram::with_support(host_calls, EndSupport::ThreeArgOnly))
            .unwrap();
    let resource = bridge.handle();

    let error = execute(&resource, "rename-symbol", |host| {
        host.with(|p| p.rename_symbol("missing", "bar"))
    })
    .unwrap_err();

    assert!(error.is_operation_failure());
    bridge.close();
    assert_eq!(
        *calls.lock(),
        vec![
            Call::Begin("rename-symbol".to_string()),
            Call::EndNotify {
                id: 1,
                commit: false,
                notify: true,
            },
        ]
    );
}

#[test]
fn missing_end_variants_stay_secondary() {
    init_tracing();
    let calls = recorder();
    let host_calls = calls.clone();
    let bridge =
        Bridge::spawn_with(move || MockProgram::with_support(host_calls, EndSupport::Neither))
            .unwrap();
    let resource = bridge.handle();

    // Neither end signature exists on this host "version": the miss is
    // logged as a secondary failure, the operation's value still wins.
    let renamed = execute(&resource, "rename-symbol", |host| {
        host.with(|p| p.rename_symbol("foo", "bar"))
    })
    .unwrap();

    assert_eq!(renamed, "bar");
    bridge.close();
    assert_eq!(*calls.lock(), vec![Call::Begin("rename-symbol".to_string())]);
}
