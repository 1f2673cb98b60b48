//! Contract: periodic loop submissions track IP changes one-to-one
//!
//! Constraints verified:
//! - an unchanged address never triggers a submission
//! - a changed address triggers exactly one submission before the next
//!   sleep
//! - a delivery failure inside the loop is reported, not fatal
//!
//! If these fail, the loop is either spamming the provider or missing
//! address changes.

mod common;

use common::*;
use gddns_core::{Outcome, UpdateEngine};
use std::net::Ipv4Addr;
use std::time::Duration;

const IP_A: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 5);
const IP_B: Ipv4Addr = Ipv4Addr::new(198, 51, 100, 7);
const IP_C: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 9);

/// Interval short enough to fit several cycles into one test run
const TEST_INTERVAL: Duration = Duration::from_millis(10);

/// Long enough for many TEST_INTERVAL cycles to elapse
const SETTLE: Duration = Duration::from_millis(150);

#[tokio::test]
async fn unchanged_address_submits_nothing() {
    let source = ScriptedIpSource::new(vec![Ok(IP_A)]);
    let source_probe = ScriptedIpSource::sharing_counters_with(&source);
    let provider = ScriptedProvider::always("good 203.0.113.5");
    let provider_probe = ScriptedProvider::sharing_counters_with(&provider);

    let (engine, _events) = UpdateEngine::new(
        Box::new(source),
        Box::new(provider),
        test_config("h.example.com"),
    )
    .expect("engine construction succeeds");
    let mut engine = engine.with_check_interval(TEST_INTERVAL);

    let outcome = engine.run_once().await.expect("initial submission succeeds");
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(provider_probe.submit_call_count(), 1);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    tokio::time::sleep(SETTLE).await;
    shutdown_tx.send(()).expect("engine is still running");
    handle.await.unwrap().expect("loop shuts down cleanly");

    // Several cycles resolved the same address; none of them submitted.
    assert!(
        source_probe.resolve_call_count() >= 3,
        "expected several resolution cycles, got {}",
        source_probe.resolve_call_count()
    );
    assert_eq!(
        provider_probe.submit_call_count(),
        1,
        "unchanged address must not trigger further submissions"
    );
}

#[tokio::test]
async fn changed_address_submits_exactly_once() {
    // run_once sees A, every loop cycle sees B
    let source = ScriptedIpSource::new(vec![Ok(IP_A), Ok(IP_B)]);
    let provider = ScriptedProvider::always("good");
    let provider_probe = ScriptedProvider::sharing_counters_with(&provider);

    let (engine, _events) = UpdateEngine::new(
        Box::new(source),
        Box::new(provider),
        test_config("h.example.com"),
    )
    .expect("engine construction succeeds");
    let mut engine = engine.with_check_interval(TEST_INTERVAL);

    engine.run_once().await.expect("initial submission succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    tokio::time::sleep(SETTLE).await;
    shutdown_tx.send(()).expect("engine is still running");
    handle.await.unwrap().expect("loop shuts down cleanly");

    // One submission for A (one-shot), exactly one for the change to B.
    assert_eq!(provider_probe.submit_call_count(), 2);

    let requests = provider_probe.submitted_requests();
    assert_eq!(requests[0].ip, Some(IP_A));
    assert_eq!(requests[1].ip, Some(IP_B));
}

#[tokio::test]
async fn delivery_failure_does_not_stop_the_loop() {
    // A for the one-shot, then B (whose delivery fails), then C
    let source = ScriptedIpSource::new(vec![Ok(IP_A), Ok(IP_B), Ok(IP_C)]);
    let provider = ScriptedProvider::new(vec![
        Ok("good".to_string()),
        Err("connection reset".to_string()),
        Ok("good".to_string()),
    ]);
    let provider_probe = ScriptedProvider::sharing_counters_with(&provider);

    let (engine, _events) = UpdateEngine::new(
        Box::new(source),
        Box::new(provider),
        test_config("h.example.com"),
    )
    .expect("engine construction succeeds");
    let mut engine = engine.with_check_interval(TEST_INTERVAL);

    engine.run_once().await.expect("initial submission succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    tokio::time::sleep(SETTLE).await;
    shutdown_tx.send(()).expect("engine is still running");
    handle.await.unwrap().expect("loop shuts down cleanly");

    // A succeeded, B's delivery failed (reported, loop continued), C
    // succeeded on a later cycle.
    assert_eq!(provider_probe.submit_call_count(), 3);
    let requests = provider_probe.submitted_requests();
    assert_eq!(requests[2].ip, Some(IP_C));
}
