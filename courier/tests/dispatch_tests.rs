/*
 * Copyright (c) 2025. Courier Contributors
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use courier::prelude::*;

use crate::setup::{
    collaborators::{echo_broker, RejectingResolver, TestHandlers, TokenResolver},
    initialize_tracing,
    messages::{Broken, EchoRequest, EchoResponse, SlowChore, WhoAmI},
};

mod setup;

/// Round-trip identity: an echo request comes back with the handler's reply
/// content, unmodified by routing.
#[tokio::test]
async fn test_echo_round_trip() -> anyhow::Result<()> {
    initialize_tracing();
    let broker = echo_broker();

    let envelope = broker.envelope_builder().build(EchoRequest {
        text: "ping".into(),
    });
    let ctx = DispatchContext::for_envelope(&envelope);
    let reply = broker
        .dispatch(envelope, &ctx, CancellationToken::new())
        .await?
        .expect("echo produces a reply");

    let echoed = reply
        .downcast_ref::<EchoResponse>()
        .expect("reply is an EchoResponse");
    assert_eq!(echoed.text, "ping");
    assert_eq!(broker.outstanding_calls(), 0);
    Ok(())
}

/// One-way dispatch never blocks on a reply: the call returns long before a
/// deliberately slow handler finishes.
#[tokio::test]
async fn test_one_way_dispatch_returns_immediately() -> anyhow::Result<()> {
    initialize_tracing();
    let broker = echo_broker();

    let envelope = broker
        .envelope_builder()
        .one_way(true)
        .build(SlowChore { delay_ms: 2_000 });
    let ctx = DispatchContext::for_envelope(&envelope);

    let started = Instant::now();
    let outcome = broker
        .dispatch(envelope, &ctx, CancellationToken::new())
        .await?;
    assert!(outcome.is_none(), "one-way dispatch carries no reply");
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "one-way dispatch must not wait for the handler"
    );
    assert_eq!(broker.outstanding_calls(), 0);
    Ok(())
}

/// The dispatch timeout bounds local handler execution: a stalling handler
/// faults the caller with a timeout instead of pinning it until the handler
/// returns.
#[tokio::test]
async fn test_local_handler_stall_faults_with_timeout() {
    initialize_tracing();
    let broker = echo_broker();

    let envelope = broker
        .envelope_builder()
        .timeout(Duration::from_millis(30))
        .build(SlowChore { delay_ms: 3_000 });
    let ctx = DispatchContext::for_envelope(&envelope);

    let started = Instant::now();
    let outcome = broker
        .dispatch(envelope, &ctx, CancellationToken::new())
        .await;
    let elapsed = started.elapsed();

    assert!(matches!(outcome, Err(DispatchError::Timeout)));
    assert!(
        elapsed < Duration::from_millis(200),
        "timeout took {elapsed:?}, expected well under 200ms"
    );
    assert_eq!(broker.outstanding_calls(), 0);
}

/// Cancellation unblocks a caller stuck on a stalling local handler, with
/// the cancellation outcome rather than a timeout or fault.
#[tokio::test]
async fn test_local_handler_stall_honors_cancellation() {
    initialize_tracing();
    let broker = echo_broker();

    let envelope = broker
        .envelope_builder()
        .timeout(Duration::from_secs(30))
        .build(SlowChore { delay_ms: 3_000 });
    let ctx = DispatchContext::for_envelope(&envelope);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let outcome = broker.dispatch(envelope, &ctx, cancel).await;

    assert!(matches!(outcome, Err(DispatchError::Cancelled)));
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "cancellation must not wait for the handler"
    );
    assert_eq!(broker.outstanding_calls(), 0);
}

/// A handler fault is wrapped and surfaced to the original caller as an
/// error, not a crash of the dispatch loop.
#[tokio::test]
async fn test_handler_fault_is_surfaced() {
    initialize_tracing();
    let broker = echo_broker();

    let envelope = broker.envelope_builder().build(Broken);
    let ctx = DispatchContext::for_envelope(&envelope);
    let outcome = broker
        .dispatch(envelope, &ctx, CancellationToken::new())
        .await;

    match outcome {
        Err(DispatchError::HandlerFault(msg)) => assert!(msg.contains("Broken")),
        other => panic!("expected a handler fault, got {other:?}"),
    }
    assert_eq!(broker.outstanding_calls(), 0);

    // The broker keeps dispatching after the fault.
    let envelope = broker.envelope_builder().build(EchoRequest {
        text: "still alive".into(),
    });
    let ctx = DispatchContext::for_envelope(&envelope);
    let reply = broker
        .dispatch(envelope, &ctx, CancellationToken::new())
        .await
        .expect("dispatch after fault succeeds")
        .expect("echo produces a reply");
    let echoed = reply.downcast_ref::<EchoResponse>().unwrap();
    assert_eq!(echoed.text, "still alive");
}

/// The resolved identity is visible to the handler pipeline through the
/// dispatch context.
#[tokio::test]
async fn test_identity_resolution_enriches_context() -> anyhow::Result<()> {
    initialize_tracing();
    let broker = MessageBroker::builder()
        .with_handler_pipeline(Arc::new(TestHandlers::default()))
        .with_identity_resolver(Arc::new(TokenResolver))
        .build()?;

    let envelope = broker
        .envelope_builder()
        .bearer_token("alice")
        .build(WhoAmI);
    let ctx = DispatchContext::for_envelope(&envelope);
    let reply = broker
        .dispatch(envelope, &ctx, CancellationToken::new())
        .await?
        .expect("WhoAmI produces a reply");

    let subject = reply.downcast_ref::<EchoResponse>().unwrap();
    assert_eq!(subject.text, "alice");
    Ok(())
}

/// An identity-resolution failure propagates to the caller as a fault reply.
#[tokio::test]
async fn test_identity_rejection_faults_the_dispatch() -> anyhow::Result<()> {
    initialize_tracing();
    let broker = MessageBroker::builder()
        .with_handler_pipeline(Arc::new(TestHandlers::default()))
        .with_identity_resolver(Arc::new(RejectingResolver))
        .build()?;

    let envelope = broker
        .envelope_builder()
        .bearer_token("mallory")
        .build(WhoAmI);
    let ctx = DispatchContext::for_envelope(&envelope);
    let outcome = broker
        .dispatch(envelope, &ctx, CancellationToken::new())
        .await;

    match outcome {
        Err(DispatchError::IdentityRejected(msg)) => assert!(msg.contains("mallory")),
        other => panic!("expected identity rejection, got {other:?}"),
    }
    assert_eq!(broker.outstanding_calls(), 0);
    Ok(())
}

/// Envelopes without a bearer token skip identity resolution entirely.
#[tokio::test]
async fn test_tokenless_envelope_skips_identity_resolution() -> anyhow::Result<()> {
    initialize_tracing();
    let broker = MessageBroker::builder()
        .with_handler_pipeline(Arc::new(TestHandlers::default()))
        .with_identity_resolver(Arc::new(RejectingResolver))
        .build()?;

    let envelope = broker.envelope_builder().build(WhoAmI);
    let ctx = DispatchContext::for_envelope(&envelope);
    let reply = broker
        .dispatch(envelope, &ctx, CancellationToken::new())
        .await?
        .expect("WhoAmI produces a reply");

    let subject = reply.downcast_ref::<EchoResponse>().unwrap();
    assert_eq!(subject.text, "unresolved");
    Ok(())
}
