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
#![allow(unused)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use courier::prelude::*;
use tokio::time::sleep;

use crate::setup::messages::{Broken, EchoRequest, EchoResponse, Nudge, SlowChore, WhoAmI};

/// Shared call log recording the sequence of observed pipeline events.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn log_entries(log: &CallLog) -> Vec<String> {
    log.lock().expect("call log poisoned").clone()
}

fn record(log: &Option<CallLog>, entry: impl Into<String>) {
    if let Some(log) = log {
        log.lock().expect("call log poisoned").push(entry.into());
    }
}

/// The stand-in for the external handler-dispatch pipeline: resolves test
/// messages by downcast, the way a real pipeline resolves them by handler
/// lookup.
#[derive(Debug, Default)]
pub struct TestHandlers {
    log: Option<CallLog>,
}

impl TestHandlers {
    pub fn recording(log: CallLog) -> Self {
        TestHandlers { log: Some(log) }
    }
}

#[async_trait]
impl HandlerPipeline for TestHandlers {
    async fn process(
        &self,
        message: MessagePayload,
        ctx: &DispatchContext,
        _cancel: &CancellationToken,
    ) -> DispatchResult {
        record(&self.log, "handler");
        if let Some(echo) = message.downcast_ref::<EchoRequest>() {
            return Ok(Some(MessagePayload::new(EchoResponse {
                text: echo.text.clone(),
            })));
        }
        if let Some(chore) = message.downcast_ref::<SlowChore>() {
            sleep(Duration::from_millis(chore.delay_ms)).await;
            return Ok(None);
        }
        if message.downcast_ref::<WhoAmI>().is_some() {
            let subject = ctx
                .identity()
                .map(|identity| identity.subject.clone())
                .unwrap_or_else(|| "unresolved".to_string());
            return Ok(Some(MessagePayload::new(EchoResponse { text: subject })));
        }
        if message.downcast_ref::<Broken>().is_some() {
            return Err(DispatchError::handler("Broken always fails"));
        }
        if message.downcast_ref::<Nudge>().is_some() {
            return Ok(None);
        }
        Ok(None)
    }
}

/// Records its before/after invocations into the shared call log.
#[derive(Debug)]
pub struct RecordingBehavior {
    pub label: &'static str,
    pub rank: i32,
    pub applies_to: BehaviorFilter,
    pub log: CallLog,
}

impl RecordingBehavior {
    pub fn new(label: &'static str, rank: i32, log: CallLog) -> Self {
        RecordingBehavior {
            label,
            rank,
            applies_to: BehaviorFilter::Any,
            log,
        }
    }

    pub fn filtered(
        label: &'static str,
        rank: i32,
        applies_to: BehaviorFilter,
        log: CallLog,
    ) -> Self {
        RecordingBehavior {
            label,
            rank,
            applies_to,
            log,
        }
    }
}

#[async_trait]
impl Behavior for RecordingBehavior {
    fn priority(&self) -> i32 {
        self.rank
    }

    fn filter(&self) -> BehaviorFilter {
        self.applies_to.clone()
    }

    async fn before_process(
        &self,
        _message: &MessagePayload,
        _ctx: &DispatchContext,
    ) -> Result<(), DispatchError> {
        record(&Some(self.log.clone()), format!("before:{}", self.label));
        Ok(())
    }

    async fn after_process(
        &self,
        _message: &MessagePayload,
        outcome: &DispatchResult,
        _ctx: &DispatchContext,
    ) {
        let tag = if outcome.is_ok() { "ok" } else { "err" };
        record(
            &Some(self.log.clone()),
            format!("after:{}:{}", self.label, tag),
        );
    }
}

/// A behavior whose `before_process` always aborts the dispatch.
#[derive(Debug)]
pub struct FaultingBehavior {
    pub label: &'static str,
    pub rank: i32,
    pub log: CallLog,
}

#[async_trait]
impl Behavior for FaultingBehavior {
    fn priority(&self) -> i32 {
        self.rank
    }

    async fn before_process(
        &self,
        _message: &MessagePayload,
        _ctx: &DispatchContext,
    ) -> Result<(), DispatchError> {
        record(&Some(self.log.clone()), format!("before:{}", self.label));
        Err(DispatchError::handler(format!(
            "{} rejected the dispatch",
            self.label
        )))
    }
}

/// A router that accepts every request for "onward delivery" and never
/// answers, standing in for a transport stage whose replies arrive
/// out-of-band (or never).
#[derive(Debug)]
pub struct BlackHoleRouter {
    pub rank: i32,
}

#[async_trait]
impl Router for BlackHoleRouter {
    fn name(&self) -> &str {
        "black-hole"
    }

    fn priority(&self) -> i32 {
        self.rank
    }

    async fn route(
        &self,
        envelope: &Envelope,
        _ctx: &DispatchContext,
        _cancel: &CancellationToken,
    ) -> Result<RouteInstruction, DispatchError> {
        if envelope.is_reply() {
            return Ok(RouteInstruction::Forward);
        }
        Ok(RouteInstruction::Pending)
    }
}

/// Records the order in which the chain consults it, then forwards.
#[derive(Debug)]
pub struct RecordingRouter {
    pub label: &'static str,
    pub rank: i32,
    pub log: CallLog,
}

#[async_trait]
impl Router for RecordingRouter {
    fn name(&self) -> &str {
        self.label
    }

    fn priority(&self) -> i32 {
        self.rank
    }

    async fn route(
        &self,
        _envelope: &Envelope,
        _ctx: &DispatchContext,
        _cancel: &CancellationToken,
    ) -> Result<RouteInstruction, DispatchError> {
        record(&Some(self.log.clone()), self.label);
        Ok(RouteInstruction::Forward)
    }
}

/// Captures every envelope handed to the outbound transport.
#[derive(Debug, Default)]
pub struct CapturingTransport {
    pub seen: Mutex<Vec<EnvelopeId>>,
}

impl CapturingTransport {
    pub fn seen_ids(&self) -> Vec<EnvelopeId> {
        self.seen.lock().expect("transport log poisoned").clone()
    }
}

#[async_trait]
impl OutboundTransport for CapturingTransport {
    async fn forward(
        &self,
        envelope: Envelope,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        self.seen
            .lock()
            .expect("transport log poisoned")
            .push(envelope.id());
        Ok(())
    }
}

/// Resolver that trusts the bearer token as the subject name.
#[derive(Debug, Default)]
pub struct TokenResolver;

#[async_trait]
impl IdentityResolver for TokenResolver {
    async fn resolve_identity(
        &self,
        bearer_token: &str,
        _ctx: &DispatchContext,
        _cancel: &CancellationToken,
    ) -> Result<Identity, DispatchError> {
        Ok(Identity::new(bearer_token))
    }
}

/// Resolver that rejects every token.
#[derive(Debug, Default)]
pub struct RejectingResolver;

#[async_trait]
impl IdentityResolver for RejectingResolver {
    async fn resolve_identity(
        &self,
        bearer_token: &str,
        _ctx: &DispatchContext,
        _cancel: &CancellationToken,
    ) -> Result<Identity, DispatchError> {
        Err(DispatchError::IdentityRejected(format!(
            "unknown token {bearer_token:?}"
        )))
    }
}

/// Broker wired with only the test handler pipeline.
pub fn echo_broker() -> MessageBroker {
    MessageBroker::builder()
        .with_handler_pipeline(Arc::new(TestHandlers::default()))
        .build()
        .expect("broker assembly failed")
}
