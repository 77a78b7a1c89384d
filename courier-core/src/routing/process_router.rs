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

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, trace, warn};

use crate::behavior::BehaviorPipeline;
use crate::common::DispatchContext;
use crate::message::{DispatchError, EndpointAddress, Envelope};
use crate::routing::{RouteInstruction, Router};
use crate::traits::{HandlerPipeline, IdentityResolver, OutboundTransport};

/// The in-process fallback router: delivers locally addressed envelopes
/// through the behavior pipeline and handler pipeline, short-circuits reply
/// envelopes, and hands everything else to the outbound transport.
///
/// Handler execution always runs on its own spawned task, so a slow handler
/// never blocks the routing loop that dispatched it (no head-of-line
/// blocking when envelopes arrive back-to-back).
#[derive(Debug)]
pub struct ProcessRouter {
    local_endpoint: EndpointAddress,
    handlers: Arc<dyn HandlerPipeline>,
    identity: Arc<dyn IdentityResolver>,
    behaviors: Arc<BehaviorPipeline>,
    outbound: Option<Arc<dyn OutboundTransport>>,
}

impl ProcessRouter {
    pub(crate) fn new(
        local_endpoint: EndpointAddress,
        handlers: Arc<dyn HandlerPipeline>,
        identity: Arc<dyn IdentityResolver>,
        behaviors: Arc<BehaviorPipeline>,
        outbound: Option<Arc<dyn OutboundTransport>>,
    ) -> Self {
        ProcessRouter {
            local_endpoint,
            handlers,
            identity,
            behaviors,
            outbound,
        }
    }

    /// An envelope with no recipients is local by convention; otherwise the
    /// local endpoint must be among the recipients.
    fn is_local(&self, envelope: &Envelope) -> bool {
        envelope.recipients().is_empty()
            || envelope
                .recipients()
                .iter()
                .any(|recipient| *recipient == self.local_endpoint)
    }

    /// Resolves the envelope locally: identity first, then the behavior
    /// pipeline wrapped around the handler pipeline.
    #[instrument(skip(self, ctx, cancel), fields(envelope_id = %envelope.id()))]
    async fn route_input(
        &self,
        envelope: &Envelope,
        ctx: &DispatchContext,
        cancel: &CancellationToken,
    ) -> Result<RouteInstruction, DispatchError> {
        let ctx = match envelope.bearer_token() {
            Some(token) => {
                let identity = self
                    .identity
                    .resolve_identity(token, ctx, cancel)
                    .await?;
                ctx.with_identity(identity)
            }
            None => ctx.clone(),
        };

        let behaviors = self.behaviors.clone();
        let handlers = self.handlers.clone();
        let payload = envelope.content().clone();

        if envelope.is_one_way() {
            // Detached execution with an isolated error boundary: failures
            // here are observable only through logs, never through the
            // caller's result. The work outlives the dispatching call, so it
            // carries its own cancellation token.
            let id = envelope.id();
            let detached = CancellationToken::new();
            tokio::spawn(async move {
                if let Err(fault) = behaviors
                    .execute(&handlers, payload, &ctx, &detached)
                    .await
                {
                    error!(envelope_id = %id, %fault, "one-way handler execution failed");
                }
            });
            return Ok(RouteInstruction::Delivered(None));
        }

        let cancel = cancel.clone();
        let task = tokio::spawn(async move {
            behaviors.execute(&handlers, payload, &ctx, &cancel).await
        });
        match task.await {
            Ok(outcome) => {
                let reply = outcome?;
                Ok(RouteInstruction::Delivered(reply))
            }
            Err(join_fault) => Err(DispatchError::HandlerFault(format!(
                "handler task aborted: {}",
                join_fault
            ))),
        }
    }

    /// Decision point for outbound traffic: a reply envelope completes its
    /// journey in-process, everything else leaves through the transport.
    #[instrument(skip(self, cancel), fields(envelope_id = %envelope.id()))]
    fn route_output(
        &self,
        envelope: &Envelope,
        cancel: &CancellationToken,
    ) -> RouteInstruction {
        if let Some(correlates) = envelope.reply_to() {
            trace!(correlation_id = %correlates, "reply short-circuit; no further routing");
            return RouteInstruction::Reply(envelope.content().clone());
        }

        match &self.outbound {
            Some(transport) => {
                // Fire-and-forget hand-off; a failed forward is logged once
                // and the pending call ages out. No retries.
                let transport = transport.clone();
                let outbound = envelope.clone();
                let id = envelope.id();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if let Err(fault) = transport.forward(outbound, &cancel).await {
                        error!(envelope_id = %id, %fault, "outbound forwarding failed");
                    } else {
                        debug!(envelope_id = %id, "envelope handed to outbound transport");
                    }
                });
            }
            None => {
                warn!(
                    envelope_id = %envelope.id(),
                    "no outbound transport configured; envelope will age out unanswered"
                );
            }
        }
        RouteInstruction::Pending
    }
}

#[async_trait]
impl Router for ProcessRouter {
    fn name(&self) -> &str {
        "process"
    }

    // The chain pins the fallback last regardless; the priority only matters
    // if a process router is ever registered explicitly.
    fn priority(&self) -> i32 {
        i32::MIN
    }

    async fn route(
        &self,
        envelope: &Envelope,
        ctx: &DispatchContext,
        cancel: &CancellationToken,
    ) -> Result<RouteInstruction, DispatchError> {
        if self.is_local(envelope) && !envelope.is_reply() {
            self.route_input(envelope, ctx, cancel).await
        } else {
            Ok(self.route_output(envelope, cancel))
        }
    }
}
