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

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, trace, warn};

use crate::common::{
    BrokerBuilder, BrokerConfig, DispatchContext, DispatchResult, PendingCalls,
};
use crate::message::{DispatchError, Envelope, EnvelopeBuilder, EnvelopeId};
use crate::routing::{RouteInstruction, RouterChain};

/// The public façade of the routing engine.
///
/// The broker creates envelopes, starts dispatch through the router chain,
/// owns the pending-call table, enforces per-dispatch timeouts, and exposes
/// the reply-received notification entry point that transport routers call
/// when an out-of-band reply lands.
///
/// Cloning is cheap and every clone shares the same pending-call table, so a
/// reply received through one clone fulfills a dispatch awaited on another.
#[derive(Debug, Clone)]
pub struct MessageBroker {
    pub(crate) chain: RouterChain,
    pub(crate) pending: PendingCalls,
    pub(crate) config: Arc<BrokerConfig>,
}

impl MessageBroker {
    /// Starts assembling a broker from its collaborators.
    pub fn builder() -> BrokerBuilder {
        BrokerBuilder::default()
    }

    /// Dispatches one envelope and resolves its outcome.
    ///
    /// One-way envelopes are submitted to the router chain and the call
    /// returns `Ok(None)` as soon as the chain has accepted the message;
    /// downstream failures are logged, never surfaced here. Reply envelopes
    /// short-circuit without ever registering a pending call, so a reply can
    /// never await a further reply. Everything else registers a pending call
    /// under the envelope's id and resolves with exactly one of: a local
    /// reply from the chain, an out-of-band [`reply_received`] notification,
    /// the effective timeout, or the caller's cancellation signal. The
    /// timeout window opens before the chain runs, so it bounds local
    /// handler execution just like it bounds a remote round trip.
    ///
    /// [`reply_received`]: MessageBroker::reply_received
    #[instrument(skip(self, ctx, cancel), fields(envelope_id = %envelope.id()))]
    pub async fn dispatch(
        &self,
        envelope: Envelope,
        ctx: &DispatchContext,
        cancel: CancellationToken,
    ) -> DispatchResult {
        if envelope.is_one_way() {
            // Fire-and-forget: the chain's acceptance is the whole contract.
            if let Err(fault) = self.chain.evaluate(&envelope, ctx, &cancel).await {
                error!(
                    envelope_id = %envelope.id(),
                    %fault,
                    "one-way dispatch failed downstream; not surfaced to caller"
                );
            }
            return Ok(None);
        }

        if envelope.is_reply() {
            return self.dispatch_reply(envelope, ctx, cancel).await;
        }

        let id = envelope.id();
        let window = envelope.effective_timeout(self.config.default_dispatch_timeout());
        // Register before the chain sees the envelope, so a reply racing back
        // through a fast transport always finds its waiter.
        let waiter = self.pending.register(id);

        let expiry = async {
            match window {
                Some(window) => sleep(window).await,
                None => futures::future::pending::<()>().await,
            }
        };
        tokio::pin!(expiry);

        let chain_cancel = cancel.clone();
        let evaluation = self.chain.evaluate(&envelope, ctx, &chain_cancel);
        tokio::pin!(evaluation);

        // Chain evaluation races the same expiry and cancellation arms that
        // later guard the pending-call wait, so a stalling local handler can
        // never pin the caller past its window.
        tokio::select! {
            routed = &mut evaluation => match routed {
                Ok(RouteInstruction::Delivered(reply)) => {
                    self.pending.abandon(id);
                    Ok(reply)
                }
                Ok(RouteInstruction::Reply(content)) => {
                    self.pending.abandon(id);
                    Ok(Some(content))
                }
                Ok(RouteInstruction::Pending) | Ok(RouteInstruction::Forward) => {
                    self.await_reply(id, waiter, expiry, cancel).await
                }
                Err(fault) => {
                    self.pending.abandon(id);
                    Err(fault)
                }
            },
            _ = &mut expiry => {
                if self.pending.abandon(id) {
                    warn!(envelope_id = %id, "dispatch timed out");
                    Err(DispatchError::Timeout)
                } else {
                    Self::drain(waiter, DispatchError::Timeout).await
                }
            }
            _ = cancel.cancelled() => {
                if self.pending.abandon(id) {
                    debug!(envelope_id = %id, "dispatch cancelled by caller");
                    Err(DispatchError::Cancelled)
                } else {
                    Self::drain(waiter, DispatchError::Cancelled).await
                }
            }
        }
    }

    /// Joins a late-arriving reply with its blocked caller.
    ///
    /// Looks up the reply's `reply_to` linkage in the pending-call table;
    /// when found, the waiting dispatch resolves with the reply's content.
    /// An unmatched reply (already timed out, already answered, or truly
    /// unknown) is logged and dropped; it is never an error to any caller.
    #[instrument(skip(self, _ctx, _cancel), fields(envelope_id = %reply.id()))]
    pub async fn reply_received(
        &self,
        reply: Envelope,
        _ctx: &DispatchContext,
        _cancel: CancellationToken,
    ) {
        let Some(correlates) = reply.reply_to() else {
            warn!(
                envelope_id = %reply.id(),
                "reply_received called with an envelope that is not a reply; dropping"
            );
            return;
        };
        if self
            .pending
            .complete(correlates, Ok(Some(reply.content().clone())))
        {
            trace!(correlation_id = %correlates, "reply joined with pending call");
        } else {
            debug!(
                correlation_id = %correlates,
                "unmatched reply dropped (timed out, cancelled, or unknown)"
            );
        }
    }

    /// Returns a fresh, unconfigured envelope builder.
    pub fn envelope_builder(&self) -> EnvelopeBuilder {
        EnvelopeBuilder::new()
    }

    /// Returns a builder preconfigured to answer `original`.
    pub fn reply_builder(&self, original: &Envelope) -> EnvelopeBuilder {
        EnvelopeBuilder::new().in_reply_to(original)
    }

    /// The number of dispatches currently awaiting a reply.
    pub fn outstanding_calls(&self) -> usize {
        self.pending.outstanding()
    }

    /// The configuration this broker was assembled with.
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// The router names in evaluation order, for diagnostics.
    pub fn route_order(&self) -> Vec<&str> {
        self.chain.route_order()
    }

    /// A reply envelope never routes as a new request: the chain either
    /// short-circuits it back as content or delivers it locally, and no
    /// pending call is ever registered for it.
    async fn dispatch_reply(
        &self,
        envelope: Envelope,
        ctx: &DispatchContext,
        cancel: CancellationToken,
    ) -> DispatchResult {
        match self.chain.evaluate(&envelope, ctx, &cancel).await? {
            RouteInstruction::Reply(content) => Ok(Some(content)),
            RouteInstruction::Delivered(reply) => Ok(reply),
            RouteInstruction::Pending | RouteInstruction::Forward => Ok(None),
        }
    }

    /// Suspends the calling task until the pending call resolves.
    ///
    /// Runs against the expiry future armed when the dispatch started, so
    /// time already spent in chain evaluation counts against the window. The
    /// timeout and the caller's cancellation race the reply for the same
    /// result slot; whichever claims the table entry first wins. When the
    /// losing side finds the entry already gone, a real reply is in flight
    /// and is always delivered (no lost results).
    async fn await_reply(
        &self,
        id: EnvelopeId,
        mut waiter: oneshot::Receiver<DispatchResult>,
        expiry: impl Future<Output = ()>,
        cancel: CancellationToken,
    ) -> DispatchResult {
        tokio::pin!(expiry);

        tokio::select! {
            outcome = &mut waiter => outcome.unwrap_or_else(|_| {
                Err(DispatchError::ChannelClosed(
                    "result slot dropped before fulfillment".into(),
                ))
            }),
            _ = &mut expiry => {
                if self.pending.abandon(id) {
                    warn!(envelope_id = %id, "dispatch timed out");
                    Err(DispatchError::Timeout)
                } else {
                    // Lost the race to a completing reply; its send is imminent.
                    Self::drain(waiter, DispatchError::Timeout).await
                }
            }
            _ = cancel.cancelled() => {
                if self.pending.abandon(id) {
                    debug!(envelope_id = %id, "dispatch cancelled by caller");
                    Err(DispatchError::Cancelled)
                } else {
                    Self::drain(waiter, DispatchError::Cancelled).await
                }
            }
        }
    }

    /// Collects the result a concurrent completion is about to place in the
    /// slot. Falls back to the racing outcome only if the sender vanished.
    async fn drain(
        waiter: oneshot::Receiver<DispatchResult>,
        fallback: DispatchError,
    ) -> DispatchResult {
        waiter.await.unwrap_or(Err(fallback))
    }
}
