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

use std::time::{Duration, SystemTime};

use crate::common::MessagePayload;
use crate::message::{EndpointAddress, Envelope, EnvelopeId};
use crate::traits::BrokerMessage;

/// Fluent builder producing an [`Envelope`] from a logical payload plus
/// optional configuration.
///
/// Builder calls are side-effect-free; the only observable effect of
/// [`build`](EnvelopeBuilder::build) is the allocation of a fresh envelope
/// identifier, which is collision-free across the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeBuilder {
    sender: Option<EndpointAddress>,
    recipients: Vec<EndpointAddress>,
    reply_to: Option<EnvelopeId>,
    one_way: bool,
    timeout: Option<Duration>,
    bearer_token: Option<String>,
}

impl EnvelopeBuilder {
    /// Creates an unconfigured builder.
    pub fn new() -> Self {
        EnvelopeBuilder::default()
    }

    /// Sets the sending endpoint.
    pub fn sender(mut self, sender: impl Into<EndpointAddress>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Adds a recipient endpoint. Envelopes with no recipients are delivered
    /// to the local endpoint.
    pub fn recipient(mut self, recipient: impl Into<EndpointAddress>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    /// Marks the envelope as one-way: no reply is expected and the dispatching
    /// caller does not block.
    pub fn one_way(mut self, one_way: bool) -> Self {
        self.one_way = one_way;
        self
    }

    /// Overrides the broker's default dispatch timeout for this envelope.
    pub fn timeout(mut self, window: Duration) -> Self {
        self.timeout = Some(window);
        self
    }

    /// Disables the dispatch timeout entirely for this envelope.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = Some(Duration::ZERO);
        self
    }

    /// Attaches an opaque bearer token for the identity-resolution collaborator.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Configures this builder to produce a reply to `original`.
    ///
    /// Sets the reply linkage to the original envelope's id and addresses the
    /// reply back at the original sender, so the reply can complete its
    /// journey to the waiting caller.
    pub fn in_reply_to(mut self, original: &Envelope) -> Self {
        self.reply_to = Some(original.id());
        self.recipients = original.sender().cloned().into_iter().collect();
        self
    }

    /// Builds the envelope around a concrete message value.
    pub fn build(self, payload: impl BrokerMessage) -> Envelope {
        self.build_payload(MessagePayload::new(payload))
    }

    /// Builds the envelope around an already type-erased payload.
    pub fn build_payload(self, payload: MessagePayload) -> Envelope {
        Envelope {
            id: EnvelopeId::fresh(),
            content: payload,
            sender: self.sender,
            recipients: self.recipients,
            reply_to: self.reply_to,
            one_way: self.one_way,
            timeout: self.timeout,
            bearer_token: self.bearer_token,
            sent_at: SystemTime::now(),
        }
    }
}
