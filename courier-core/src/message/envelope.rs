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

use std::fmt;
use std::time::{Duration, SystemTime};

use static_assertions::assert_impl_all;
use uuid::Uuid;

use crate::common::MessagePayload;
use crate::message::EndpointAddress;

/// Globally unique identifier of an [`Envelope`], used as the correlation id
/// when joining a reply with its originating request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvelopeId(Uuid);

impl EnvelopeId {
    /// Allocates a fresh, collision-free identifier.
    pub(crate) fn fresh() -> Self {
        EnvelopeId(Uuid::new_v4())
    }
}

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Represents one unit of routed traffic: a logical message payload plus the
/// routing metadata the broker needs to move it.
///
/// An envelope is immutable once built; every field is reached through a
/// getter and the builder is the only way to construct one. An envelope whose
/// [`reply_to`](Envelope::reply_to) is set is itself a reply and is never
/// treated as awaiting a further reply.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub(crate) id: EnvelopeId,
    pub(crate) content: MessagePayload,
    pub(crate) sender: Option<EndpointAddress>,
    pub(crate) recipients: Vec<EndpointAddress>,
    pub(crate) reply_to: Option<EnvelopeId>,
    pub(crate) one_way: bool,
    pub(crate) timeout: Option<Duration>,
    pub(crate) bearer_token: Option<String>,
    pub(crate) sent_at: SystemTime,
}

impl Envelope {
    /// The envelope's unique identifier, assigned at creation.
    pub fn id(&self) -> EnvelopeId {
        self.id
    }

    /// The logical message payload. Opaque to the broker.
    pub fn content(&self) -> &MessagePayload {
        &self.content
    }

    /// The sending endpoint, when the transport attached one.
    pub fn sender(&self) -> Option<&EndpointAddress> {
        self.sender.as_ref()
    }

    /// The endpoints this envelope is addressed to. An empty list means the
    /// local endpoint.
    pub fn recipients(&self) -> &[EndpointAddress] {
        &self.recipients
    }

    /// The identifier of the envelope this one answers, if any.
    pub fn reply_to(&self) -> Option<EnvelopeId> {
        self.reply_to
    }

    /// Returns `true` when this envelope is itself a reply.
    pub fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }

    /// Returns `true` when no reply is expected and the caller does not block.
    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    /// The per-envelope timeout override. `None` means "use the broker
    /// default"; a zero duration means "no timeout".
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The opaque bearer token forwarded to the identity-resolution collaborator.
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// The time at which the envelope was built.
    pub fn sent_at(&self) -> SystemTime {
        self.sent_at
    }

    /// Resolves the effective timeout window for this envelope against the
    /// broker-wide default.
    ///
    /// Returns `None` when the dispatch should wait indefinitely (a zero
    /// envelope timeout, or an unset envelope timeout with a zero default).
    pub fn effective_timeout(&self, default: Duration) -> Option<Duration> {
        match self.timeout {
            Some(window) if window.is_zero() => None,
            Some(window) => Some(window),
            None if default.is_zero() => None,
            None => Some(default),
        }
    }
}

// Ensures that Envelope can cross task boundaries.
assert_impl_all!(Envelope: Send);
