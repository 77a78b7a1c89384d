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

//! Shared payload and result types used throughout `courier-core`.

use std::any::Any;
use std::sync::Arc;

use crate::message::DispatchError;
use crate::traits::BrokerMessage;

/// The type-erased logical message carried inside an [`Envelope`](crate::message::Envelope).
///
/// Wraps the shared message behind accessors so downcasts and name lookups
/// always reach the erased message itself, never the pointer around it.
/// Cloning is cheap and shares the underlying message.
#[derive(Debug, Clone)]
pub struct MessagePayload(Arc<dyn BrokerMessage + Send + Sync>);

impl MessagePayload {
    /// Erases a concrete message value.
    pub fn new(message: impl BrokerMessage) -> Self {
        MessagePayload(Arc::new(message))
    }

    /// The message as [`Any`], for downcasting.
    pub fn as_any(&self) -> &dyn Any {
        self.0.as_ref().as_any()
    }

    /// Borrows the erased message.
    pub fn as_message(&self) -> &dyn BrokerMessage {
        self.0.as_ref()
    }

    /// The declared message name, as seen by name-based behavior filters.
    pub fn name(&self) -> &'static str {
        self.0.as_ref().name()
    }

    /// Downcasts to the concrete message type.
    pub fn downcast_ref<M: BrokerMessage>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }
}

/// The outcome of one dispatch: a reply payload (or `None` for one-way and
/// reply-less handlers), or the fault/timeout/cancellation that ended it.
pub type DispatchResult = Result<Option<MessagePayload>, DispatchError>;
