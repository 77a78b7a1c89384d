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

use std::any::TypeId;
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::common::{DispatchContext, DispatchResult, MessagePayload};
use crate::message::DispatchError;
use crate::traits::BrokerMessage;

/// Selects the messages a [`Behavior`] applies to.
///
/// Applicability is determined by static attributes of the message type, not
/// per-instance state, which is what makes the per-type memoization in the
/// pipeline sound. `Matching` is the open-ended variant for callers that
/// want to select whole families of messages (the type-hierarchy filter of
/// inheritance-based frameworks).
#[derive(Clone)]
pub enum BehaviorFilter {
    /// Applies to every message.
    Any,
    /// Applies to exactly one concrete message type.
    MessageType(TypeId),
    /// Applies to messages whose declared name matches.
    MessageName(String),
    /// Applies to messages accepted by the predicate.
    Matching(Arc<dyn Fn(&dyn BrokerMessage) -> bool + Send + Sync>),
}

impl BehaviorFilter {
    /// Filter for exactly the concrete message type `M`.
    pub fn exact<M: BrokerMessage>() -> Self {
        BehaviorFilter::MessageType(TypeId::of::<M>())
    }

    /// Filter by declared message name.
    pub fn named(name: impl Into<String>) -> Self {
        BehaviorFilter::MessageName(name.into())
    }

    /// Filter by an arbitrary predicate over the message.
    pub fn matching(
        predicate: impl Fn(&dyn BrokerMessage) -> bool + Send + Sync + 'static,
    ) -> Self {
        BehaviorFilter::Matching(Arc::new(predicate))
    }

    pub(crate) fn matches(&self, message: &dyn BrokerMessage) -> bool {
        match self {
            BehaviorFilter::Any => true,
            BehaviorFilter::MessageType(type_id) => message.as_any().type_id() == *type_id,
            BehaviorFilter::MessageName(name) => message.name() == name.as_str(),
            BehaviorFilter::Matching(predicate) => predicate(message),
        }
    }
}

impl Debug for BehaviorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorFilter::Any => write!(f, "Any"),
            BehaviorFilter::MessageType(type_id) => write!(f, "MessageType({:?})", type_id),
            BehaviorFilter::MessageName(name) => write!(f, "MessageName({:?})", name),
            BehaviorFilter::Matching(_) => write!(f, "Matching(..)"),
        }
    }
}

/// A registered interceptor wrapping in-process handler execution.
///
/// Behaviors form two ordered passes around the handler: ascending priority
/// for `before_process`, descending for `after_process`, so the
/// highest-priority (lowest-numbered) behavior wraps all the others.
#[async_trait]
pub trait Behavior: Debug + Send + Sync {
    /// The behavior's position in the onion. Lower numbers wrap wider.
    fn priority(&self) -> i32 {
        0
    }

    /// The target-message filter. Defaults to every message.
    fn filter(&self) -> BehaviorFilter {
        BehaviorFilter::Any
    }

    /// Invoked before handler execution, in ascending priority order.
    ///
    /// Returning an error aborts the handler; the error becomes the
    /// dispatch's fault.
    async fn before_process(
        &self,
        _message: &MessagePayload,
        _ctx: &DispatchContext,
    ) -> Result<(), DispatchError> {
        Ok(())
    }

    /// Invoked after handler execution, in reverse order, with the handler's
    /// outcome. Also invoked on a fault, so behaviors whose `before_process`
    /// already ran always observe how the dispatch ended.
    async fn after_process(
        &self,
        _message: &MessagePayload,
        _outcome: &DispatchResult,
        _ctx: &DispatchContext,
    ) {
    }
}
