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
use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::behavior::Behavior;
use crate::common::{DispatchContext, DispatchResult, MessagePayload};
use crate::message::DispatchError;
use crate::traits::HandlerPipeline;

/// The two precomputed passes for one concrete message type: forward-sorted
/// for `before_process`, reverse-sorted for `after_process`.
#[derive(Debug)]
struct BehaviorPasses {
    forward: Vec<Arc<dyn Behavior>>,
    reverse: Vec<Arc<dyn Behavior>>,
}

/// The ordered set of interceptors invoked around in-process handler
/// execution.
///
/// The type-to-applicable-behaviors mapping is memoized per concrete message
/// type; applicability depends only on static attributes, so recomputing and
/// overwriting on a cache miss is harmless.
#[derive(Debug, Default)]
pub struct BehaviorPipeline {
    registered: Vec<Arc<dyn Behavior>>,
    cache: DashMap<TypeId, Arc<BehaviorPasses>>,
}

impl BehaviorPipeline {
    /// Creates a pipeline over the registered behaviors.
    pub fn new(registered: Vec<Arc<dyn Behavior>>) -> Self {
        BehaviorPipeline {
            registered,
            cache: DashMap::new(),
        }
    }

    /// Runs the full onion for one message: before passes, the handler,
    /// after passes.
    ///
    /// A `before_process` error aborts the handler and becomes the
    /// dispatch's fault; the behaviors whose `before_process` already ran
    /// are still notified through `after_process`, in reverse order, with
    /// that fault as the outcome.
    pub(crate) async fn execute(
        &self,
        handlers: &Arc<dyn HandlerPipeline>,
        payload: MessagePayload,
        ctx: &DispatchContext,
        cancel: &CancellationToken,
    ) -> DispatchResult {
        let passes = self.passes_for(&payload);

        let mut ran = 0usize;
        for behavior in passes.forward.iter() {
            if let Err(fault) = behavior.before_process(&payload, ctx).await {
                let outcome: DispatchResult = Err(fault);
                // Only the behaviors that already ran "before" are
                // candidates for after-notification.
                for notified in passes.forward[..ran].iter().rev() {
                    notified.after_process(&payload, &outcome, ctx).await;
                }
                return outcome;
            }
            ran += 1;
        }

        // Observe cancellation before the handler does any expensive work.
        let outcome = if cancel.is_cancelled() {
            Err(DispatchError::Cancelled)
        } else {
            handlers.process(payload.clone(), ctx, cancel).await
        };

        for behavior in passes.reverse.iter() {
            behavior.after_process(&payload, &outcome, ctx).await;
        }
        outcome
    }

    fn passes_for(&self, payload: &MessagePayload) -> Arc<BehaviorPasses> {
        let type_id = payload.as_any().type_id();
        if let Some(cached) = self.cache.get(&type_id) {
            return cached.clone();
        }

        let mut forward: Vec<Arc<dyn Behavior>> = self
            .registered
            .iter()
            .filter(|behavior| behavior.filter().matches(payload.as_message()))
            .cloned()
            .collect();
        // Stable: behaviors with equal priority keep registration order.
        forward.sort_by_key(|behavior| behavior.priority());
        let reverse: Vec<Arc<dyn Behavior>> = forward.iter().rev().cloned().collect();

        trace!(
            message = payload.name(),
            applicable = forward.len(),
            "memoizing behavior passes"
        );
        let passes = Arc::new(BehaviorPasses { forward, reverse });
        self.cache.insert(type_id, passes.clone());
        passes
    }
}
