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

use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::common::DispatchResult;
use crate::message::EnvelopeId;

/// The table of outstanding request/reply dispatches, keyed by the
/// dispatched envelope's id.
///
/// Completion is a single atomic remove-then-send: whichever of reply,
/// timeout, or cancellation removes the entry first owns the result slot,
/// and every later attempt finds nothing to complete. That removal is the
/// at-most-once "try-complete" primitive; no flags, no second lock.
#[derive(Debug, Clone, Default)]
pub(crate) struct PendingCalls {
    table: Arc<DashMap<EnvelopeId, oneshot::Sender<DispatchResult>>>,
}

impl PendingCalls {
    /// Registers a pending call and returns the receiver half of its
    /// single-assignment result slot.
    pub(crate) fn register(&self, id: EnvelopeId) -> oneshot::Receiver<DispatchResult> {
        let (slot, waiter) = oneshot::channel();
        self.table.insert(id, slot);
        waiter
    }

    /// Fulfills the pending call with `outcome`, removing it from the table.
    ///
    /// Returns `false` when no call is registered under `id` (late reply,
    /// already timed out, or unknown) or when the waiter has already gone
    /// away; both are no-ops for the caller.
    pub(crate) fn complete(&self, id: EnvelopeId, outcome: DispatchResult) -> bool {
        match self.table.remove(&id) {
            Some((_, slot)) => slot.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Removes the pending call without fulfilling it, for the timeout and
    /// cancellation paths that report their outcome directly to the waiter.
    ///
    /// Returns `false` when a concurrent completion already claimed the
    /// entry, in which case the result slot is about to hold a real reply.
    pub(crate) fn abandon(&self, id: EnvelopeId) -> bool {
        self.table.remove(&id).is_some()
    }

    /// The number of dispatches currently awaiting a reply.
    pub(crate) fn outstanding(&self) -> usize {
        self.table.len()
    }
}
