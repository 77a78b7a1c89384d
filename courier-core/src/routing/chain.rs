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

use std::cmp::Reverse;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{instrument, trace};

use crate::common::DispatchContext;
use crate::message::{DispatchError, Envelope};
use crate::routing::{RouteInstruction, Router};

/// The ordered, priority-sorted list of routers evaluated for each envelope.
///
/// Routers are sorted once at assembly: descending priority, stable within
/// ties so registration order decides. The in-process fallback router is
/// always last and never forwards, making the loop total.
#[derive(Debug, Clone)]
pub struct RouterChain {
    routers: Arc<Vec<Arc<dyn Router>>>,
}

impl RouterChain {
    pub(crate) fn new(mut registered: Vec<Arc<dyn Router>>, fallback: Arc<dyn Router>) -> Self {
        registered.sort_by_key(|router| Reverse(router.priority()));
        registered.push(fallback);
        RouterChain {
            routers: Arc::new(registered),
        }
    }

    /// The router names in evaluation order, for diagnostics.
    pub fn route_order(&self) -> Vec<&str> {
        self.routers.iter().map(|router| router.name()).collect()
    }

    /// Walks the chain until a router returns something other than
    /// `Forward`, bubbling that result back unchanged.
    #[instrument(skip(self, ctx, cancel), fields(envelope_id = %envelope.id()))]
    pub(crate) async fn evaluate(
        &self,
        envelope: &Envelope,
        ctx: &DispatchContext,
        cancel: &CancellationToken,
    ) -> Result<RouteInstruction, DispatchError> {
        for router in self.routers.iter() {
            match router.route(envelope, ctx, cancel).await? {
                RouteInstruction::Forward => {
                    trace!(router = router.name(), "router forwarded");
                    continue;
                }
                instruction => {
                    trace!(router = router.name(), ?instruction, "router intercepted");
                    return Ok(instruction);
                }
            }
        }
        // The fallback router is terminal; reaching this point means the
        // chain was assembled without one.
        Err(DispatchError::routing(format!(
            "no router accepted envelope {}",
            envelope.id()
        )))
    }
}
