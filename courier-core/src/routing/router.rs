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

use std::fmt::Debug;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::common::DispatchContext;
use crate::message::{DispatchError, Envelope};
use crate::routing::RouteInstruction;

/// A chain-of-responsibility node that decides, for one envelope, whether to
/// deliver it locally, forward it, or return a reply.
///
/// A router's applicability is static: it is configured once and consulted
/// for every envelope in priority order. Transport-specific routers implement
/// this contract outside the core; the core contributes only the in-process
/// fallback.
#[async_trait]
pub trait Router: Debug + Send + Sync {
    /// A short name used in routing diagnostics.
    fn name(&self) -> &str;

    /// The router's position in the chain. Higher-priority routers are tried
    /// first; ties are broken by registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Decides what to do with one envelope.
    async fn route(
        &self,
        envelope: &Envelope,
        ctx: &DispatchContext,
        cancel: &CancellationToken,
    ) -> Result<RouteInstruction, DispatchError>;
}
