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

use crate::common::{DispatchContext, DispatchResult, MessagePayload};

/// Contract of the in-process handler-dispatch pipeline.
///
/// Given a deserialized logical message, returns its response (or `None` for
/// handlers that produce no reply) or fails. How handlers are looked up for a
/// given message type is the collaborator's concern; the broker never knows.
#[async_trait]
pub trait HandlerPipeline: Debug + Send + Sync {
    /// Processes one logical message and produces its reply.
    async fn process(
        &self,
        message: MessagePayload,
        ctx: &DispatchContext,
        cancel: &CancellationToken,
    ) -> DispatchResult;
}
