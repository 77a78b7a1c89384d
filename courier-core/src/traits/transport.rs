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

use crate::message::Envelope;

/// Contract of the outbound transport stage that carries envelopes across a
/// process boundary.
///
/// Serialization lives behind this seam; the core never sees wire bytes.
/// Forwarding is fire-and-forget from the broker's perspective: failures are
/// logged, never surfaced to the dispatching caller, and the corresponding
/// pending call simply ages out.
#[async_trait]
pub trait OutboundTransport: Debug + Send + Sync {
    /// Hands one envelope to the transport for cross-process delivery.
    async fn forward(&self, envelope: Envelope, cancel: &CancellationToken)
        -> anyhow::Result<()>;
}
