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

use crate::common::MessagePayload;

/// The instruction a router returns for one envelope.
///
/// `Delivered` and `Reply` are terminal: they produce a value immediately.
/// `Forward` hands the envelope to the next-lower-priority router. `Pending`
/// means the envelope was handed off for cross-process delivery and the
/// caller is relying on an eventual reply-received notification.
#[derive(Debug, Clone)]
pub enum RouteInstruction {
    /// The router resolved the envelope locally and attached its reply
    /// (`None` for one-way and reply-less handlers).
    Delivered(Option<MessagePayload>),
    /// The router did not intercept; consult the next router in the chain.
    Forward,
    /// The envelope is itself a reply; its content short-circuits back to
    /// the waiting caller without further routing.
    Reply(MessagePayload),
    /// Handed off to the outbound transport; no local reply synthesized.
    Pending,
}
