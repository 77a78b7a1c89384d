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

use crate::message::{Envelope, EnvelopeId};
use crate::traits::Identity;

/// Per-dispatch metadata threaded through routers, behaviors, and the
/// handler pipeline.
///
/// The attribute map is shared across clones of the same context, so a
/// behavior's `before_process` can leave a note for its `after_process`.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    correlation: Option<EnvelopeId>,
    identity: Option<Identity>,
    attributes: Arc<DashMap<String, String>>,
}

impl DispatchContext {
    /// Creates a context bound to the given envelope's identity.
    pub fn for_envelope(envelope: &Envelope) -> Self {
        DispatchContext {
            correlation: Some(envelope.id()),
            identity: None,
            attributes: Arc::new(DashMap::new()),
        }
    }

    /// The id of the envelope this dispatch originated from, when known.
    pub fn correlation(&self) -> Option<EnvelopeId> {
        self.correlation
    }

    /// The resolved identity, present once the process router has consulted
    /// the identity-resolution collaborator.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns a copy of this context carrying the resolved identity.
    pub(crate) fn with_identity(&self, identity: Identity) -> Self {
        let mut enriched = self.clone();
        enriched.identity = Some(identity);
        enriched
    }

    /// Stores a string attribute visible to every stage of this dispatch.
    pub fn set_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Reads back an attribute set earlier in the dispatch.
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes.get(key).map(|entry| entry.value().clone())
    }
}
