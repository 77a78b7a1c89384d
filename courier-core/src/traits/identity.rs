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

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::common::DispatchContext;
use crate::message::DispatchError;

/// The identity attached to a dispatch after bearer-token resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// The resolved subject name.
    pub subject: String,
    /// Opaque claims attached by the resolver.
    pub claims: HashMap<String, String>,
}

impl Identity {
    /// Creates an identity with the given subject and no claims.
    pub fn new(subject: impl Into<String>) -> Self {
        Identity { subject: subject.into(), claims: HashMap::new() }
    }

    /// The identity used for envelopes that carry no bearer token.
    pub fn anonymous() -> Self {
        Identity::new("anonymous")
    }
}

/// Contract of the identity-resolution collaborator.
///
/// Consulted once per inbound envelope, before handler dispatch. A failure
/// here propagates to the original caller as a fault reply.
#[async_trait]
pub trait IdentityResolver: Debug + Send + Sync {
    /// Resolves an opaque bearer token into an [`Identity`].
    async fn resolve_identity(
        &self,
        bearer_token: &str,
        ctx: &DispatchContext,
        cancel: &CancellationToken,
    ) -> Result<Identity, DispatchError>;
}

/// Permissive resolver for brokers with no security attachment: every token
/// (and every missing token) maps to the anonymous identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentity;

#[async_trait]
impl IdentityResolver for AnonymousIdentity {
    async fn resolve_identity(
        &self,
        _bearer_token: &str,
        _ctx: &DispatchContext,
        _cancel: &CancellationToken,
    ) -> Result<Identity, DispatchError> {
        Ok(Identity::anonymous())
    }
}
