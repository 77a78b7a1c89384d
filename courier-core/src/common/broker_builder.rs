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

use anyhow::Context;

use crate::behavior::{Behavior, BehaviorPipeline};
use crate::common::{BrokerConfig, MessageBroker, PendingCalls, CONFIG};
use crate::message::EndpointAddress;
use crate::routing::{ProcessRouter, Router, RouterChain};
use crate::traits::{AnonymousIdentity, HandlerPipeline, IdentityResolver, OutboundTransport};

/// Assembles a [`MessageBroker`] from its registered collaborators.
///
/// Routers and behaviors are enumerated in registration order; the chain
/// sorts routers by descending priority (stable, so registration order
/// breaks ties) and always places the in-process fallback router last.
#[derive(Debug, Default)]
pub struct BrokerBuilder {
    routers: Vec<Arc<dyn Router>>,
    behaviors: Vec<Arc<dyn Behavior>>,
    handlers: Option<Arc<dyn HandlerPipeline>>,
    identity: Option<Arc<dyn IdentityResolver>>,
    outbound: Option<Arc<dyn OutboundTransport>>,
    local_endpoint: Option<EndpointAddress>,
    config: Option<BrokerConfig>,
}

impl BrokerBuilder {
    /// Registers a router ahead of the in-process fallback.
    pub fn register_router(mut self, router: Arc<dyn Router>) -> Self {
        self.routers.push(router);
        self
    }

    /// Registers a behavior wrapping in-process handler execution.
    pub fn register_behavior(mut self, behavior: Arc<dyn Behavior>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Sets the handler-dispatch pipeline consulted for local deliveries.
    /// Required.
    pub fn with_handler_pipeline(mut self, handlers: Arc<dyn HandlerPipeline>) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Sets the identity-resolution collaborator. Defaults to
    /// [`AnonymousIdentity`].
    pub fn with_identity_resolver(mut self, identity: Arc<dyn IdentityResolver>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Sets the outbound transport used for envelopes addressed to remote
    /// endpoints. Without one, outbound envelopes are logged and age out.
    pub fn with_outbound_transport(mut self, outbound: Arc<dyn OutboundTransport>) -> Self {
        self.outbound = Some(outbound);
        self
    }

    /// Overrides the local endpoint address. Defaults to the configured
    /// `defaults.local_endpoint`.
    pub fn with_local_endpoint(mut self, endpoint: impl Into<EndpointAddress>) -> Self {
        self.local_endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the configuration. Defaults to the global [`CONFIG`].
    pub fn with_config(mut self, config: BrokerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the broker, wiring the behavior pipeline and the fallback
    /// process router into the chain.
    pub fn build(self) -> anyhow::Result<MessageBroker> {
        let handlers = self
            .handlers
            .context("a handler pipeline is required to build a MessageBroker")?;
        let config = self.config.unwrap_or_else(|| CONFIG.clone());
        let local_endpoint = self
            .local_endpoint
            .unwrap_or_else(|| EndpointAddress::new(config.defaults.local_endpoint.clone()));
        let identity = self
            .identity
            .unwrap_or_else(|| Arc::new(AnonymousIdentity));
        let behaviors = Arc::new(BehaviorPipeline::new(self.behaviors));
        let fallback = Arc::new(ProcessRouter::new(
            local_endpoint,
            handlers,
            identity,
            behaviors,
            self.outbound,
        ));
        let chain = RouterChain::new(self.routers, fallback);

        Ok(MessageBroker {
            chain,
            pending: PendingCalls::default(),
            config: Arc::new(config),
        })
    }
}
