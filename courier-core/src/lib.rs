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

#![forbid(unsafe_code)]
//! Courier Core Library
//!
//! This library provides the core functionality for the Courier message broker:
//! the envelope model, the router chain, the behavior pipeline, the pending-call
//! table, and the broker façade that ties them together.

/// Behavior pipeline wrapping handler execution with before/after hooks.
pub(crate) mod behavior;

/// Broker façade, pending-call table, configuration, and shared types.
pub(crate) mod common;

/// Envelope model, builder, addressing, and dispatch errors.
pub(crate) mod message;

/// Router contract, router chain, and the in-process fallback router.
pub(crate) mod routing;

/// Trait definitions for the broker's external collaborators.
pub(crate) mod traits;

/// Prelude module for convenient imports.
///
/// This module re-exports commonly used items from the `common`, `message`,
/// `routing`, `behavior`, and `traits` modules, as well as the `async_trait`
/// macro and the `CancellationToken` threaded through every dispatch.
pub mod prelude {
    pub use async_trait::async_trait;
    pub use tokio_util::sync::CancellationToken;

    pub use crate::behavior::{Behavior, BehaviorFilter, BehaviorPipeline};
    pub use crate::common::{
        BrokerBuilder, BrokerConfig, DispatchContext, DispatchResult, MessageBroker,
        MessagePayload, CONFIG,
    };
    pub use crate::message::{
        DispatchError, EndpointAddress, Envelope, EnvelopeBuilder, EnvelopeId,
    };
    pub use crate::routing::{ProcessRouter, RouteInstruction, Router, RouterChain};
    pub use crate::traits::{
        AnonymousIdentity, BrokerMessage, HandlerPipeline, Identity, IdentityResolver,
        OutboundTransport,
    };
}
