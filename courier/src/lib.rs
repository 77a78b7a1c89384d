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
#![forbid(missing_docs)]

//! # Courier
//!
//! This crate provides the public surface of the Courier message broker: a
//! routing engine that dispatches envelope-wrapped messages (commands,
//! events, replies) either to an in-process handler pipeline or onward
//! through a chain of routers toward remote endpoints, correlates
//! asynchronous replies with their originating requests, and enforces
//! per-dispatch timeouts.
//!
//! ## Key Concepts
//!
//! - **Envelope**: the brokered-message value object carrying a logical
//!   payload plus routing metadata, built through `EnvelopeBuilder`.
//! - **Broker (`MessageBroker`)**: the façade that starts dispatch, owns the
//!   pending-call table, enforces timeouts, and exposes the
//!   `reply_received` notification entry point.
//! - **Router chain**: an ordered, priority-sorted set of routers; each
//!   router delivers locally, forwards, or short-circuits a reply. The
//!   in-process fallback router is always last.
//! - **Behaviors**: interceptors wrapping handler execution with
//!   before/after hooks in onion order.
//! - **Collaborators**: the handler pipeline, identity resolver, and
//!   outbound transport are narrow traits implemented outside the core.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! let broker = MessageBroker::builder()
//!     .with_handler_pipeline(my_handlers)
//!     .build()?;
//!
//! let envelope = broker.envelope_builder().build(MyCommand::default());
//! let ctx = DispatchContext::for_envelope(&envelope);
//! let reply = broker.dispatch(envelope, &ctx, CancellationToken::new()).await?;
//! ```

/// A prelude module for conveniently importing the most commonly used items.
///
/// Re-exports the Courier core prelude: the broker façade and builder, the
/// envelope model, routing and behavior contracts, the collaborator traits,
/// and the `async_trait`/`CancellationToken` items they are written against.
pub mod prelude {
    pub use courier_core::prelude::*;
}
