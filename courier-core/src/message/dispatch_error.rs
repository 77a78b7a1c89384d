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

use std::fmt;

/// Represents errors that can occur while dispatching an envelope.
///
/// Only `HandlerFault` and `IdentityRejected` originate on the local
/// processing path and are surfaced to the original caller; routing faults
/// for forwarded traffic are logged and absorbed. `Timeout` and `Cancelled`
/// are distinct so callers can tell "we gave up" from "it failed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The handler pipeline (or a behavior wrapping it) raised an error while
    /// producing the local reply.
    HandlerFault(String),
    /// The identity-resolution collaborator rejected the envelope's bearer token.
    IdentityRejected(String),
    /// An error occurred while forwarding an envelope towards a remote endpoint.
    RoutingFault(String),
    /// No reply arrived within the effective timeout window.
    Timeout,
    /// The caller's cancellation signal fired before a reply arrived.
    Cancelled,
    /// The pending-call result slot was dropped before it was fulfilled.
    ChannelClosed(String),
}

impl DispatchError {
    /// Wraps an arbitrary handler-side failure into a `HandlerFault`.
    pub fn handler(err: impl fmt::Display) -> Self {
        DispatchError::HandlerFault(err.to_string())
    }

    /// Wraps an arbitrary forwarding failure into a `RoutingFault`.
    pub fn routing(err: impl fmt::Display) -> Self {
        DispatchError::RoutingFault(err.to_string())
    }

    /// Returns `true` if this error is the timeout outcome.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DispatchError::Timeout)
    }

    /// Returns `true` if this error is the cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Cancelled)
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::HandlerFault(msg) => write!(f, "handler fault: {}", msg),
            DispatchError::IdentityRejected(msg) => write!(f, "identity rejected: {}", msg),
            DispatchError::RoutingFault(msg) => write!(f, "routing fault: {}", msg),
            DispatchError::Timeout => write!(f, "dispatch timed out before a reply arrived"),
            DispatchError::Cancelled => write!(f, "dispatch was cancelled by the caller"),
            DispatchError::ChannelClosed(msg) => write!(f, "pending call slot closed: {}", msg),
        }
    }
}

impl std::error::Error for DispatchError {}
