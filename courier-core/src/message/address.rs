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
use std::sync::Arc;

/// Represents the addressable endpoint of a dispatch participant.
///
/// The shape of the address string is transport-defined; the broker only
/// compares addresses for equality when deciding whether an envelope is
/// destined for the local endpoint. Cloning is cheap (`Arc<str>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointAddress(Arc<str>);

impl EndpointAddress {
    /// Creates a new endpoint address from any string-like value.
    pub fn new(address: impl Into<Arc<str>>) -> Self {
        EndpointAddress(address.into())
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EndpointAddress {
    fn from(address: &str) -> Self {
        EndpointAddress::new(address)
    }
}

impl From<String> for EndpointAddress {
    fn from(address: String) -> Self {
        EndpointAddress::new(address)
    }
}
