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
pub use broker::MessageBroker;
pub use broker_builder::BrokerBuilder;
pub use config::{BrokerConfig, DefaultsConfig, TimeoutConfig, CONFIG};
pub use context::DispatchContext;
pub(crate) use pending::PendingCalls;
pub use types::{DispatchResult, MessagePayload};

mod broker;
mod broker_builder;
mod config;
mod context;
mod pending;
mod types;
