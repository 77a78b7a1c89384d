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
#![allow(unused)]

/// Echo request answered by the test handler pipeline.
#[derive(Clone, Debug)]
pub struct EchoRequest {
    pub text: String,
}

/// The echo handler's reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EchoResponse {
    pub text: String,
}

/// One-way chore whose handler sleeps far longer than any dispatch should.
#[derive(Clone, Debug)]
pub struct SlowChore {
    pub delay_ms: u64,
}

/// Fire-and-forget notification; its handler produces no reply.
#[derive(Clone, Debug)]
pub struct Nudge;

/// Request answered with the dispatch's resolved identity subject.
#[derive(Clone, Debug)]
pub struct WhoAmI;

/// Request whose handler always faults.
#[derive(Clone, Debug)]
pub struct Broken;
