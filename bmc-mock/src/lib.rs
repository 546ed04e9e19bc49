// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An in-process, multi-tenant Redfish mock for `bmc-fleet` (§4.7).
//!
//! Two distinct ways to drive it, for two distinct kinds of test:
//!
//! - [`MockBackend`] implements [`bmc_fleet::Backend`] directly, so it can
//!   sit behind `GenericBmc<MockBackend>` exactly as `ReqwestBackend` would.
//!   Power transitions and firmware upgrades run through real, stateful
//!   background tasks, making it suitable for exercising the fleet crate's
//!   own retry, ledger, and vendor-overlay logic end to end.
//! - [`http::router`] is a standalone `axum` service implementing the
//!   literal wire protocol described in §4.7 (plain GET/PATCH/fixed-201
//!   POST) for assertions about what a real HTTP client would observe on
//!   the wire. It is not meant to be reached through `connect()`.
//!
//! Both sit on top of the same [`MockTree`] of bundled fixtures.

pub mod backend;
pub mod config;
pub mod http;
pub mod session;
pub mod tree;

#[doc(inline)]
pub use backend::MockBackend;
#[doc(inline)]
pub use config::MockConfig;
#[doc(inline)]
pub use http::router;
#[doc(inline)]
pub use http::MockState;
#[doc(inline)]
pub use session::MockSession;
#[doc(inline)]
pub use session::SessionTable;
#[doc(inline)]
pub use tree::MockTree;
