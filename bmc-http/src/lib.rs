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

//! The HTTP client `bmc-fleet`'s `reqwest` backend is built on.
//!
//! This crate is deliberately narrow: it owns connection-level concerns
//! (TLS, timeouts, connection pooling, Basic-auth credentials) and leaves
//! everything Redfish-shaped — status codes, headers, JSON bodies, vendor
//! quirks — to `bmc_fleet::backend::reqwest_backend::ReqwestBackend`,
//! which drives this crate's [`reqwest::Client`] directly rather than
//! through a deserialize-on-success convenience trait.

pub mod credentials;

#[cfg(feature = "reqwest")]
pub mod reqwest;

#[doc(inline)]
pub use credentials::BmcCredentials;
