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

//! The raw HTTP seam vendor overlays and the generic base are built on.
//!
//! A deserialize-on-success client built for the happy path of
//! GET/PATCH-a-resource would not be enough here: vendor overlays need
//! the raw bytes, the status code, and sometimes individual response
//! headers (Dell's `Location` task-URI extraction, HPE's `TaskMonitor`
//! body field). [`Backend`] is the narrow trait that gives them that,
//! independent of which HTTP stack answers it.

use crate::context::Context;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;

#[cfg(feature = "reqwest")]
pub mod reqwest_backend;

/// A decoded HTTP response: status code, a lower-cased header map, and the
/// JSON body (or `Value::Null` for empty bodies).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Transport errors surfaced by a [`Backend`] implementation, independent
/// of response-status classification (which callers handle themselves via
/// [`HttpResponse::status`]).
#[derive(Debug, thiserror::Error)]
#[error("bmc transport error: {0}")]
pub struct TransportError(pub String);

/// The raw request surface a vendor overlay or the generic base issues
/// Redfish calls through. Implemented once per transport (reqwest today);
/// the mock flavor implements it directly against the in-process server.
pub trait Backend: Send + Sync {
    fn get(&self, ctx: &Context, path: &str) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    fn patch(
        &self,
        ctx: &Context,
        path: &str,
        body: Value,
        if_match: Option<&str>,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    fn post(
        &self,
        ctx: &Context,
        path: &str,
        body: Value,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    fn delete(&self, ctx: &Context, path: &str) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    /// Request a fresh resource-specific verb, used by the HTTP-subset
    /// attribute protocol (§4.4.2) where the verb itself is caller-chosen.
    fn request(
        &self,
        ctx: &Context,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
