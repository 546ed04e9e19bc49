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

//! [`Backend`] implemented against [`bmc_fleet_http::reqwest::Client`].
//!
//! This bypasses `HttpClient`'s deserialize-on-success shape entirely and
//! goes through [`bmc_fleet_http::reqwest::Client::inner`], because vendor
//! overlays need the status code and individual response headers that
//! `HttpClient` discards.

use crate::backend::Backend;
use crate::backend::HttpResponse;
use crate::backend::TransportError;
use crate::context::Context;
use bmc_fleet_http::reqwest::Client;
use bmc_fleet_http::BmcCredentials;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

pub struct ReqwestBackend {
    client: Client,
    base_url: Url,
    credentials: BmcCredentials,
}

impl ReqwestBackend {
    #[must_use]
    pub const fn new(client: Client, base_url: Url, credentials: BmcCredentials) -> Self {
        Self {
            client,
            base_url,
            credentials,
        }
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| TransportError(format!("invalid path {path}: {err}")))
    }

    async fn send(
        &self,
        ctx: &Context,
        method: Method,
        path: &str,
        body: Option<Value>,
        if_match: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.url(path)?;
        let mut request = self
            .client
            .inner()
            .request(method, url)
            .basic_auth(&self.credentials.username, Some(self.credentials.password()));

        if let Some(etag) = if_match {
            request = request.header(reqwest::header::IF_MATCH, etag);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = ctx
            .run(request.send())
            .await
            .map_err(|expired| TransportError(expired.to_string()))?
            .map_err(|err| TransportError(err.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect::<HashMap<_, _>>();

        let bytes = ctx
            .run(response.bytes())
            .await
            .map_err(|expired| TransportError(expired.to_string()))?
            .map_err(|err| TransportError(err.to_string()))?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        Ok(HttpResponse { status, headers, body })
    }
}

impl Backend for ReqwestBackend {
    async fn get(&self, ctx: &Context, path: &str) -> Result<HttpResponse, TransportError> {
        self.send(ctx, Method::GET, path, None, None).await
    }

    async fn patch(
        &self,
        ctx: &Context,
        path: &str,
        body: Value,
        if_match: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        self.send(ctx, Method::PATCH, path, Some(body), if_match).await
    }

    async fn post(&self, ctx: &Context, path: &str, body: Value) -> Result<HttpResponse, TransportError> {
        self.send(ctx, Method::POST, path, Some(body), None).await
    }

    async fn delete(&self, ctx: &Context, path: &str) -> Result<HttpResponse, TransportError> {
        self.send(ctx, Method::DELETE, path, None, None).await
    }

    async fn request(
        &self,
        ctx: &Context,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> Result<HttpResponse, TransportError> {
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|err| TransportError(format!("invalid HTTP method {method}: {err}")))?;
        self.send(ctx, method, path, body, None).await
    }
}
