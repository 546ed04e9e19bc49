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

//! The connection factory (§4.2): resolves `ConnectParams` to a live
//! [`crate::bmc::GenericBmc`] handle, classifying the manufacturer along
//! the way. Issues no hardware-mutating call.

use crate::backend::Backend;
use crate::context::Context;
use crate::error::Error;
use crate::error::Result;
use crate::vendor::Manufacturer;
use std::ops::Deref;
use std::time::Duration;

/// Connect-phase timeout defaults (§5): both the TCP connect and the
/// per-request budget start at 30s, tightened per call by
/// [`Context::narrowed`].
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Redfish,
    RedfishLocal,
    RedfishKube,
}

impl Protocol {
    #[must_use]
    pub const fn is_https(self, insecure: bool) -> bool {
        !insecure
    }
}

/// Inputs to [`connect`] (§4.2).
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub protocol: Protocol,
    pub insecure: bool,
}

impl ConnectParams {
    /// Composes the base URL: `https` by default, `http` only when
    /// `insecure` is set.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.insecure { "http" } else { "https" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.host),
            None => format!("{scheme}://{}", self.host),
        }
    }
}

/// Reads `/redfish/v1/Managers/<first>`, extracts `Manufacturer`, and
/// classifies the vendor overlay (§4.2). Does not mutate anything.
pub async fn classify_manufacturer(ctx: &Context, backend: &impl Backend) -> Result<Manufacturer> {
    let collection = backend
        .get(ctx, "/redfish/v1/Managers")
        .await
        .map_err(|err| Error::Transport(Box::new(err)))?;

    if !collection.is_success() {
        return Err(Error::from_status(collection.status, "fetching Managers collection"));
    }

    let first_uri = collection
        .body
        .get("Members")
        .and_then(serde_json::Value::as_array)
        .and_then(|members| members.first())
        .and_then(|member| member.get("@odata.id"))
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| Error::ProtocolViolation("Managers collection has no members".to_string()))?;

    let manager = backend
        .get(ctx, first_uri)
        .await
        .map_err(|err| Error::Transport(Box::new(err)))?;

    if manager.status == 401 || manager.status == 403 {
        return Err(Error::Auth { status: manager.status });
    }
    if !manager.is_success() {
        return Err(Error::from_status(manager.status, "fetching first Manager"));
    }

    let manufacturer = manager
        .body
        .get("Manufacturer")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();

    Ok(Manufacturer::from_manager_string(manufacturer))
}

/// A connected BMC: [`crate::bmc::GenericBmc`] plus the manufacturer tag
/// resolved for it at connect time (§4.2). `Deref`s to the underlying
/// `GenericBmc` so callers use [`crate::capability::BmcCapability`]
/// methods directly through the handle.
pub struct BmcHandle<B: Backend> {
    bmc: crate::bmc::GenericBmc<B>,
    manufacturer: Manufacturer,
}

impl<B: Backend> BmcHandle<B> {
    #[must_use]
    pub const fn manufacturer(&self) -> Manufacturer {
        self.manufacturer
    }
}

impl<B: Backend> Deref for BmcHandle<B> {
    type Target = crate::bmc::GenericBmc<B>;

    fn deref(&self) -> &Self::Target {
        &self.bmc
    }
}

/// Resolves `params` into a live [`BmcHandle`] (§4.2): builds the HTTP
/// transport, classifies the manufacturer via `Managers/<first>`, and
/// composes the matching vendor overlay. Issues no `PATCH`/`POST`.
///
/// `redfish-kube` behaves identically to `redfish` except that `insecure`
/// is forced on, matching the cluster-internal proxy case this crate does
/// not otherwise special-case (§4.2 supplement). `redfish-local` has no
/// network transport: it is a parsed protocol tag only, for configuration
/// round-tripping; a local/in-process BMC is built directly via
/// `GenericBmc::new` against a mock `Backend`, never through this
/// function.
#[cfg(feature = "reqwest")]
pub async fn connect(ctx: &Context, params: ConnectParams) -> Result<BmcHandle<crate::backend::reqwest_backend::ReqwestBackend>> {
    use crate::backend::reqwest_backend::ReqwestBackend;
    use bmc_fleet_http::reqwest::Client;
    use bmc_fleet_http::reqwest::ClientParams;
    use bmc_fleet_http::BmcCredentials;

    if params.protocol == Protocol::RedfishLocal {
        return Err(Error::Unsupported(
            "redfish-local has no network transport; construct GenericBmc::new with a mock Backend directly".to_string(),
        ));
    }
    let insecure = params.insecure || params.protocol == Protocol::RedfishKube;

    let client_params = ClientParams::new()
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .accept_invalid_certs(insecure);
    let client = Client::with_params(client_params).map_err(|err| Error::Transport(Box::new(err)))?;

    let base_url = url::Url::parse(&ConnectParams { insecure, ..params.clone() }.base_url())
        .map_err(|err| Error::ProtocolViolation(format!("invalid host {:?}: {err}", params.host)))?;
    let credentials = BmcCredentials::new(params.username.clone(), params.password.clone());
    let backend = ReqwestBackend::new(client, base_url, credentials);

    let manufacturer = classify_manufacturer(ctx, &backend).await?;
    Ok(BmcHandle {
        bmc: crate::bmc::GenericBmc::new(backend, manufacturer),
        manufacturer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_http_only_when_insecure() {
        let params = ConnectParams {
            host: "10.0.0.5".to_string(),
            port: None,
            username: "root".to_string(),
            password: "x".to_string(),
            protocol: Protocol::Redfish,
            insecure: false,
        };
        assert_eq!(params.base_url(), "https://10.0.0.5");
        let insecure = ConnectParams { insecure: true, ..params };
        assert_eq!(insecure.base_url(), "http://10.0.0.5");
    }
}
