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

//! The single [`BmcCapability`] implementation every connected handle uses
//! (§4.1, §4.3, §9): a generic base built directly on a [`Backend`], with
//! vendor quirks (§4.4) resolved once at construction and carried as the
//! [`Manufacturer`] tag plus an [`AnyUpgradeOverlay`] — one indirect call
//! per operation, never a chain of `is_dell()` branches.

use crate::backend::Backend;
use crate::capability::BmcCapability;
use crate::capability::VirtualMediaStatus;
use crate::context::Context;
use crate::error::AttributeCheckError;
use crate::error::Error;
use crate::error::Result;
use crate::model::account::Account;
use crate::model::account::AccountService;
use crate::model::attribute::ApplyTime;
use crate::model::attribute::Attribute;
use crate::model::attribute::AttributeRegistry;
use crate::model::attribute::AttributeValue;
use crate::model::attribute::SettingsAttributes;
use crate::model::boot::BootOverride;
use crate::model::boot::BootSourceOverrideEnabled;
use crate::model::boot::BootSourceOverrideMode;
use crate::model::boot::BootSourceOverrideTarget;
use crate::model::power::PowerState;
use crate::model::power::ResetType;
use crate::model::server::Manager;
use crate::model::server::Processor;
use crate::model::server::Server;
use crate::model::server::Storage;
use crate::model::task::Task;
use crate::settings::SettingsLedger;
use crate::upgrade;
use crate::upgrade::UpgradeOutcome;
use crate::upgrade::UpgradeParams;
use crate::vendor::dell;
use crate::vendor::http_subset;
use crate::vendor::supermicro;
use crate::vendor::AnyUpgradeOverlay;
use crate::vendor::Manufacturer;
use crate::vendor::UpgradeOverlay;
use serde_json::json;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default polling interval for [`BmcCapability::wait_for_server_power_state`]
/// (§5).
pub const POWER_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The vendor-neutral base, parameterized over whichever [`Backend`]
/// carries its HTTP traffic (`ReqwestBackend` for real BMCs, the mock's
/// own `Backend` impl for tests). Vendor quirks are resolved once, at
/// construction, via [`Manufacturer`] and [`AnyUpgradeOverlay`].
pub struct GenericBmc<B: Backend> {
    backend: B,
    manufacturer: Manufacturer,
    upgrade_overlay: AnyUpgradeOverlay,
    /// The crate's own belief about what is pending against this BMC's
    /// BIOS settings (§4.6): for a real BMC the ledger-of-record is the
    /// BMC itself, so this merely mirrors what the crate has staged.
    bios_ledger: Mutex<SettingsLedger>,
    bmc_ledger: Mutex<SettingsLedger>,
}

impl<B: Backend> GenericBmc<B> {
    #[must_use]
    pub fn new(backend: B, manufacturer: Manufacturer) -> Self {
        Self {
            backend,
            upgrade_overlay: AnyUpgradeOverlay::for_manufacturer(manufacturer),
            manufacturer,
            bios_ledger: Mutex::new(SettingsLedger::new()),
            bmc_ledger: Mutex::new(SettingsLedger::new()),
        }
    }

    #[must_use]
    pub const fn manufacturer(&self) -> Manufacturer {
        self.manufacturer
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    async fn get_json(&self, ctx: &Context, uri: &str) -> Result<Value> {
        let response = self
            .backend
            .get(ctx, uri)
            .await
            .map_err(|err| Error::Transport(Box::new(err)))?;
        if response.status == 401 || response.status == 403 {
            return Err(Error::Auth { status: response.status });
        }
        if !response.is_success() {
            return Err(Error::from_status(response.status, format!("GET {uri}")));
        }
        Ok(response.body)
    }

    async fn patch_json(&self, ctx: &Context, uri: &str, body: Value, if_match: Option<&str>) -> Result<Value> {
        let response = self
            .backend
            .patch(ctx, uri, body, if_match)
            .await
            .map_err(|err| Error::Transport(Box::new(err)))?;
        if response.status == 412 {
            return Err(Error::Precondition(uri.to_string()));
        }
        if !response.is_success() {
            return Err(Error::from_status(response.status, format!("PATCH {uri}")));
        }
        Ok(response.body)
    }

    async fn post_json(&self, ctx: &Context, uri: &str, body: Value) -> Result<Value> {
        let response = self
            .backend
            .post(ctx, uri, body)
            .await
            .map_err(|err| Error::Transport(Box::new(err)))?;
        if !response.is_success() {
            return Err(Error::from_status(response.status, format!("POST {uri}")));
        }
        Ok(response.body)
    }

    async fn fetch_server(&self, ctx: &Context, uri: &str) -> Result<Server> {
        let body = self.get_json(ctx, uri).await?;
        serde_json::from_value(body).map_err(|err| Error::ProtocolViolation(format!("malformed Server body: {err}")))
    }

    async fn reset_action(&self, ctx: &Context, uri: &str, reset_type: ResetType) -> Result<()> {
        let action_uri = format!("{uri}/Actions/ComputerSystem.Reset");
        self.post_json(ctx, &action_uri, json!({ "ResetType": reset_type }))
            .await?;
        // Any ResetType that settles on On is the Off->On gate event
        // Property 3 describes, whether the caller reached it via
        // power_on() or reset() directly.
        if reset_type.target_power_state() == Some(PowerState::On) {
            self.bios_ledger.lock().await.commit_pending();
        }
        Ok(())
    }

    /// Fetches a Redfish collection at `collection_uri` and deserializes
    /// every member (shared by `get_storages`/`get_processors`, and usable
    /// wherever else a flat `Members` collection needs decoding).
    async fn fetch_collection<T: serde::de::DeserializeOwned>(&self, ctx: &Context, collection_uri: &str) -> Result<Vec<T>> {
        let collection = self.get_json(ctx, collection_uri).await?;
        let uris: Vec<String> = collection
            .get("Members")
            .and_then(Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|m| m.get("@odata.id").and_then(Value::as_str).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut items = Vec::with_capacity(uris.len());
        for uri in uris {
            let body = self.get_json(ctx, &uri).await?;
            items.push(
                serde_json::from_value(body)
                    .map_err(|err| Error::ProtocolViolation(format!("malformed collection member at {uri}: {err}")))?,
            );
        }
        Ok(items)
    }

    /// The boot override the generic/Supermicro algorithms compute for a
    /// PXE-once request (§4.3, §4.4.4).
    async fn pxe_boot_override(&self, ctx: &Context, uri: &str) -> Result<BootOverride> {
        let server = self.fetch_server(ctx, uri).await?;
        let current_mode = server.boot.and_then(|boot| boot.mode);
        Ok(match self.manufacturer {
            Manufacturer::Supermicro => {
                supermicro::explicit_boot_override(BootSourceOverrideTarget::Pxe, current_mode.unwrap_or(BootSourceOverrideMode::Uefi))
            }
            _ => crate::vendor::generic::pxe_boot_once(current_mode),
        })
    }

    /// Fetches the merged BIOS or BMC attribute registry, dispatching the
    /// Dell multi-collection merge (§4.4.1) where it applies. HPE/Lenovo
    /// do not publish a classic registry (§4.4.2): callers of
    /// `check_*_attributes` for those vendors validate key shape instead.
    async fn attribute_registry(&self, ctx: &Context, uri: &str, kind: AttributeKind) -> Result<AttributeRegistry> {
        match (self.manufacturer, kind) {
            (Manufacturer::Dell, AttributeKind::Bmc) => self.dell_merged_registry(ctx, uri).await,
            _ => {
                let registry_uri = kind.registry_uri(uri);
                let body = self.get_json(ctx, &registry_uri).await?;
                serde_json::from_value(body)
                    .map_err(|err| Error::ProtocolViolation(format!("malformed attribute registry: {err}")))
            }
        }
    }

    /// Enumerates every `Managers/.../Oem/Dell/DellAttributes/*` collection,
    /// merges them (erroring on the first duplicate key), and augments the
    /// result with the built-in Dell keys usable even when unpublished
    /// (§4.4.1 steps 1-3).
    async fn dell_merged_registry(&self, ctx: &Context, manager_uri: &str) -> Result<AttributeRegistry> {
        let manager = self.get_json(ctx, manager_uri).await?;
        let collection_uris = dell_attribute_collection_uris(&manager);

        let mut collections = Vec::with_capacity(collection_uris.len());
        for collection_uri in &collection_uris {
            let body = self.get_json(ctx, collection_uri).await?;
            let entries = body.get("Attributes").cloned().unwrap_or(body);
            let registry: AttributeRegistry = serde_json::from_value(entries)
                .map_err(|err| Error::ProtocolViolation(format!("malformed DellAttributes collection: {err}")))?;
            collections.push(registry);
        }

        let mut merged = dell::merge_collections(collections)?;
        for key in dell::BUILTIN_KEYS {
            if merged.get(key).is_none() {
                merged.insert(
                    *key,
                    Attribute {
                        attribute_type: crate::model::attribute::AttributeType::String,
                        read_only: false,
                        immutable: false,
                        hidden: false,
                        reset_required: false,
                        allowed_values: Vec::new(),
                        current_value: None,
                    },
                );
            }
        }
        Ok(merged)
    }

    async fn attribute_values(&self, ctx: &Context, uri: &str, kind: AttributeKind) -> Result<SettingsAttributes> {
        match self.manufacturer {
            Manufacturer::Hpe | Manufacturer::Lenovo => self.http_subset_values(ctx, uri, kind, None).await,
            Manufacturer::Dell if kind == AttributeKind::Bmc => self.dell_merged_values(ctx, uri).await,
            _ => {
                let body = self.get_json(ctx, &kind.resource_uri(uri)).await?;
                Ok(json_attributes_object(&body))
            }
        }
    }

    /// Dell publishes one flat schema map per `DellAttributes` collection,
    /// each entry carrying its own `current_value` (§4.4.1) — unlike the
    /// standard Redfish `Bios`/`Manager` shape, there is no separate values
    /// sub-object to read back, so values are pulled straight out of the
    /// merged registry rather than re-parsed from the raw body.
    async fn dell_merged_values(&self, ctx: &Context, manager_uri: &str) -> Result<SettingsAttributes> {
        let registry = self.dell_merged_registry(ctx, manager_uri).await?;
        let mut out = SettingsAttributes::new();
        for (name, attribute) in registry.iter() {
            if let Some(value) = &attribute.current_value {
                out.insert(name.to_string(), value.clone());
            }
        }
        Ok(out)
    }

    /// HTTP-subset protocol read (§4.4.2): each requested key is its own
    /// `"<METHOD> <URI>"` request. The "caller's supplied JSON fragment" is
    /// whatever this crate last wrote for that key (tracked in the ledger,
    /// since this protocol has no registry to read expectations back from);
    /// if that fragment is still a submap of the live response it is echoed
    /// back unchanged (success shape), otherwise the raw response body is
    /// returned (divergence shape).
    async fn http_subset_values(
        &self,
        ctx: &Context,
        _uri: &str,
        kind: AttributeKind,
        names: Option<&[String]>,
    ) -> Result<SettingsAttributes> {
        let mut out = SettingsAttributes::new();
        let Some(names) = names else { return Ok(out) };

        let ledger = match kind {
            AttributeKind::Bios => self.bios_ledger.lock().await,
            AttributeKind::Bmc => self.bmc_ledger.lock().await,
        };
        let last_written: std::collections::HashMap<&str, &str> = ledger
            .committed()
            .iter()
            .filter_map(|(name, value)| value.as_str().map(|s| (name.as_str(), s)))
            .collect();

        for key in names {
            let (method, path) = http_subset::parse_key(key)?;
            let response = self
                .backend
                .request(ctx, method, path, None)
                .await
                .map_err(|err| Error::Transport(Box::new(err)))?;
            if !response.is_success() {
                return Err(Error::from_status(response.status, format!("{method} {path}")));
            }

            let last = last_written.get(key.as_str()).copied();
            let still_matches = last
                .and_then(|fragment| serde_json::from_str::<Value>(fragment).ok())
                .is_some_and(|fragment| http_subset::is_submap(&fragment, &response.body));
            match last.filter(|_| still_matches) {
                Some(fragment) => out.insert(key.clone(), AttributeValue::Str(fragment.to_string())),
                None => out.insert(key.clone(), AttributeValue::Str(response.body.to_string())),
            };
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeKind {
    Bios,
    Bmc,
}

impl AttributeKind {
    fn resource_uri(self, uri: &str) -> String {
        match self {
            Self::Bios => format!("{uri}/Bios"),
            Self::Bmc => uri.to_string(),
        }
    }

    fn registry_uri(self, uri: &str) -> String {
        match self {
            Self::Bios => format!("{uri}/Bios/AttributeRegistry"),
            Self::Bmc => format!("{uri}/AttributeRegistry"),
        }
    }
}

/// Enumerates `Oem.Dell.DellAttributes` link `@odata.id`s on a Manager
/// body (§4.4.1 step 1).
fn dell_attribute_collection_uris(manager: &Value) -> Vec<String> {
    manager
        .pointer("/Oem/Dell/DellAttributes")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("@odata.id").and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Converts a resource body's flat `Attributes` object (standard Redfish
/// `Bios`/`Manager` shape) into [`SettingsAttributes`].
fn json_attributes_object(body: &Value) -> SettingsAttributes {
    let attributes = body.get("Attributes").unwrap_or(body);
    let mut out = SettingsAttributes::new();
    if let Value::Object(map) = attributes {
        for (name, value) in map {
            let attribute_value = match value {
                Value::Bool(b) => AttributeValue::Bool(*b),
                Value::Number(n) if n.is_i64() || n.is_u64() => {
                    AttributeValue::Int(n.as_i64().unwrap_or_default())
                }
                Value::String(s) => AttributeValue::Str(s.clone()),
                other => AttributeValue::Str(other.to_string()),
            };
            out.insert(name.clone(), attribute_value);
        }
    }
    out
}

fn to_attribute_check_errors(errors: Vec<crate::model::attribute::AttributeError>) -> Vec<AttributeCheckError> {
    errors.into_iter().map(AttributeCheckError::from).collect()
}

impl<B: Backend> BmcCapability for GenericBmc<B> {
    #[tracing::instrument(skip(self, _ctx))]
    async fn logout(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_systems(&self, ctx: &Context) -> Result<Vec<Server>> {
        let collection = self.get_json(ctx, "/redfish/v1/Systems").await?;
        let uris: Vec<String> = collection
            .get("Members")
            .and_then(Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|m| m.get("@odata.id").and_then(Value::as_str).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut servers = Vec::with_capacity(uris.len());
        for uri in uris {
            servers.push(self.fetch_server(ctx, &uri).await?);
        }
        Ok(servers)
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_manager(&self, ctx: &Context, uuid: &str) -> Result<Manager> {
        let uri = format!("/redfish/v1/Managers/{uuid}");
        let body = self.get_json(ctx, &uri).await?;
        serde_json::from_value(body).map_err(|err| Error::ProtocolViolation(format!("malformed Manager body: {err}")))
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_system_info(&self, ctx: &Context, uri: &str) -> Result<Server> {
        self.fetch_server(ctx, uri).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_storages(&self, ctx: &Context, uri: &str) -> Result<Vec<Storage>> {
        self.fetch_collection(ctx, &format!("{uri}/Storage")).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_processors(&self, ctx: &Context, uri: &str) -> Result<Vec<Processor>> {
        self.fetch_collection(ctx, &format!("{uri}/Processors")).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn power_on(&self, ctx: &Context, uri: &str) -> Result<()> {
        let server = self.fetch_server(ctx, uri).await?;
        if matches!(server.power_state, PowerState::On | PowerState::PoweringOn) {
            return Ok(());
        }
        // reset_action commits whatever BIOS settings are staged for next
        // boot once it sees a transition that settles On (Property 3).
        self.reset_action(ctx, uri, ResetType::On).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn power_off(&self, ctx: &Context, uri: &str) -> Result<()> {
        let server = self.fetch_server(ctx, uri).await?;
        if matches!(server.power_state, PowerState::Off | PowerState::PoweringOff) {
            return Ok(());
        }
        self.reset_action(ctx, uri, ResetType::GracefulShutdown).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn force_power_off(&self, ctx: &Context, uri: &str) -> Result<()> {
        let server = self.fetch_server(ctx, uri).await?;
        if matches!(server.power_state, PowerState::Off) {
            return Ok(());
        }
        self.reset_action(ctx, uri, ResetType::ForceOff).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn reset(&self, ctx: &Context, uri: &str, reset_type: ResetType) -> Result<()> {
        self.reset_action(ctx, uri, reset_type).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn wait_for_server_power_state(&self, ctx: &Context, uri: &str, desired: PowerState) -> Result<()> {
        loop {
            let server = self.fetch_server(ctx, uri).await?;
            if server.power_state == desired {
                return Ok(());
            }
            if ctx.is_expired() {
                return Err(Error::Expired(crate::context::Expired::Deadline));
            }
            ctx.run(tokio::time::sleep(POWER_POLL_INTERVAL)).await?;
        }
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn set_pxe_boot_once(&self, ctx: &Context, uri: &str) -> Result<()> {
        let boot_override = self.pxe_boot_override(ctx, uri).await?;
        self.patch_json(ctx, uri, json!({ "Boot": boot_override }), None).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn set_boot_order(&self, ctx: &Context, uri: &str, order: Vec<String>) -> Result<()> {
        let server = self.get_json(ctx, uri).await?;
        let declared: Vec<String> = server
            .pointer("/Boot/BootOrder")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_else(|| order.clone());

        crate::vendor::generic::validate_boot_order(&order, &declared)?;
        self.patch_json(ctx, uri, json!({ "Boot": { "BootOrder": order } }), None).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_boot_order(&self, ctx: &Context, uri: &str) -> Result<Vec<String>> {
        let server = self.get_json(ctx, uri).await?;
        Ok(server
            .pointer("/Boot/BootOrder")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn set_virtual_media_boot_once(&self, ctx: &Context, uri: &str, target: BootSourceOverrideTarget) -> Result<()> {
        let boot_override = BootOverride {
            enabled: BootSourceOverrideEnabled::Once,
            target,
            mode: None,
        };
        self.patch_json(ctx, uri, json!({ "Boot": boot_override }), None).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn mount_virtual_media(&self, ctx: &Context, uri: &str, media_url: &str, slot_id: &str) -> Result<()> {
        let action_uri = format!("{uri}/VirtualMedia/{slot_id}/Actions/VirtualMedia.InsertMedia");
        self.post_json(ctx, &action_uri, json!({ "Image": media_url, "Inserted": true }))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn eject_virtual_media(&self, ctx: &Context, uri: &str, slot_id: &str) -> Result<()> {
        let action_uri = format!("{uri}/VirtualMedia/{slot_id}/Actions/VirtualMedia.EjectMedia");
        self.post_json(ctx, &action_uri, json!({})).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_virtual_media_status(&self, ctx: &Context, uri: &str, slot_id: &str) -> Result<VirtualMediaStatus> {
        let media_uri = format!("{uri}/VirtualMedia/{slot_id}");
        let body = self.get_json(ctx, &media_uri).await?;
        Ok(VirtualMediaStatus {
            inserted: body.get("Inserted").and_then(Value::as_bool).unwrap_or(false),
            image_url: body.get("Image").and_then(Value::as_str).map(str::to_string),
        })
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_bios_attribute_values(&self, ctx: &Context, uri: &str, names: &[String]) -> Result<SettingsAttributes> {
        if matches!(self.manufacturer, Manufacturer::Hpe | Manufacturer::Lenovo) {
            return self.http_subset_values(ctx, uri, AttributeKind::Bios, Some(names)).await;
        }
        let all = self.attribute_values(ctx, uri, AttributeKind::Bios).await?;
        let ledger = self.bios_ledger.lock().await;
        let committed = ledger.committed();
        let mut out = SettingsAttributes::new();
        for name in names {
            if let Some(value) = committed.get(name).or_else(|| all.get(name)) {
                out.insert(name.clone(), value.clone());
            }
        }
        Ok(out)
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_bios_pending_attribute_values(&self, ctx: &Context, uri: &str) -> Result<SettingsAttributes> {
        let _ = (ctx, uri);
        Ok(self.bios_ledger.lock().await.pending().clone())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn check_bios_attributes(&self, ctx: &Context, uri: &str, attrs: &SettingsAttributes) -> Result<bool> {
        if matches!(self.manufacturer, Manufacturer::Hpe | Manufacturer::Lenovo) {
            return check_http_subset_keys(attrs);
        }
        let registry = self.attribute_registry(ctx, uri, AttributeKind::Bios).await?;
        let (reset_required, errors) = registry.check(attrs);
        if errors.is_empty() {
            Ok(reset_required)
        } else {
            Err(Error::invalid_attributes(to_attribute_check_errors(errors)))
        }
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn set_bios_attributes_on_reset(&self, ctx: &Context, uri: &str, attrs: SettingsAttributes, apply_time: ApplyTime) -> Result<()> {
        if matches!(self.manufacturer, Manufacturer::Hpe | Manufacturer::Lenovo) {
            self.write_http_subset(ctx, &attrs).await?;
            // This protocol only ever supports Immediate apply (§4.4.2):
            // nothing is ever staged, so the write lands straight in
            // committed, where http_subset_values can echo it back later.
            self.bios_ledger.lock().await.apply_immediately(attrs);
            return Ok(());
        }

        let registry = self.attribute_registry(ctx, uri, AttributeKind::Bios).await?;
        let (immediate, staged, errors) = registry.partition_by_reset_required(&attrs);
        if !errors.is_empty() {
            return Err(Error::invalid_attributes(to_attribute_check_errors(errors)));
        }

        if matches!(self.manufacturer, Manufacturer::Dell) {
            self.write_dell_attributes(ctx, uri, &attrs, apply_time).await?;
        } else if !immediate.is_empty() {
            // Only the ResetRequired=false subset lands on the wire now;
            // staged keys stay off the live resource until the next
            // Off→On cycle (Property 3) and are tracked purely in the
            // ledger below.
            self.patch_json(ctx, &AttributeKind::Bios.resource_uri(uri), json!({ "Attributes": immediate.clone() }), None)
                .await?;
        }

        let mut ledger = self.bios_ledger.lock().await;
        if !immediate.is_empty() {
            ledger.apply_immediately(immediate);
        }
        if !staged.is_empty() {
            ledger.stage(staged);
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_bios_version(&self, ctx: &Context, uri: &str) -> Result<String> {
        let server = self.fetch_server(ctx, uri).await?;
        server
            .bios_version
            .ok_or_else(|| Error::ProtocolViolation("Server has no BiosVersion".to_string()))
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_bmc_attribute_values(&self, ctx: &Context, uri: &str, names: &[String]) -> Result<SettingsAttributes> {
        if matches!(self.manufacturer, Manufacturer::Hpe) {
            return self.http_subset_values(ctx, uri, AttributeKind::Bmc, Some(names)).await;
        }
        if matches!(self.manufacturer, Manufacturer::Lenovo) {
            return self.http_subset_values(ctx, uri, AttributeKind::Bmc, Some(names)).await;
        }
        let all = self.attribute_values(ctx, uri, AttributeKind::Bmc).await?;
        let ledger = self.bmc_ledger.lock().await;
        let committed = ledger.committed();
        let mut out = SettingsAttributes::new();
        for name in names {
            if let Some(value) = committed.get(name).or_else(|| all.get(name)) {
                out.insert(name.clone(), value.clone());
            }
        }
        Ok(out)
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_bmc_pending_attribute_values(&self, ctx: &Context, uri: &str) -> Result<SettingsAttributes> {
        let _ = (ctx, uri);
        // Lenovo's GetBMCPendingAttributeValues returns an empty map
        // unconditionally in the source this was distilled from (§9 open
        // question); preserved until a vendor contract says otherwise.
        if matches!(self.manufacturer, Manufacturer::Lenovo) {
            return Ok(crate::vendor::lenovo::bmc_pending_attribute_values());
        }
        Ok(self.bmc_ledger.lock().await.pending().clone())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn check_bmc_attributes(&self, ctx: &Context, uri: &str, attrs: &SettingsAttributes) -> Result<bool> {
        if matches!(self.manufacturer, Manufacturer::Hpe | Manufacturer::Lenovo) {
            return check_http_subset_keys(attrs);
        }
        let registry = self.attribute_registry(ctx, uri, AttributeKind::Bmc).await?;
        let (reset_required, errors) = registry.check(attrs);
        if errors.is_empty() {
            Ok(reset_required)
        } else {
            Err(Error::invalid_attributes(to_attribute_check_errors(errors)))
        }
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn set_bmc_attributes_immediately(&self, ctx: &Context, uri: &str, attrs: SettingsAttributes) -> Result<()> {
        if matches!(self.manufacturer, Manufacturer::Hpe | Manufacturer::Lenovo) {
            self.write_http_subset(ctx, &attrs).await?;
            self.bmc_ledger.lock().await.apply_immediately(attrs);
            return Ok(());
        }

        if matches!(self.manufacturer, Manufacturer::Dell) {
            self.write_dell_attributes(ctx, uri, &attrs, ApplyTime::Immediate).await?;
        } else {
            self.patch_json(ctx, uri, json!({ "Attributes": attrs }), None).await?;
        }
        self.bmc_ledger.lock().await.apply_immediately(attrs);
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn upgrade_bios_version(&self, ctx: &Context, params: UpgradeParams) -> Result<UpgradeOutcome> {
        self.submit_upgrade(ctx, params).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_bios_upgrade_task(&self, ctx: &Context, task_uri: &str) -> Result<Task> {
        upgrade::get_upgrade_task(ctx, &self.backend, &self.upgrade_overlay, task_uri).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn upgrade_bmc_version(&self, ctx: &Context, params: UpgradeParams) -> Result<UpgradeOutcome> {
        self.submit_upgrade(ctx, params).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_bmc_upgrade_task(&self, ctx: &Context, task_uri: &str) -> Result<Task> {
        upgrade::get_upgrade_task(ctx, &self.backend, &self.upgrade_overlay, task_uri).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn create_or_update_account(&self, ctx: &Context, user_name: &str, password: &str, role_id: &str) -> Result<Account> {
        let service = self.fetch_account_service(ctx).await?;

        // Credential rotation (§9): an existing UserName is updated in
        // place, never recreated, to avoid orphaning references to it.
        if let Some(existing) = service.find(user_name) {
            let body = json!({ "Password": password, "RoleId": role_id, "Enabled": true });
            self.patch_json(ctx, &existing.odata_id, body, None).await?;
            return Ok(Account {
                id: existing.id.clone(),
                odata_id: existing.odata_id.clone(),
                user_name: user_name.to_string(),
                role_id: role_id.to_string(),
                enabled: true,
                locked: existing.locked,
            });
        }

        let slot = service
            .first_free_slot()
            .ok_or_else(|| Error::ProtocolViolation("no free account slot".to_string()))?;
        let body = json!({ "UserName": user_name, "Password": password, "RoleId": role_id, "Enabled": true });
        self.patch_json(ctx, &slot.odata_id, body, None).await?;
        Ok(Account {
            id: slot.id.clone(),
            odata_id: slot.odata_id.clone(),
            user_name: user_name.to_string(),
            role_id: role_id.to_string(),
            enabled: true,
            locked: false,
        })
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn delete_account(&self, ctx: &Context, user_name: &str) -> Result<()> {
        let service = self.fetch_account_service(ctx).await?;
        let Some(existing) = service.find(user_name) else {
            return Err(Error::NotFound(format!("account {user_name}")));
        };
        self.patch_json(ctx, &existing.odata_id, json!({ "UserName": "", "Enabled": false }), None)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_accounts(&self, ctx: &Context) -> Result<Vec<Account>> {
        Ok(self.fetch_account_service(ctx).await?.accounts)
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn get_account_service(&self, ctx: &Context) -> Result<AccountService> {
        self.fetch_account_service(ctx).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn reset_manager(&self, ctx: &Context, uuid: &str, reset_type: ResetType) -> Result<()> {
        let uri = format!("/redfish/v1/Managers/{uuid}");
        let action_uri = format!("{uri}/Actions/Manager.Reset");
        self.post_json(ctx, &action_uri, json!({ "ResetType": reset_type })).await?;
        // A Manager reset is the gate event for staged BMC settings (§4.6).
        self.bmc_ledger.lock().await.commit_pending();
        Ok(())
    }
}

impl<B: Backend> GenericBmc<B> {
    async fn fetch_account_service(&self, ctx: &Context) -> Result<AccountService> {
        let service_uri = "/redfish/v1/AccountService";
        let service_body = self.get_json(ctx, service_uri).await?;
        let accounts_uri = service_body
            .pointer("/Accounts/@odata.id")
            .and_then(Value::as_str)
            .unwrap_or("/redfish/v1/AccountService/Accounts")
            .to_string();

        let collection = self.get_json(ctx, &accounts_uri).await?;
        let member_uris: Vec<String> = collection
            .get("Members")
            .and_then(Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|m| m.get("@odata.id").and_then(Value::as_str).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut accounts = Vec::with_capacity(member_uris.len());
        for uri in member_uris {
            let body = self.get_json(ctx, &uri).await?;
            let account: Account =
                serde_json::from_value(body).map_err(|err| Error::ProtocolViolation(format!("malformed Account body: {err}")))?;
            accounts.push(account);
        }

        Ok(AccountService {
            min_password_length: service_body.get("MinPasswordLength").and_then(Value::as_u64).map(|v| v as u32),
            account_lockout_threshold: service_body.get("AccountLockoutThreshold").and_then(Value::as_u64).map(|v| v as u32),
            accounts,
        })
    }

    async fn submit_upgrade(&self, ctx: &Context, params: UpgradeParams) -> Result<UpgradeOutcome> {
        let update_service = self.get_json(ctx, "/redfish/v1/UpdateService").await?;
        let target_uri = upgrade::simple_update_target(&update_service)?;
        let outcome = upgrade::upgrade_version(ctx, &self.backend, &self.upgrade_overlay, &target_uri, &params).await?;
        if let UpgradeOutcome::Fatal { status, message } = &outcome {
            return Err(Error::UpgradeSubmissionFatal {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(outcome)
    }

    /// Groups attributes by source `DellAttributes` collection, fetches
    /// each collection's current `ETag`, and PATCHes with `If-Match` plus
    /// `@Redfish.SettingsApplyTime` (§4.4.1 step 5).
    async fn write_dell_attributes(&self, ctx: &Context, manager_uri: &str, attrs: &SettingsAttributes, apply_time: ApplyTime) -> Result<()> {
        let manager = self.get_json(ctx, manager_uri).await?;
        let collection_uris = dell_attribute_collection_uris(&manager);

        let mut key_to_collection = std::collections::HashMap::new();
        for collection_uri in &collection_uris {
            let body = self.get_json(ctx, collection_uri).await?;
            if let Some(map) = body.get("Attributes").and_then(Value::as_object) {
                for key in map.keys() {
                    key_to_collection.insert(key.clone(), collection_uri.clone());
                }
            }
        }

        let groups = dell::group_by_collection(attrs, &key_to_collection);
        for (collection_uri, group_attrs) in groups {
            let current = self.get_json(ctx, &collection_uri).await?;
            let etag = current.get("@odata.etag").and_then(Value::as_str).map(str::to_string);
            let body = json!({
                "Attributes": group_attrs,
                "@Redfish.SettingsApplyTime": { "ApplyTime": apply_time },
            });
            self.patch_json(ctx, &collection_uri, body, etag.as_deref()).await?;
        }
        Ok(())
    }

    /// HTTP-subset protocol write (§4.4.2): only `Immediate` apply time is
    /// supported; any 2xx in `{200, 201, 202, 204}` counts as success.
    async fn write_http_subset(&self, ctx: &Context, attrs: &SettingsAttributes) -> Result<()> {
        for (key, value) in attrs.iter() {
            let (method, path) = http_subset::parse_key(key)?;
            if !matches!(method, "POST" | "PATCH") {
                return Err(Error::Unsupported(format!("HTTP-subset write via {method}")));
            }
            let fragment: Value = value
                .as_str()
                .and_then(|s| serde_json::from_str(s).ok())
                .unwrap_or_else(|| json!(value.as_str().unwrap_or_default()));
            let response = self
                .backend
                .request(ctx, method, path, Some(fragment))
                .await
                .map_err(|err| Error::Transport(Box::new(err)))?;
            if !http_subset::is_write_success(response.status) {
                return Err(Error::from_status(response.status, format!("{method} {path}")));
            }
        }
        Ok(())
    }
}

fn check_http_subset_keys(attrs: &SettingsAttributes) -> Result<bool> {
    let mut errors = Vec::new();
    for (key, _) in attrs.iter() {
        if let Err(err) = http_subset::parse_key(key) {
            errors.push(AttributeCheckError {
                name: key.clone(),
                reason: err.to_string(),
            });
        }
    }
    if errors.is_empty() {
        // Only `Immediate` apply time is supported on this protocol, so
        // there is never a reset-required deferral to report (§4.4.2).
        Ok(false)
    } else {
        Err(Error::invalid_attributes(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_attributes_object_infers_variant_from_json_type() {
        let body = json!({ "Attributes": { "fooreboot": 456, "Enabled": true, "Name": "x" } });
        let attrs = json_attributes_object(&body);
        assert_eq!(attrs.get("fooreboot"), Some(&AttributeValue::Int(456)));
        assert_eq!(attrs.get("Enabled"), Some(&AttributeValue::Bool(true)));
        assert_eq!(attrs.get("Name"), Some(&AttributeValue::Str("x".to_string())));
    }

    #[test]
    fn dell_attribute_collection_uris_reads_oem_dell_links() {
        let manager = json!({
            "Oem": { "Dell": { "DellAttributes": [
                { "@odata.id": "/redfish/v1/Managers/iDRAC.Embedded.1/Oem/Dell/DellAttributes/System.Embedded.1" },
                { "@odata.id": "/redfish/v1/Managers/iDRAC.Embedded.1/Oem/Dell/DellAttributes/LifecycleController.Embedded.1" },
            ] } }
        });
        let uris = dell_attribute_collection_uris(&manager);
        assert_eq!(uris.len(), 2);
    }
}
