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

//! The two top-level Redfish resources fleet operations pivot on:
//! `ComputerSystem` (`Server`) and `Manager` (§3).

use crate::model::boot::BootOverride;
use crate::model::power::PowerState;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Redfish `IndicatorLED` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorLed {
    Off,
    Lit,
    Blinking,
    Unknown,
}

/// The common Redfish `Status` object (`State`/`Health`/`HealthRollup`):
/// carries both a `Server`'s SMBIOS status and a `Manager`'s operational
/// state (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceStatus {
    #[serde(default, rename = "State")]
    pub state: Option<String>,
    #[serde(default, rename = "Health")]
    pub health: Option<String>,
    #[serde(default, rename = "HealthRollup")]
    pub health_rollup: Option<String>,
}

/// `ComputerSystem` (§3): the physical/logical server a `Bmc` manages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(default, rename = "@odata.etag")]
    pub odata_etag: Option<String>,
    #[serde(default, rename = "Name")]
    pub name: Option<String>,
    #[serde(default, rename = "Manufacturer")]
    pub manufacturer: Option<String>,
    #[serde(default, rename = "Model")]
    pub model: Option<String>,
    #[serde(default, rename = "SerialNumber")]
    pub serial_number: Option<String>,
    #[serde(default, rename = "SKU")]
    pub sku: Option<String>,
    #[serde(rename = "PowerState")]
    pub power_state: PowerState,
    #[serde(default, rename = "IndicatorLED")]
    pub indicator_led: Option<IndicatorLed>,
    /// SMBIOS status, carried on the wire as the standard Redfish `Status`
    /// object.
    #[serde(default, rename = "Status")]
    pub status: Option<ResourceStatus>,
    #[serde(default, rename = "Boot")]
    pub boot: Option<BootOverride>,
    #[serde(default, rename = "BiosVersion")]
    pub bios_version: Option<String>,
}

/// `Storage` (§4.1 `GetStorages`): one storage controller/subsystem hanging
/// off a `Server`'s `Systems/<id>/Storage` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(default, rename = "Name")]
    pub name: Option<String>,
    #[serde(default, rename = "Status")]
    pub status: Option<ResourceStatus>,
    /// `@odata.id`s of the `Drive` resources this controller exposes.
    #[serde(default, rename = "Drives")]
    pub drives: Vec<ODataRef>,
}

/// `Processor` (§4.1 `GetProcessors`): one CPU/accelerator socket under a
/// `Server`'s `Systems/<id>/Processors` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Processor {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(default, rename = "Name")]
    pub name: Option<String>,
    #[serde(default, rename = "Socket")]
    pub socket: Option<String>,
    #[serde(default, rename = "ProcessorType")]
    pub processor_type: Option<String>,
    #[serde(default, rename = "TotalCores")]
    pub total_cores: Option<u32>,
    #[serde(default, rename = "TotalThreads")]
    pub total_threads: Option<u32>,
    #[serde(default, rename = "Status")]
    pub status: Option<ResourceStatus>,
}

/// A bare `@odata.id` reference, the shape Redfish uses for every
/// collection-member and cross-resource link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ODataRef {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

/// `Manager` (§3): the BMC's own self-identity resource, distinct from the
/// `Server` it manages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manager {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(default, rename = "@odata.etag")]
    pub odata_etag: Option<String>,
    #[serde(default, rename = "Name")]
    pub name: Option<String>,
    #[serde(default, rename = "Manufacturer")]
    pub manufacturer: Option<String>,
    #[serde(default, rename = "ManagerType")]
    pub manager_type: Option<String>,
    #[serde(default, rename = "FirmwareVersion")]
    pub firmware_version: Option<String>,
    #[serde(default, rename = "SerialNumber")]
    pub serial_number: Option<String>,
    #[serde(default, rename = "Model")]
    pub model: Option<String>,
    #[serde(default, rename = "PowerState")]
    pub power_state: Option<PowerState>,
    /// Operational state, carried on the wire as the standard Redfish
    /// `Status` object.
    #[serde(default, rename = "Status")]
    pub status: Option<ResourceStatus>,
    #[serde(default, rename = "MacAddress")]
    pub mac_address: Option<String>,
    /// Opaque per-vendor link payload (Dell's `Oem.Dell.DellAttributes`
    /// links, HPE/Lenovo OEM blobs), kept untyped since its shape differs
    /// per manufacturer and most callers only need to pass it to a vendor
    /// overlay that knows its own shape.
    #[serde(default, rename = "Oem")]
    pub oem: Option<Value>,
}
