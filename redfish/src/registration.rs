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

//! Wire shapes for the external registration protocol (§6).
//!
//! This crate does not implement the registration server itself: these
//! are plain serde structs a reconciler process can use to talk to one.
//! The protocol is bit-exact:
//! - `POST /register` with [`RegisterRequest`] → `201`.
//! - `GET /systems/{uuid}` → `200` with [`ServerRecord`], `404` if absent.
//! - `DELETE /delete/{uuid}` → [`DeleteOutcome::Removed`] (`200`) or
//!   [`DeleteOutcome::NotFound`] (`404`).

use serde::Deserialize;
use serde::Serialize;

/// One network interface reported at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    #[serde(rename = "ipAddresses")]
    pub ip_addresses: Vec<String>,
    #[serde(rename = "macAddress")]
    pub mac_address: String,
    #[serde(rename = "carrierStatus")]
    pub carrier_status: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "systemUUID")]
    pub system_uuid: String,
    pub data: RegisterData,
}

/// The `data` object of a [`RegisterRequest`], carrying whatever facts the
/// reconciler already knows about the system at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    #[serde(rename = "networkInterfaces")]
    pub network_interfaces: Vec<NetworkInterface>,
}

/// The stored record returned by `GET /systems/{uuid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRecord {
    #[serde(rename = "systemUUID")]
    pub system_uuid: String,
    pub data: RegisterData,
}

/// Outcome of `DELETE /delete/{uuid}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_round_trips_through_json() {
        let request = RegisterRequest {
            system_uuid: "437XR1138R2".to_string(),
            data: RegisterData {
                network_interfaces: vec![NetworkInterface {
                    name: "eth0".to_string(),
                    ip_addresses: vec!["10.0.0.5".to_string()],
                    mac_address: "EE:C2:CC:44:55:00".to_string(),
                    carrier_status: "Up".to_string(),
                }],
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemUUID"], "437XR1138R2");
        assert_eq!(json["data"]["networkInterfaces"][0]["macAddress"], "EE:C2:CC:44:55:00");

        let back: RegisterRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back.system_uuid, request.system_uuid);
    }
}
