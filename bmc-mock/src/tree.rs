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

//! The bundled Redfish tree plus its per-path override store (§4.7).
//!
//! `MockTree` is the process-wide, read-mostly resource graph both the
//! HTTP router and [`crate::backend::MockBackend`] serve from. The
//! bundled dataset is immutable and compiled in via `include_str!`;
//! writes never touch it, they only ever populate `overrides`.

use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::Mutex;

macro_rules! fixture {
    ($path:expr, $file:expr) => {
        ($path, include_str!($file))
    };
}

/// `(redfish path, raw JSON)` pairs for every bundled fixture under
/// `data/`. The path is exactly the key a normalized request resolves
/// to: `/redfish/v1/<p>` for every `data/<p>/index.json`, root aliased
/// to `/redfish/v1`.
const RAW_FIXTURES: &[(&str, &str)] = &[
    fixture!("/redfish/v1", "../data/index.json"),
    fixture!("/redfish/v1/Systems", "../data/Systems/index.json"),
    fixture!("/redfish/v1/Systems/437XR1138R2", "../data/Systems/437XR1138R2/index.json"),
    fixture!("/redfish/v1/Systems/437XR1138R2/Bios", "../data/Systems/437XR1138R2/Bios/index.json"),
    fixture!(
        "/redfish/v1/Systems/437XR1138R2/Bios/AttributeRegistry",
        "../data/Systems/437XR1138R2/Bios/AttributeRegistry/index.json"
    ),
    fixture!("/redfish/v1/Systems/437XR1138R2/Storage", "../data/Systems/437XR1138R2/Storage/index.json"),
    fixture!("/redfish/v1/Systems/437XR1138R2/Storage/1", "../data/Systems/437XR1138R2/Storage/1/index.json"),
    fixture!("/redfish/v1/Systems/437XR1138R2/Processors", "../data/Systems/437XR1138R2/Processors/index.json"),
    fixture!(
        "/redfish/v1/Systems/437XR1138R2/Processors/CPU1",
        "../data/Systems/437XR1138R2/Processors/CPU1/index.json"
    ),
    fixture!("/redfish/v1/Managers", "../data/Managers/index.json"),
    fixture!("/redfish/v1/Managers/BMC", "../data/Managers/BMC/index.json"),
    fixture!(
        "/redfish/v1/Managers/BMC/AttributeRegistry",
        "../data/Managers/BMC/AttributeRegistry/index.json"
    ),
    fixture!("/redfish/v1/AccountService", "../data/AccountService/index.json"),
    fixture!("/redfish/v1/AccountService/Accounts", "../data/AccountService/Accounts/index.json"),
    fixture!("/redfish/v1/AccountService/Accounts/1", "../data/AccountService/Accounts/1/index.json"),
    fixture!("/redfish/v1/AccountService/Accounts/2", "../data/AccountService/Accounts/2/index.json"),
    fixture!("/redfish/v1/AccountService/Accounts/3", "../data/AccountService/Accounts/3/index.json"),
    fixture!("/redfish/v1/TaskService", "../data/TaskService/index.json"),
    fixture!("/redfish/v1/TaskService/Tasks", "../data/TaskService/Tasks/index.json"),
    fixture!("/redfish/v1/UpdateService", "../data/UpdateService/index.json"),
    fixture!("/redfish/v1/Chassis/1", "../data/Chassis/1/index.json"),
];

fn bundled() -> &'static HashMap<&'static str, Value> {
    static CELL: OnceLock<HashMap<&'static str, Value>> = OnceLock::new();
    CELL.get_or_init(|| {
        RAW_FIXTURES
            .iter()
            .map(|(path, raw)| (*path, serde_json::from_str(raw).expect("bundled mock fixture is valid JSON")))
            .collect()
    })
}

/// Maps `/redfish/v1/<p>` to the `data/<p>/index.json` key, root to
/// `/redfish/v1` (§4.7).
fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/redfish/v1".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchError {
    NotFound,
    CollectionPatchForbidden,
}

/// RFC 7396-style merge patch: a `null` leaf deletes the key, any other
/// scalar/array replaces it, nested objects recurse.
fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                if value.is_null() {
                    base_map.remove(key);
                } else {
                    deep_merge(base_map.entry(key.clone()).or_insert(Value::Null), value);
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

/// The bundled dataset plus the per-path overrides PATCH creates.
pub struct MockTree {
    overrides: DashMap<String, Value>,
    // PATCH semantics require read-then-write atomicity per path; a
    // single mutex serializes all patches rather than one per key,
    // matching §4.7's "PATCH is serialised on a mutex".
    patch_lock: Mutex<()>,
}

impl MockTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            overrides: DashMap::new(),
            patch_lock: Mutex::new(()),
        }
    }

    fn base(&self, key: &str) -> Option<Value> {
        self.overrides
            .get(key)
            .map(|entry| entry.value().clone())
            .or_else(|| bundled().get(key).cloned())
    }

    /// GET: override if present, else the bundled file, else `None` (404).
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Value> {
        let key = normalize(path);
        self.base(&key)
    }

    /// PATCH: deep-merges `body` into the resolved base and stores the
    /// result as a fresh override. Rejects collection resources (those
    /// with a `Members` array) per §4.7 / Property 6.
    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, PatchError> {
        let key = normalize(path);
        let _guard = self.patch_lock.lock().await;
        let Some(base) = self.base(&key) else {
            return Err(PatchError::NotFound);
        };
        if base.get("Members").is_some() {
            return Err(PatchError::CollectionPatchForbidden);
        }
        let mut merged = base;
        deep_merge(&mut merged, body);
        self.overrides.insert(key, merged.clone());
        Ok(merged)
    }

    /// Installs an override directly, bypassing merge semantics. Used
    /// by the power/upgrade simulators to publish a new resource state
    /// (e.g. a freshly materialized `Task`) without a caller-supplied
    /// patch body.
    pub fn put_override(&self, path: &str, value: Value) {
        self.overrides.insert(normalize(path), value);
    }

    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.base(&normalize(path)).is_some()
    }
}

impl Default for MockTree {
    fn default() -> Self {
        Self::new()
    }
}
