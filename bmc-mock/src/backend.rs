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

//! [`Backend`] implemented directly against [`MockTree`], for tests that
//! drive a [`bmc_fleet::GenericBmc`] in-process rather than over HTTP.
//!
//! This is a different consumption path from [`crate::http`]'s axum
//! router: here there is no wire protocol at all, just the same resource
//! graph answering `Backend` calls synchronously (modulo the explicit
//! delays §5 calls for). Power transitions and firmware upgrades are
//! simulated by background tasks that mutate [`MockTree`] overrides, the
//! same way a real BMC's own firmware would update its resources
//! out-of-band from the request that triggered them.

use crate::config::MockConfig;
use crate::tree::MockTree;
use bmc_fleet::backend::Backend;
use bmc_fleet::backend::HttpResponse;
use bmc_fleet::backend::TransportError;
use bmc_fleet::context::Context;
use serde_json::json;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

// `TaskStatus` is always present on the wire (a real Redfish service sets
// it to `OK` from the moment a Task exists, only escalating on warning or
// error), so every step here carries one rather than leaving it null.
const TASK_STEPS: &[(&str, &str, Option<u8>)] = &[
    ("New", "OK", None),
    ("Pending", "OK", None),
    ("Starting", "OK", None),
    ("Running", "OK", Some(10)),
    ("Running", "OK", Some(20)),
    ("Running", "OK", Some(100)),
    ("Completed", "OK", None),
];

/// A [`Backend`] backed by the shared in-process mock tree.
///
/// Every instance shares the same [`MockTree`] (`Arc`-cloned), so
/// multiple handles observe each other's writes exactly like multiple
/// reconcilers pointed at the same real BMC would.
pub struct MockBackend {
    tree: Arc<MockTree>,
    config: MockConfig,
    next_task: Arc<AtomicU64>,
}

impl MockBackend {
    #[must_use]
    pub fn new(tree: Arc<MockTree>, config: MockConfig) -> Self {
        Self {
            tree,
            config,
            next_task: Arc::new(AtomicU64::new(1)),
        }
    }

    fn ok(body: Value) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body,
        }
    }

    fn not_found(path: &str) -> HttpResponse {
        HttpResponse {
            status: 404,
            headers: HashMap::new(),
            body: json!({ "error": { "message": format!("resource not found: {path}") } }),
        }
    }

    /// `ComputerSystem.Reset` / `Manager.Reset`: flips `PowerState` after
    /// `power_transition_delay`, matching §5's "150 ms default for a
    /// power-state transition apply". A transition that actually boots the
    /// system (anything settling on `On`) also consumes a one-time boot
    /// override, clearing `BootSourceOverrideEnabled` back to `Disabled`
    /// the same way real firmware drops it after one use (Property 2).
    fn simulate_power_action(&self, resource_path: &str, reset_type: &str) {
        let target_power = match reset_type {
            "On" | "ForceOn" | "PowerCycle" => "On",
            "ForceOff" | "GracefulShutdown" | "ForceRestart" | "GracefulRestart" => "Off",
            _ => return,
        };
        let tree = Arc::clone(&self.tree);
        let path = resource_path.to_string();
        let delay = self.config.power_transition_delay;
        let power = target_power.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tree.patch(&path, &json!({ "PowerState": power })).await.ok();
            if power == "On" {
                if let Some(body) = tree.get(&path) {
                    let once = body.pointer("/Boot/BootSourceOverrideEnabled").and_then(Value::as_str) == Some("Once");
                    if once {
                        tree.patch(&path, &json!({ "Boot": { "BootSourceOverrideEnabled": "Disabled" } })).await.ok();
                    }
                }
            }
        });
    }

    /// `UpdateService.SimpleUpdate`: materializes a `Task` resource and
    /// advances it through the fixed sequence (§4.5, §4.7, Property 7)
    /// in an independent background task, finishing by writing the new
    /// firmware version onto `version_path` (the `Server`'s `BiosVersion`
    /// or the `Manager` itself) once `Completed`.
    fn simulate_upgrade(&self, image_uri: &str, version_path: &str, version_field: &str) -> String {
        let id = self.next_task.fetch_add(1, Ordering::SeqCst);
        let task_uri = format!("/redfish/v1/TaskService/Tasks/{id}");
        self.tree.put_override(
            &task_uri,
            json!({
                "@odata.id": task_uri,
                "Id": id.to_string(),
                "TaskState": "New",
                "TaskStatus": "OK",
                "PercentComplete": 0,
                "Messages": [],
            }),
        );

        let tree = Arc::clone(&self.tree);
        let initial_delay = self.config.upgrade_initial_delay;
        let step_delay = self.config.upgrade_step_delay;
        let task_uri_bg = task_uri.clone();
        let version_path = version_path.to_string();
        let version_field = version_field.to_string();
        let image_uri = image_uri.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;
            for (state, status, percent) in TASK_STEPS {
                tree.put_override(
                    &task_uri_bg,
                    json!({
                        "@odata.id": task_uri_bg,
                        "Id": task_uri_bg.rsplit('/').next().unwrap_or_default(),
                        "TaskState": state,
                        "TaskStatus": status,
                        "PercentComplete": percent.unwrap_or(if *state == "Completed" { 100 } else { 0 }),
                        "Messages": [],
                    }),
                );
                if *state == "Completed" {
                    let mut patch = serde_json::Map::new();
                    patch.insert(version_field.clone(), json!(image_uri));
                    tree.patch(&version_path, &Value::Object(patch)).await.ok();
                    break;
                }
                tokio::time::sleep(step_delay).await;
            }
        });

        task_uri
    }
}

fn reset_type_of(body: &Value) -> &str {
    body.get("ResetType").and_then(Value::as_str).unwrap_or("")
}

fn is_system_reset(path: &str) -> bool {
    path.ends_with("/Actions/ComputerSystem.Reset")
}

fn is_manager_reset(path: &str) -> bool {
    path.ends_with("/Actions/Manager.Reset")
}

fn is_simple_update(path: &str) -> bool {
    path == "/redfish/v1/UpdateService/Actions/SimpleUpdate"
}

fn system_path_from_action(path: &str) -> &str {
    path.trim_end_matches("/Actions/ComputerSystem.Reset")
}

fn manager_path_from_action(path: &str) -> &str {
    path.trim_end_matches("/Actions/Manager.Reset")
}

impl Backend for MockBackend {
    async fn get(&self, _ctx: &Context, path: &str) -> Result<HttpResponse, TransportError> {
        match self.tree.get(path) {
            Some(body) => Ok(Self::ok(body)),
            None => Ok(Self::not_found(path)),
        }
    }

    async fn patch(&self, _ctx: &Context, path: &str, body: Value, _if_match: Option<&str>) -> Result<HttpResponse, TransportError> {
        match self.tree.patch(path, &body).await {
            Ok(merged) => Ok(HttpResponse {
                status: 204,
                headers: HashMap::new(),
                body: merged,
            }),
            Err(crate::tree::PatchError::NotFound) => Ok(Self::not_found(path)),
            Err(crate::tree::PatchError::CollectionPatchForbidden) => Ok(HttpResponse {
                status: 405,
                headers: HashMap::new(),
                body: json!({ "error": { "message": "PATCH on a collection resource is forbidden" } }),
            }),
        }
    }

    async fn post(&self, _ctx: &Context, path: &str, body: Value) -> Result<HttpResponse, TransportError> {
        if is_system_reset(path) {
            self.simulate_power_action(system_path_from_action(path), reset_type_of(&body));
            return Ok(HttpResponse {
                status: 204,
                headers: HashMap::new(),
                body: Value::Null,
            });
        }
        if is_manager_reset(path) {
            self.simulate_power_action(manager_path_from_action(path), reset_type_of(&body));
            return Ok(HttpResponse {
                status: 204,
                headers: HashMap::new(),
                body: Value::Null,
            });
        }
        if is_simple_update(path) {
            let image_uri = body.get("ImageURI").and_then(Value::as_str).unwrap_or_default().to_string();
            // Every bundled scenario upgrades the one bundled System's
            // BiosVersion; a Manager-targeted upgrade would patch the
            // Manager's FirmwareVersion instead, selected the same way
            // `GenericBmc::submit_upgrade` picks its own target.
            let task_uri = self.simulate_upgrade(&image_uri, "/redfish/v1/Systems/437XR1138R2", "BiosVersion");
            return Ok(HttpResponse {
                status: 202,
                headers: HashMap::new(),
                body: json!({ "@odata.id": task_uri }),
            });
        }

        if !self.tree.exists(path) {
            return Ok(Self::not_found(path));
        }
        Ok(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Value::Null,
        })
    }

    async fn delete(&self, _ctx: &Context, path: &str) -> Result<HttpResponse, TransportError> {
        if self.tree.exists(path) {
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Value::Null,
            })
        } else {
            Ok(Self::not_found(path))
        }
    }

    async fn request(&self, ctx: &Context, method: &str, path: &str, body: Option<Value>) -> Result<HttpResponse, TransportError> {
        match method {
            "GET" => self.get(ctx, path).await,
            "PATCH" => self.patch(ctx, path, body.unwrap_or(Value::Null), None).await,
            "POST" => self.post(ctx, path, body.unwrap_or(Value::Null)).await,
            "DELETE" => self.delete(ctx, path).await,
            _ => Ok(HttpResponse {
                status: 405,
                headers: HashMap::new(),
                body: json!({ "error": { "message": format!("unsupported method {method}") } }),
            }),
        }
    }
}

/// Waits for wall-clock time to pass in tests without hand-rolled
/// polling loops around a background task's completion.
pub async fn settle(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmc_fleet::Context as BmcContext;

    #[tokio::test]
    async fn get_returns_bundled_fixture() {
        let tree = Arc::new(MockTree::new());
        let backend = MockBackend::new(tree, MockConfig::default());
        let ctx = BmcContext::background();
        let response = backend.get(&ctx, "/redfish/v1/Systems/437XR1138R2").await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.body["Id"], "437XR1138R2");
    }

    #[tokio::test]
    async fn get_unknown_path_is_404() {
        let tree = Arc::new(MockTree::new());
        let backend = MockBackend::new(tree, MockConfig::default());
        let ctx = BmcContext::background();
        let response = backend.get(&ctx, "/redfish/v1/Nope").await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn system_reset_to_on_eventually_flips_power_state() {
        let tree = Arc::new(MockTree::new());
        let mut config = MockConfig::default();
        config.power_transition_delay = Duration::from_millis(5);
        let backend = MockBackend::new(tree, config);
        let ctx = BmcContext::background();

        let response = backend
            .post(
                &ctx,
                "/redfish/v1/Systems/437XR1138R2/Actions/ComputerSystem.Reset",
                json!({ "ResetType": "On" }),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 204);

        settle(Duration::from_millis(30)).await;
        let after = backend.get(&ctx, "/redfish/v1/Systems/437XR1138R2").await.unwrap();
        assert_eq!(after.body["PowerState"], "On");
    }

    #[tokio::test]
    async fn simple_update_progresses_to_completed_and_writes_version() {
        let tree = Arc::new(MockTree::new());
        let mut config = MockConfig::default();
        config.upgrade_initial_delay = Duration::from_millis(2);
        config.upgrade_step_delay = Duration::from_millis(2);
        let backend = MockBackend::new(tree, config);
        let ctx = BmcContext::background();

        let submit = backend
            .post(
                &ctx,
                "/redfish/v1/UpdateService/Actions/SimpleUpdate",
                json!({ "ImageURI": "http://x/fw.bin" }),
            )
            .await
            .unwrap();
        assert_eq!(submit.status, 202);
        let task_uri = submit.body["@odata.id"].as_str().unwrap().to_string();

        settle(Duration::from_millis(100)).await;
        let task = backend.get(&ctx, &task_uri).await.unwrap();
        assert_eq!(task.body["TaskState"], "Completed");

        let system = backend.get(&ctx, "/redfish/v1/Systems/437XR1138R2").await.unwrap();
        assert_eq!(system.body["BiosVersion"], "http://x/fw.bin");
    }
}
