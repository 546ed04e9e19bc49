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

//! The asynchronous firmware upgrade engine (§4.5).
//!
//! The core never owns upgrade timers (§9: "pull, not push"): `submit`
//! returns a task URI, `poll` returns a snapshot. The reconciling caller
//! drives cadence and decides when a [`crate::model::task::TaskState`] is
//! terminal.

use crate::backend::Backend;
use crate::backend::HttpResponse;
use crate::context::Context;
use crate::error::Error;
use crate::error::Result;
use crate::vendor::UpgradeOverlay;

/// Parameters for a `SimpleUpdate` firmware upgrade request.
#[derive(Debug, Clone)]
pub struct UpgradeParams {
    pub image_uri: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub targets: Vec<String>,
    pub transfer_protocol: Option<String>,
    pub force_update: Option<bool>,
}

impl UpgradeParams {
    #[must_use]
    pub fn new(image_uri: impl Into<String>) -> Self {
        Self {
            image_uri: image_uri.into(),
            username: None,
            password: None,
            targets: Vec::new(),
            transfer_protocol: None,
            force_update: None,
        }
    }
}

/// The outcome of submitting an upgrade request (§4.5 step 4).
#[derive(Debug, Clone)]
pub enum UpgradeOutcome {
    /// `202 Accepted`: the task/task-monitor URI to poll.
    Accepted { task_uri: String },
    /// Any other status: `fatal=true`. Human intervention is required;
    /// the caller must not retry this exact request.
    Fatal { status: u16, message: String },
}

/// Dereferences the UpdateService Actions payload for the
/// `#UpdateService.SimpleUpdate` target URI (§4.5 step 1).
pub fn simple_update_target(update_service: &serde_json::Value) -> Result<String> {
    update_service
        .get("Actions")
        .and_then(|actions| actions.get("#UpdateService.SimpleUpdate"))
        .and_then(|action| action.get("target"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::ProtocolViolation("UpdateService is missing #UpdateService.SimpleUpdate".to_string()))
}

/// Submits an upgrade request and classifies the response (§4.5 steps
/// 2-4). Response-body close is guaranteed by `Backend::post` regardless
/// of which branch is taken.
pub async fn upgrade_version(
    ctx: &Context,
    backend: &impl Backend,
    overlay: &impl UpgradeOverlay,
    target_uri: &str,
    params: &UpgradeParams,
) -> Result<UpgradeOutcome> {
    let body = overlay.build_request_body(params);
    let response = backend
        .post(ctx, target_uri, body)
        .await
        .map_err(|err| Error::Transport(Box::new(err)))?;

    if response.status != 202 {
        return Ok(UpgradeOutcome::Fatal {
            status: response.status,
            message: response_message(&response),
        });
    }

    let task_uri = overlay.extract_task_monitor_uri(&response)?;
    Ok(UpgradeOutcome::Accepted { task_uri })
}

/// Polls the stored task URI once and normalizes the result (§4.5
/// "Task polling"). The caller decides when to stop by inspecting the
/// returned `TaskState`.
pub async fn get_upgrade_task(
    ctx: &Context,
    backend: &impl Backend,
    overlay: &impl UpgradeOverlay,
    task_uri: &str,
) -> Result<crate::model::task::Task> {
    let response = backend
        .get(ctx, task_uri)
        .await
        .map_err(|err| Error::Transport(Box::new(err)))?;

    if response.status != 200 && response.status != 202 {
        return Err(Error::from_status(response.status, response_message(&response)));
    }

    overlay.parse_task_details(ctx, backend, &response).await
}

fn response_message(response: &HttpResponse) -> String {
    response
        .body
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn simple_update_target_reads_action_uri() {
        let update_service = json!({
            "Actions": {
                "#UpdateService.SimpleUpdate": {"target": "/redfish/v1/UpdateService/Actions/SimpleUpdate"}
            }
        });
        assert_eq!(
            simple_update_target(&update_service).unwrap(),
            "/redfish/v1/UpdateService/Actions/SimpleUpdate"
        );
    }

    #[test]
    fn simple_update_target_errors_when_missing() {
        assert!(simple_update_target(&json!({})).is_err());
    }
}
