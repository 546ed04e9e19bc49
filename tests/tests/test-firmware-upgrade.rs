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
//! Integration test of the firmware upgrade happy path (§4.5, Property 7,
//! Scenario 4): submit, poll through every intermediate state, and
//! observe the new version once the task completes.

use bmc_fleet::context::Context;
use bmc_fleet::model::task::TaskState;
use bmc_fleet::vendor::Manufacturer;
use bmc_fleet::BmcCapability;
use bmc_fleet::GenericBmc;
use bmc_fleet::UpgradeOutcome;
use bmc_fleet::UpgradeParams;
use bmc_fleet_mock::MockBackend;
use bmc_fleet_mock::MockConfig;
use bmc_fleet_mock::MockTree;
use std::sync::Arc;
use std::time::Duration;

const SYSTEM_URI: &str = "/redfish/v1/Systems/437XR1138R2";
const IMAGE_URI: &str = "http://fw.example.test/images/bios-2.0.bin";

#[tokio::test]
async fn upgrade_bios_version_progresses_to_completed_and_updates_version() {
    let tree = Arc::new(MockTree::new());
    let config = MockConfig {
        upgrade_initial_delay: Duration::from_millis(2),
        upgrade_step_delay: Duration::from_millis(2),
        ..MockConfig::default()
    };
    let bmc = GenericBmc::new(MockBackend::new(tree, config), Manufacturer::Generic);
    let ctx = Context::background();

    let outcome = bmc
        .upgrade_bios_version(&ctx, UpgradeParams::new(IMAGE_URI))
        .await
        .unwrap();
    let task_uri = match outcome {
        UpgradeOutcome::Accepted { task_uri } => task_uri,
        UpgradeOutcome::Fatal { status, message } => panic!("expected Accepted, got fatal {status}: {message}"),
    };

    // Poll through New -> ... -> Completed. A real reconciler would space
    // these polls out in wall-clock time; here the mock's own step delay
    // (2ms) is the only pacing needed.
    let mut seen_running = false;
    let mut last_state = TaskState::New;
    for _ in 0..200 {
        let task = bmc.get_bios_upgrade_task(&ctx, &task_uri).await.unwrap();
        last_state = task.task_state;
        if task.task_state == TaskState::Running {
            seen_running = true;
        }
        if task.task_state.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(3)).await;
    }

    assert!(seen_running, "expected to observe at least one Running poll");
    assert_eq!(last_state, TaskState::Completed);

    let version = bmc.get_bios_version(&ctx, SYSTEM_URI).await.unwrap();
    assert_eq!(version, IMAGE_URI);
}
