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
//! Integration tests of power control and boot overrides against the
//! in-process mock.

use bmc_fleet::context::Context;
use bmc_fleet::model::boot::BootSourceOverrideTarget;
use bmc_fleet::model::power::PowerState;
use bmc_fleet::vendor::Manufacturer;
use bmc_fleet::BmcCapability;
use bmc_fleet::GenericBmc;
use bmc_fleet_mock::backend::settle;
use bmc_fleet_mock::MockBackend;
use bmc_fleet_mock::MockConfig;
use bmc_fleet_mock::MockTree;
use std::sync::Arc;
use std::time::Duration;

const SYSTEM_URI: &str = "/redfish/v1/Systems/437XR1138R2";

fn bmc_with(config: MockConfig) -> GenericBmc<MockBackend> {
    let tree = Arc::new(MockTree::new());
    GenericBmc::new(MockBackend::new(tree, config), Manufacturer::Generic)
}

fn fast_config() -> MockConfig {
    MockConfig {
        power_transition_delay: Duration::from_millis(5),
        ..MockConfig::default()
    }
}

// Scenario 1: PowerOn path. The bundled System starts Off.
#[tokio::test]
async fn power_on_reaches_on_within_budget() {
    let bmc = bmc_with(fast_config());
    let ctx = Context::background();

    bmc.power_on(&ctx, SYSTEM_URI).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::On)
        .await
        .unwrap();

    let server = bmc.get_system_info(&ctx, SYSTEM_URI).await.unwrap();
    assert_eq!(server.power_state, PowerState::On);
}

// Property 1: issuing a power command whose target equals the current
// state is a no-op that still completes successfully.
#[tokio::test]
async fn power_off_on_an_already_off_server_is_idempotent() {
    let bmc = bmc_with(fast_config());
    let ctx = Context::background();

    // The bundled System is already Off; PowerOff must short-circuit
    // without issuing a reset action (and thus without waiting out the
    // transition delay).
    bmc.power_off(&ctx, SYSTEM_URI).await.unwrap();
    let server = bmc.get_system_info(&ctx, SYSTEM_URI).await.unwrap();
    assert_eq!(server.power_state, PowerState::Off);
}

#[tokio::test]
async fn power_on_twice_in_a_row_is_idempotent() {
    let bmc = bmc_with(fast_config());
    let ctx = Context::background();

    bmc.power_on(&ctx, SYSTEM_URI).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::On)
        .await
        .unwrap();

    // Second PowerOn against a Server already On must also complete
    // without error and without changing state.
    bmc.power_on(&ctx, SYSTEM_URI).await.unwrap();
    let server = bmc.get_system_info(&ctx, SYSTEM_URI).await.unwrap();
    assert_eq!(server.power_state, PowerState::On);
}

// Property 2: PXE-once self-clears after one On→Off→On cycle.
#[tokio::test]
async fn pxe_boot_once_clears_after_full_power_cycle() {
    let bmc = bmc_with(fast_config());
    let ctx = Context::background();

    bmc.set_pxe_boot_once(&ctx, SYSTEM_URI).await.unwrap();
    let staged = bmc.get_system_info(&ctx, SYSTEM_URI).await.unwrap();
    let boot = staged.boot.expect("Boot object must be present");
    assert_eq!(boot.target, BootSourceOverrideTarget::Pxe);

    bmc.power_on(&ctx, SYSTEM_URI).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::On)
        .await
        .unwrap();
    bmc.power_off(&ctx, SYSTEM_URI).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::Off)
        .await
        .unwrap();
    bmc.power_on(&ctx, SYSTEM_URI).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::On)
        .await
        .unwrap();

    // The override was consumed by the boot that happened as part of
    // the first PowerOn; settle a beat for the background task.
    settle(Duration::from_millis(20)).await;
    let after = bmc.get_system_info(&ctx, SYSTEM_URI).await.unwrap();
    let boot_after = after.boot.expect("Boot object must be present");
    assert_eq!(
        boot_after.enabled,
        bmc_fleet::model::boot::BootSourceOverrideEnabled::Disabled
    );
}
