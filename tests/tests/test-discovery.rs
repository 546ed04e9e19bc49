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
//! Integration tests of the discovery operations beyond `GetSystemInfo`
//! (§4.1): `GetStorages`, `GetProcessors`.

use bmc_fleet::context::Context;
use bmc_fleet::vendor::Manufacturer;
use bmc_fleet::BmcCapability;
use bmc_fleet::GenericBmc;
use bmc_fleet_mock::MockBackend;
use bmc_fleet_mock::MockConfig;
use bmc_fleet_mock::MockTree;
use std::sync::Arc;

const SYSTEM_URI: &str = "/redfish/v1/Systems/437XR1138R2";

fn bmc() -> GenericBmc<MockBackend> {
    let tree = Arc::new(MockTree::new());
    GenericBmc::new(MockBackend::new(tree, MockConfig::default()), Manufacturer::Generic)
}

#[tokio::test]
async fn get_storages_lists_the_bundled_controller() {
    let bmc = bmc();
    let ctx = Context::background();

    let storages = bmc.get_storages(&ctx, SYSTEM_URI).await.unwrap();
    assert_eq!(storages.len(), 1);
    assert_eq!(storages[0].id, "1");
    assert_eq!(storages[0].drives.len(), 1);
}

#[tokio::test]
async fn get_processors_lists_the_bundled_cpu() {
    let bmc = bmc();
    let ctx = Context::background();

    let processors = bmc.get_processors(&ctx, SYSTEM_URI).await.unwrap();
    assert_eq!(processors.len(), 1);
    assert_eq!(processors[0].id, "CPU1");
    assert_eq!(processors[0].total_cores, Some(8));
}
