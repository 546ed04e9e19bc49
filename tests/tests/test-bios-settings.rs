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
//! Integration tests of the BIOS pending/committed settings discipline
//! (§4.6) against the bundled `fooreboot` (`ResetRequired=true`) and
//! `abc` (`ResetRequired=false`) attributes.

use bmc_fleet::context::Context;
use bmc_fleet::model::attribute::ApplyTime;
use bmc_fleet::model::attribute::AttributeValue;
use bmc_fleet::model::attribute::SettingsAttributes;
use bmc_fleet::model::power::PowerState;
use bmc_fleet::model::power::ResetType;
use bmc_fleet::vendor::Manufacturer;
use bmc_fleet::BmcCapability;
use bmc_fleet::GenericBmc;
use bmc_fleet_mock::MockBackend;
use bmc_fleet_mock::MockConfig;
use bmc_fleet_mock::MockTree;
use std::sync::Arc;
use std::time::Duration;

const SYSTEM_URI: &str = "/redfish/v1/Systems/437XR1138R2";

fn bmc() -> GenericBmc<MockBackend> {
    let tree = Arc::new(MockTree::new());
    let config = MockConfig {
        power_transition_delay: Duration::from_millis(5),
        ..MockConfig::default()
    };
    GenericBmc::new(MockBackend::new(tree, config), Manufacturer::Generic)
}

fn one(name: &str, value: AttributeValue) -> SettingsAttributes {
    let mut attrs = SettingsAttributes::new();
    attrs.insert(name, value);
    attrs
}

// Scenario 2 / Property 3: a ResetRequired attribute is staged, not
// committed, until a full Off→On power cycle.
#[tokio::test]
async fn reset_required_attribute_stays_pending_until_power_cycle() {
    let bmc = bmc();
    let ctx = Context::background();
    let names = vec!["fooreboot".to_string()];

    let seed = bmc.get_bios_attribute_values(&ctx, SYSTEM_URI, &names).await.unwrap();
    assert_eq!(seed.get("fooreboot"), Some(&AttributeValue::Int(123)));

    bmc.set_bios_attributes_on_reset(&ctx, SYSTEM_URI, one("fooreboot", AttributeValue::Int(456)), ApplyTime::OnReset)
        .await
        .unwrap();

    let pending = bmc.get_bios_pending_attribute_values(&ctx, SYSTEM_URI).await.unwrap();
    assert_eq!(pending.get("fooreboot"), Some(&AttributeValue::Int(456)));
    let still_committed = bmc.get_bios_attribute_values(&ctx, SYSTEM_URI, &names).await.unwrap();
    assert_eq!(still_committed.get("fooreboot"), Some(&AttributeValue::Int(123)));

    // Off -> On is the gate event that commits the staged value.
    bmc.power_on(&ctx, SYSTEM_URI).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::On).await.unwrap();
    bmc.power_off(&ctx, SYSTEM_URI).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::Off).await.unwrap();
    bmc.power_on(&ctx, SYSTEM_URI).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::On).await.unwrap();

    let committed = bmc.get_bios_attribute_values(&ctx, SYSTEM_URI, &names).await.unwrap();
    assert_eq!(committed.get("fooreboot"), Some(&AttributeValue::Int(456)));
    let pending_after = bmc.get_bios_pending_attribute_values(&ctx, SYSTEM_URI).await.unwrap();
    assert!(pending_after.is_empty());
}

// Property 3, via reset() rather than power_on(): any ResetType that
// settles On (ForceOn here) is just as much the Off→On gate event as
// power_on()'s own ResetType::On.
#[tokio::test]
async fn reset_required_attribute_commits_via_force_on_reset() {
    let bmc = bmc();
    let ctx = Context::background();
    let names = vec!["fooreboot".to_string()];

    bmc.set_bios_attributes_on_reset(&ctx, SYSTEM_URI, one("fooreboot", AttributeValue::Int(456)), ApplyTime::OnReset)
        .await
        .unwrap();
    let pending = bmc.get_bios_pending_attribute_values(&ctx, SYSTEM_URI).await.unwrap();
    assert_eq!(pending.get("fooreboot"), Some(&AttributeValue::Int(456)));

    bmc.reset(&ctx, SYSTEM_URI, ResetType::ForceOn).await.unwrap();
    bmc.wait_for_server_power_state(&ctx, SYSTEM_URI, PowerState::On).await.unwrap();

    let committed = bmc.get_bios_attribute_values(&ctx, SYSTEM_URI, &names).await.unwrap();
    assert_eq!(committed.get("fooreboot"), Some(&AttributeValue::Int(456)));
    let pending_after = bmc.get_bios_pending_attribute_values(&ctx, SYSTEM_URI).await.unwrap();
    assert!(pending_after.is_empty());
}

// Scenario 3 / Property 4: a ResetRequired=false attribute applies
// immediately and never touches pending.
#[tokio::test]
async fn no_reset_attribute_applies_immediately() {
    let bmc = bmc();
    let ctx = Context::background();
    let names = vec!["abc".to_string()];

    let seed = bmc.get_bios_attribute_values(&ctx, SYSTEM_URI, &names).await.unwrap();
    assert_eq!(seed.get("abc"), Some(&AttributeValue::Str("bar".to_string())));

    bmc.set_bios_attributes_on_reset(&ctx, SYSTEM_URI, one("abc", AttributeValue::Str("baz".into())), ApplyTime::Immediate)
        .await
        .unwrap();

    let committed = bmc.get_bios_attribute_values(&ctx, SYSTEM_URI, &names).await.unwrap();
    assert_eq!(committed.get("abc"), Some(&AttributeValue::Str("baz".to_string())));
    let pending = bmc.get_bios_pending_attribute_values(&ctx, SYSTEM_URI).await.unwrap();
    assert!(pending.is_empty());
}

// Property 5: every invalid key in a batch is reported, none short-circuits
// the others.
#[tokio::test]
async fn check_bios_attributes_reports_every_invalid_key() {
    let bmc = bmc();
    let ctx = Context::background();

    let mut attrs = SettingsAttributes::new();
    attrs.insert("fooreboot", AttributeValue::Str("not-an-int".into()));
    attrs.insert("doesnotexist", AttributeValue::Int(1));

    let err = bmc
        .check_bios_attributes(&ctx, SYSTEM_URI, &attrs)
        .await
        .expect_err("both keys are invalid");
    let message = err.to_string();
    assert!(message.contains("fooreboot"), "message was: {message}");
    assert!(message.contains("doesnotexist"), "message was: {message}");
}

#[tokio::test]
async fn check_bios_attributes_flags_reset_required() {
    let bmc = bmc();
    let ctx = Context::background();
    let reset_required = bmc
        .check_bios_attributes(&ctx, SYSTEM_URI, &one("fooreboot", AttributeValue::Int(456)))
        .await
        .unwrap();
    assert!(reset_required);

    let no_reset = bmc
        .check_bios_attributes(&ctx, SYSTEM_URI, &one("abc", AttributeValue::Str("baz".into())))
        .await
        .unwrap();
    assert!(!no_reset);
}
