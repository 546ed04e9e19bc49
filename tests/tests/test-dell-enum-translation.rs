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
//! Scenario 5: Dell's `ValueDisplayName` -> `ValueName` translation for a
//! `Boot.1.Mode` enumeration with both `Uefi`/`UEFI` and `Bios`/`Legacy`
//! members. No bundled mock fixture carries Dell attribute collections
//! (Dell's multi-collection merge has its own dedicated unit coverage in
//! `bmc-fleet`), so this registry is built by hand to isolate the pure
//! translation step `GetBMCAttributeValues` relies on.

use bmc_fleet::model::attribute::Attribute;
use bmc_fleet::model::attribute::AttributeRegistry;
use bmc_fleet::model::attribute::AttributeType;
use bmc_fleet::model::attribute::AttributeValue;
use bmc_fleet::model::attribute::EnumChoice;
use bmc_fleet::vendor::dell;
use std::collections::HashMap;

fn boot_mode_registry() -> AttributeRegistry {
    let mut registry = AttributeRegistry::default();
    registry.insert(
        "Boot.1.Mode",
        Attribute {
            attribute_type: AttributeType::Enumeration,
            read_only: false,
            immutable: false,
            hidden: false,
            reset_required: true,
            allowed_values: vec![
                EnumChoice {
                    value_name: "Uefi".to_string(),
                    value_display_name: "UEFI".to_string(),
                },
                EnumChoice {
                    value_name: "Bios".to_string(),
                    value_display_name: "Legacy".to_string(),
                },
            ],
            current_value: Some(AttributeValue::Str("Uefi".to_string())),
        },
    );
    registry
}

#[test]
fn display_name_translates_to_wire_value_name() {
    let registry = boot_mode_registry();
    let mut requested = HashMap::new();
    requested.insert("Boot.1.Mode".to_string(), "Legacy".to_string());

    let (settled, errors) = dell::translate_display_names(&registry, &requested);
    assert!(errors.is_empty());
    // GetBMCAttributeValues must hand back the wire ValueName ("Bios"),
    // never the design-time display name ("Legacy").
    assert_eq!(settled.get("Boot.1.Mode"), Some(&AttributeValue::Str("Bios".to_string())));
}

#[test]
fn current_wire_value_is_not_a_display_name() {
    let registry = boot_mode_registry();
    let current = registry.get("Boot.1.Mode").unwrap().current_value.as_ref().unwrap();
    assert_eq!(current, &AttributeValue::Str("Uefi".to_string()));
    assert_ne!(current, &AttributeValue::Str("UEFI".to_string()));
}
