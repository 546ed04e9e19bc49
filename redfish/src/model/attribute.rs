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

//! Typed BIOS/BMC attributes, their registries, and the validation
//! algorithm shared by `CheckBiosAttributes`/`CheckBMCAttributes` (§4.3).

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// The four wire types an attribute value can take. Kept as a typed sum
/// rather than `serde_json::Value` so JSON decoding chooses the variant
/// using the registry's declared type (§9), not ad-hoc type sniffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Bool(bool),
    /// Shared representation for both `String` and `Enumeration` types;
    /// which one applies is determined by the registry entry.
    Str(String),
}

impl AttributeValue {
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Int(_) => "Integer",
            Self::Bool(_) => "Boolean",
            Self::Str(_) => "String",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    Integer,
    String,
    Enumeration,
    Boolean,
}

impl AttributeType {
    /// Whether `value` is a runtime-type match for this declared type.
    #[must_use]
    pub const fn matches(self, value: &AttributeValue) -> bool {
        matches!(
            (self, value),
            (Self::Integer, AttributeValue::Int(_))
                | (Self::Boolean, AttributeValue::Bool(_))
                | (Self::String, AttributeValue::Str(_))
                | (Self::Enumeration, AttributeValue::Str(_))
        )
    }
}

/// One allowed value of an `Enumeration` attribute: the wire-time
/// `ValueName` and the design-time `ValueDisplayName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumChoice {
    pub value_name: String,
    pub value_display_name: String,
}

/// The manufacturer-published schema entry for a single attribute name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub reset_required: bool,
    /// Allowed `(ValueName, ValueDisplayName)` pairs, populated only when
    /// `attribute_type == Enumeration`.
    #[serde(default)]
    pub allowed_values: Vec<EnumChoice>,
    /// The value currently committed on the BMC, if known.
    #[serde(default)]
    pub current_value: Option<AttributeValue>,
}

impl Attribute {
    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        !self.read_only && !self.immutable && !self.hidden
    }

    #[must_use]
    pub fn display_name_to_value_name(&self, display_name: &str) -> Option<&str> {
        self.allowed_values
            .iter()
            .find(|choice| choice.value_display_name == display_name)
            .map(|choice| choice.value_name.as_str())
    }
}

/// A manufacturer-published schema mapping attribute names to descriptors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeRegistry {
    #[serde(flatten)]
    entries: BTreeMap<String, Attribute>,
}

impl AttributeRegistry {
    #[must_use]
    pub fn new(entries: BTreeMap<String, Attribute>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.entries.insert(name.into(), attribute);
    }

    /// Merge `other` into `self`, returning the first key present in both
    /// as a duplicate-key error (Dell multi-collection merge, §4.4.1).
    pub fn merge(&mut self, other: Self) -> Result<(), String> {
        for (name, attribute) in other.entries {
            if self.entries.contains_key(&name) {
                return Err(name);
            }
            self.entries.insert(name, attribute);
        }
        Ok(())
    }

    /// Every entry, regardless of mutability.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.entries.iter().map(|(name, attribute)| (name.as_str(), attribute))
    }

    /// Entries filtered to `(ReadOnly=false, Immutable=false, Hidden=false)`.
    pub fn mutable(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.entries
            .iter()
            .filter(|(_, attribute)| attribute.is_mutable())
            .map(|(name, attribute)| (name.as_str(), attribute))
    }

    /// `CheckBiosAttributes`/`CheckBMCAttributes` (§4.3): validate every
    /// supplied `(name, value)` against the mutable-visible subset of this
    /// registry. Returns whether applying the change requires a reset, and
    /// every invalid key (Property 5: none short-circuits).
    #[must_use]
    pub fn check(&self, attrs: &SettingsAttributes) -> (bool, Vec<AttributeError>) {
        let mut reset_required = false;
        let mut errors = Vec::new();

        for (name, value) in attrs.iter() {
            let Some(attribute) = self.get(name).filter(|a| a.is_mutable()) else {
                errors.push(AttributeError {
                    name: name.clone(),
                    reason: "not-found-or-immutable-or-hidden".to_string(),
                });
                continue;
            };

            if !attribute.attribute_type.matches(value) {
                errors.push(AttributeError {
                    name: name.clone(),
                    reason: format!(
                        "type mismatch: registry declares {:?}, value is {}",
                        attribute.attribute_type,
                        value.type_tag()
                    ),
                });
                continue;
            }

            if attribute.attribute_type == AttributeType::Enumeration {
                let as_str = value.as_str().unwrap_or_default();
                let allowed = attribute
                    .allowed_values
                    .iter()
                    .any(|choice| choice.value_name == as_str);
                if !allowed {
                    errors.push(AttributeError {
                        name: name.clone(),
                        reason: format!("{as_str} is not an allowed enumeration value"),
                    });
                    continue;
                }
            }

            if attribute.reset_required {
                reset_required = true;
            }
        }

        (reset_required, errors)
    }

    /// Splits a supplied batch into the subset that applies immediately
    /// (`ResetRequired=false`) and the subset that must be staged
    /// (`ResetRequired=true`), alongside any invalid keys (§4.6).
    #[must_use]
    pub fn partition_by_reset_required(
        &self,
        attrs: &SettingsAttributes,
    ) -> (SettingsAttributes, SettingsAttributes, Vec<AttributeError>) {
        let mut immediate = SettingsAttributes::new();
        let mut staged = SettingsAttributes::new();
        let mut errors = Vec::new();

        for (name, value) in attrs.iter() {
            let Some(attribute) = self.get(name).filter(|a| a.is_mutable()) else {
                errors.push(AttributeError {
                    name: name.clone(),
                    reason: "not-found-or-immutable-or-hidden".to_string(),
                });
                continue;
            };
            if !attribute.attribute_type.matches(value) {
                errors.push(AttributeError {
                    name: name.clone(),
                    reason: format!(
                        "type mismatch: registry declares {:?}, value is {}",
                        attribute.attribute_type,
                        value.type_tag()
                    ),
                });
                continue;
            }
            if attribute.reset_required {
                staged.insert(name.clone(), value.clone());
            } else {
                immediate.insert(name.clone(), value.clone());
            }
        }

        (immediate, staged, errors)
    }
}

/// One invalid `(name, value)` pair surfaced by [`AttributeRegistry::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeError {
    pub name: String,
    pub reason: String,
}

/// An unordered map from attribute name to value (§3 invariants: unique
/// keys, runtime type matches the registry, enum membership validated
/// separately by [`AttributeRegistry::check`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsAttributes(BTreeMap<String, AttributeValue>);

impl SettingsAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.0.iter()
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    /// Merge `other` on top of `self`: later values win (used to compute
    /// effective state when layering a pending map over committed).
    #[must_use]
    pub fn overlaid_with(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self(merged)
    }
}

impl FromIterator<(String, AttributeValue)> for SettingsAttributes {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Redfish `@Redfish.SettingsApplyTime.ApplyTime` sentinels (§6), sent
/// verbatim on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyTime {
    Immediate,
    OnReset,
    AtMaintenanceWindowStart,
    InMaintenanceWindowOnReset,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(name: &str, attribute_type: AttributeType, reset_required: bool) -> AttributeRegistry {
        let mut registry = AttributeRegistry::default();
        registry.insert(
            name,
            Attribute {
                attribute_type,
                read_only: false,
                immutable: false,
                hidden: false,
                reset_required,
                allowed_values: Vec::new(),
                current_value: Some(AttributeValue::Int(123)),
            },
        );
        registry
    }

    #[test]
    fn check_reports_every_invalid_key_exactly_once() {
        let registry = registry_with("fooreboot", AttributeType::Integer, true);
        let mut attrs = SettingsAttributes::new();
        attrs.insert("fooreboot", AttributeValue::Str("not-an-int".into()));
        attrs.insert("doesnotexist", AttributeValue::Int(1));

        let (_, errors) = registry.check(&attrs);
        assert_eq!(errors.len(), 2);
        let names: Vec<_> = errors.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"fooreboot"));
        assert!(names.contains(&"doesnotexist"));
    }

    #[test]
    fn check_flags_reset_required() {
        let registry = registry_with("fooreboot", AttributeType::Integer, true);
        let mut attrs = SettingsAttributes::new();
        attrs.insert("fooreboot", AttributeValue::Int(456));
        let (reset_required, errors) = registry.check(&attrs);
        assert!(errors.is_empty());
        assert!(reset_required);
    }

    #[test]
    fn check_no_reset_required_for_immediate_attribute() {
        let registry = registry_with("abc", AttributeType::String, false);
        let mut attrs = SettingsAttributes::new();
        attrs.insert("abc", AttributeValue::Str("baz".into()));
        let (reset_required, errors) = registry.check(&attrs);
        assert!(errors.is_empty());
        assert!(!reset_required);
    }

    #[test]
    fn partition_by_reset_required_splits_batch() {
        let mut registry = AttributeRegistry::default();
        registry.insert("fooreboot", Attribute {
            attribute_type: AttributeType::Integer,
            read_only: false,
            immutable: false,
            hidden: false,
            reset_required: true,
            allowed_values: Vec::new(),
            current_value: None,
        });
        registry.insert("abc", Attribute {
            attribute_type: AttributeType::String,
            read_only: false,
            immutable: false,
            hidden: false,
            reset_required: false,
            allowed_values: Vec::new(),
            current_value: None,
        });
        let mut attrs = SettingsAttributes::new();
        attrs.insert("fooreboot", AttributeValue::Int(456));
        attrs.insert("abc", AttributeValue::Str("baz".into()));

        let (immediate, staged, errors) = registry.partition_by_reset_required(&attrs);
        assert!(errors.is_empty());
        assert_eq!(immediate.get("abc"), Some(&AttributeValue::Str("baz".into())));
        assert_eq!(staged.get("fooreboot"), Some(&AttributeValue::Int(456)));
    }

    #[test]
    fn merge_detects_duplicate_keys() {
        let mut a = registry_with("Shared", AttributeType::Integer, false);
        let b = registry_with("Shared", AttributeType::Integer, false);
        let err = a.merge(b).expect_err("duplicate key must be rejected");
        assert_eq!(err, "Shared");
    }
}
