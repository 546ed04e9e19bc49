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

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootSourceOverrideEnabled {
    Disabled,
    Once,
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootSourceOverrideTarget {
    None,
    Pxe,
    Hdd,
    Cd,
    UsbCd,
    BiosSetup,
    Usb,
    Utilities,
    Diags,
    UefiShell,
    UefiTarget,
    SDCard,
    UefiHttp,
    RemoteDrive,
    Floppy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootSourceOverrideMode {
    #[serde(rename = "UEFI")]
    Uefi,
    Legacy,
}

/// The `(Enabled, Target, Mode)` tuple applied to a Server's `Boot`
/// object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootOverride {
    #[serde(rename = "BootSourceOverrideEnabled")]
    pub enabled: BootSourceOverrideEnabled,
    #[serde(rename = "BootSourceOverrideTarget")]
    pub target: BootSourceOverrideTarget,
    #[serde(rename = "BootSourceOverrideMode", skip_serializing_if = "Option::is_none")]
    pub mode: Option<BootSourceOverrideMode>,
}

impl BootOverride {
    #[must_use]
    pub const fn once(target: BootSourceOverrideTarget, mode: Option<BootSourceOverrideMode>) -> Self {
        Self {
            enabled: BootSourceOverrideEnabled::Once,
            target,
            mode,
        }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: BootSourceOverrideEnabled::Disabled,
            target: BootSourceOverrideTarget::None,
            mode: None,
        }
    }
}
