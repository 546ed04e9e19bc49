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

/// A Server's power state, as reported by `Systems/<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    On,
    Off,
    Paused,
    PoweringOn,
    PoweringOff,
}

/// `ComputerSystem.Reset` / `Manager.Reset` action parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetType {
    On,
    ForceOff,
    GracefulShutdown,
    GracefulRestart,
    ForceRestart,
    Nmi,
    ForceOn,
    PushPowerButton,
    PowerCycle,
}

impl ResetType {
    /// The power state a successful reset of this kind eventually settles
    /// into, when one is well-defined (used by callers composing
    /// `Reset` + `WaitForServerPowerState`).
    #[must_use]
    pub const fn target_power_state(self) -> Option<PowerState> {
        match self {
            Self::On | Self::ForceOn | Self::GracefulRestart | Self::ForceRestart | Self::PowerCycle => {
                Some(PowerState::On)
            }
            Self::ForceOff | Self::GracefulShutdown => Some(PowerState::Off),
            Self::Nmi | Self::PushPowerButton => None,
        }
    }
}
