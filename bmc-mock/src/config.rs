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

//! Delay knobs for the mock's explicit suspension points (§5).

use std::time::Duration;

/// Configurable delays the mock uses to simulate asynchronous hardware
/// behavior. The defaults match §5; tests that care about wall-clock
/// time can shrink them.
#[derive(Debug, Clone, Copy)]
pub struct MockConfig {
    /// Delay before a power-state transition requested via
    /// `ComputerSystem.Reset` becomes visible on the `System` resource.
    pub power_transition_delay: Duration,
    /// Delay before a staged setting takes effect after the simulated
    /// Off→On/Manager-reset gate event.
    pub pending_apply_delay: Duration,
    /// Delay before the first upgrade-task step after submission.
    pub upgrade_initial_delay: Duration,
    /// Delay between each subsequent upgrade-task step.
    pub upgrade_step_delay: Duration,
    /// Grace period `shutdown` waits for in-flight requests before
    /// aborting them.
    pub shutdown_grace: Duration,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            power_transition_delay: Duration::from_millis(150),
            pending_apply_delay: Duration::from_millis(50),
            upgrade_initial_delay: Duration::from_millis(20),
            upgrade_step_delay: Duration::from_millis(5),
            shutdown_grace: Duration::from_millis(250),
        }
    }
}
