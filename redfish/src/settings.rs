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

//! The pending/committed discipline shared by real-BMC attribute tracking
//! and the mock's per-tenant state (§4.6, Properties 3/4).
//!
//! A key staged with `ResetRequired=true` shadows the committed value's
//! *effective* realization without mutating the committed map, until the
//! gate event ([`SettingsLedger::commit_pending`]) fires.

use crate::model::attribute::SettingsAttributes;

#[derive(Debug, Clone, Default)]
pub struct SettingsLedger {
    committed: SettingsAttributes,
    pending: SettingsAttributes,
}

impl SettingsLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seeded(committed: SettingsAttributes) -> Self {
        Self {
            committed,
            pending: SettingsAttributes::new(),
        }
    }

    #[must_use]
    pub const fn committed(&self) -> &SettingsAttributes {
        &self.committed
    }

    #[must_use]
    pub const fn pending(&self) -> &SettingsAttributes {
        &self.pending
    }

    /// Stage a `ResetRequired=true` change: visible from
    /// [`Self::pending`], invisible from [`Self::committed`] (Property 3).
    pub fn stage(&mut self, attrs: SettingsAttributes) {
        self.pending = self.pending.overlaid_with(&attrs);
    }

    /// Apply a `ResetRequired=false` change directly (Property 4): no
    /// staging, takes effect immediately, pending is left untouched.
    pub fn apply_immediately(&mut self, attrs: SettingsAttributes) {
        self.committed = self.committed.overlaid_with(&attrs);
    }

    /// The gate event: a server Off→On cycle or a Manager reset. Moves
    /// every staged key into committed and clears pending.
    pub fn commit_pending(&mut self) {
        self.committed = self.committed.overlaid_with(&self.pending);
        self.pending = SettingsAttributes::new();
    }

    /// `committed` with any staged keys overlaid, i.e. what a caller would
    /// observe if pending were already applied. Not part of the spec's
    /// read surface directly, but useful for vendors (HPE/Lenovo) whose
    /// read-back echoes the requested fragment regardless of apply time.
    #[must_use]
    pub fn effective(&self) -> SettingsAttributes {
        self.committed.overlaid_with(&self.pending)
    }
}
