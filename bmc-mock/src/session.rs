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

//! Per-tenant mock state (§3 `MockSession`, §4.7, §5).
//!
//! The bundled `System`/`Manager` resources are shared, process-wide
//! hardware; a `MockSession` is the bookkeeping a single reconciler
//! client accumulates against them — its view of staged BIOS/BMC
//! settings and the firmware upgrade it has in flight. Keyed by the
//! HTTP Basic-auth username, as required by §4.7.

use bmc_fleet::SettingsLedger;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// One step of a firmware upgrade task in flight for a tenant.
#[derive(Debug, Clone)]
pub struct UpgradeRun {
    pub task_uri: String,
    pub step: usize,
    pub target_version: String,
}

/// Everything the mock remembers about one authenticated caller.
#[derive(Debug, Clone, Default)]
pub struct MockSession {
    pub bios: SettingsLedger,
    pub bmc: SettingsLedger,
    pub bios_upgrade: Option<UpgradeRun>,
    pub bmc_upgrade: Option<UpgradeRun>,
}

/// The process-wide table of per-tenant sessions, behind a single
/// reader/writer lock (§4.7: "a single process-wide reader/writer
/// lock — reads take shared access; power/settings transitions take
/// exclusive access").
#[derive(Default)]
pub struct SessionTable {
    sessions: RwLock<HashMap<String, MockSession>>,
}

impl SessionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access: read-only lookup, falling back to a session's
    /// default (empty) state for a tenant never seen before.
    pub async fn with<R>(&self, username: &str, f: impl FnOnce(&MockSession) -> R) -> R {
        let sessions = self.sessions.read().await;
        match sessions.get(username) {
            Some(session) => f(session),
            None => f(&MockSession::default()),
        }
    }

    /// Exclusive access: the tenant's entry is created on first write.
    pub async fn with_mut<R>(&self, username: &str, f: impl FnOnce(&mut MockSession) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(username.to_string()).or_default();
        f(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unseen_tenant_reads_as_default_session() {
        let table = SessionTable::new();
        let is_empty = table.with("nobody", |session| session.bios.pending().is_empty()).await;
        assert!(is_empty);
    }

    #[tokio::test]
    async fn per_tenant_state_does_not_leak_across_usernames() {
        let table = SessionTable::new();
        table
            .with_mut("alice", |session| {
                session.bios.stage(bmc_fleet::model::SettingsAttributes::new());
                session.bios_upgrade = Some(UpgradeRun {
                    task_uri: "/redfish/v1/TaskService/Tasks/1".to_string(),
                    step: 2,
                    target_version: "2.0.0".to_string(),
                });
            })
            .await;

        let bob_has_upgrade = table.with("bob", |session| session.bios_upgrade.is_some()).await;
        assert!(!bob_has_upgrade);

        let alice_has_upgrade = table.with("alice", |session| session.bios_upgrade.is_some()).await;
        assert!(alice_has_upgrade);
    }
}
