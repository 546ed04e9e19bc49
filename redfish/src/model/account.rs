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

//! BMC local-user accounts (§4.6, §6).

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEnabled {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
}

/// A single row of `AccountService/Accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "RoleId")]
    pub role_id: String,
    #[serde(default, rename = "Enabled")]
    pub enabled: bool,
    #[serde(default, rename = "Locked")]
    pub locked: bool,
}

impl Account {
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.role_id == "Administrator"
    }
}

/// `AccountService` singleton: policy knobs plus the account collection
/// itself (kept separate from `Account` since most vendors expose it as
/// its own resource with its own ETag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountService {
    #[serde(default, rename = "MinPasswordLength")]
    pub min_password_length: Option<u32>,
    #[serde(default, rename = "AccountLockoutThreshold")]
    pub account_lockout_threshold: Option<u32>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl AccountService {
    #[must_use]
    pub fn find(&self, user_name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.user_name == user_name)
    }

    /// The first account row with an empty `UserName`, the conventional
    /// free slot a new account is created into on BMCs that preallocate a
    /// fixed-size account table.
    #[must_use]
    pub fn first_free_slot(&self) -> Option<&Account> {
        self.accounts.iter().find(|account| account.user_name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(user_name: &str, role_id: &str) -> Account {
        Account {
            id: "1".into(),
            odata_id: "/redfish/v1/AccountService/Accounts/1".into(),
            user_name: user_name.into(),
            role_id: role_id.into(),
            enabled: true,
            locked: false,
        }
    }

    #[test]
    fn find_locates_account_by_user_name() {
        let service = AccountService {
            min_password_length: None,
            account_lockout_threshold: None,
            accounts: vec![account("root", "Administrator"), account("monitor", "ReadOnly")],
        };
        assert!(service.find("monitor").is_some());
        assert!(service.find("nobody").is_none());
    }

    #[test]
    fn first_free_slot_skips_occupied_rows() {
        let service = AccountService {
            min_password_length: None,
            account_lockout_threshold: None,
            accounts: vec![account("root", "Administrator"), account("", "")],
        };
        assert_eq!(service.first_free_slot().unwrap().id, "1");
    }
}
