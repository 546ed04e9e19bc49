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

//! The union of operations every vendor flavor must answer (§4.1).
//!
//! One polymorphic entity per connected BMC. The generic base supplies
//! defaults; each vendor overlay overrides the subset it needs to
//! (dispatch is resolved once, at connect time, by [`crate::connection`]),
//! so the per-call cost stays a single indirect call rather than a chain
//! of `is_dell()`/`is_hpe()` branches.

use crate::context::Context;
use crate::error::Result;
use crate::model::account::Account;
use crate::model::account::AccountService;
use crate::model::attribute::ApplyTime;
use crate::model::attribute::SettingsAttributes;
use crate::model::boot::BootSourceOverrideTarget;
use crate::model::power::PowerState;
use crate::model::power::ResetType;
use crate::model::server::Manager;
use crate::model::server::Processor;
use crate::model::server::Server;
use crate::model::server::Storage;
use crate::model::task::Task;
use crate::upgrade::UpgradeOutcome;
use crate::upgrade::UpgradeParams;
use std::future::Future;

/// A mounted virtual media device.
#[derive(Debug, Clone)]
pub struct VirtualMediaStatus {
    pub inserted: bool,
    pub image_url: Option<String>,
}

/// The operations a connected BMC answers, regardless of manufacturer.
///
/// Every method takes a [`Context`] first: every suspension point in the
/// implementation (HTTP round-trips, polling waits) races against it.
pub trait BmcCapability: Send + Sync {
    // -- Lifecycle (§4.1) --------------------------------------------------

    /// Releases the session. Idempotent; safe to call even when connect
    /// itself failed partway through.
    fn logout(&self, ctx: &Context) -> impl Future<Output = Result<()>> + Send;

    // -- Discovery -----------------------------------------------------------

    fn get_systems(&self, ctx: &Context) -> impl Future<Output = Result<Vec<Server>>> + Send;

    fn get_manager(&self, ctx: &Context, uuid: &str) -> impl Future<Output = Result<Manager>> + Send;

    fn get_system_info(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<Server>> + Send;

    /// Lists the storage controllers under `Systems/<id>/Storage`.
    fn get_storages(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<Vec<Storage>>> + Send;

    /// Lists the processors under `Systems/<id>/Processors`.
    fn get_processors(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<Vec<Processor>>> + Send;

    // -- Power (§4.1, §4.3, Property 1) --------------------------------------

    fn power_on(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<()>> + Send;

    fn power_off(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<()>> + Send;

    fn force_power_off(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<()>> + Send;

    fn reset(&self, ctx: &Context, uri: &str, reset_type: ResetType) -> impl Future<Output = Result<()>> + Send;

    /// Bounded poll of `GetSystemInfo` until `desired` is observed or the
    /// context expires (§5: 2s default interval).
    fn wait_for_server_power_state(
        &self,
        ctx: &Context,
        uri: &str,
        desired: PowerState,
    ) -> impl Future<Output = Result<()>> + Send;

    // -- Boot (§4.1, §4.3, §4.4.4, Property 2) -------------------------------

    fn set_pxe_boot_once(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<()>> + Send;

    fn set_boot_order(
        &self,
        ctx: &Context,
        uri: &str,
        order: Vec<String>,
    ) -> impl Future<Output = Result<()>> + Send;

    fn get_boot_order(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn set_virtual_media_boot_once(
        &self,
        ctx: &Context,
        uri: &str,
        target: BootSourceOverrideTarget,
    ) -> impl Future<Output = Result<()>> + Send;

    fn mount_virtual_media(
        &self,
        ctx: &Context,
        uri: &str,
        media_url: &str,
        slot_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn eject_virtual_media(&self, ctx: &Context, uri: &str, slot_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn get_virtual_media_status(
        &self,
        ctx: &Context,
        uri: &str,
        slot_id: &str,
    ) -> impl Future<Output = Result<VirtualMediaStatus>> + Send;

    // -- BIOS settings (§4.1, §4.6, Properties 3/4) --------------------------

    fn get_bios_attribute_values(
        &self,
        ctx: &Context,
        uri: &str,
        names: &[String],
    ) -> impl Future<Output = Result<SettingsAttributes>> + Send;

    fn get_bios_pending_attribute_values(
        &self,
        ctx: &Context,
        uri: &str,
    ) -> impl Future<Output = Result<SettingsAttributes>> + Send;

    fn check_bios_attributes(
        &self,
        ctx: &Context,
        uri: &str,
        attrs: &SettingsAttributes,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn set_bios_attributes_on_reset(
        &self,
        ctx: &Context,
        uri: &str,
        attrs: SettingsAttributes,
        apply_time: ApplyTime,
    ) -> impl Future<Output = Result<()>> + Send;

    fn get_bios_version(&self, ctx: &Context, uri: &str) -> impl Future<Output = Result<String>> + Send;

    // -- BMC settings, symmetrical with BIOS ---------------------------------

    fn get_bmc_attribute_values(
        &self,
        ctx: &Context,
        uri: &str,
        names: &[String],
    ) -> impl Future<Output = Result<SettingsAttributes>> + Send;

    fn get_bmc_pending_attribute_values(
        &self,
        ctx: &Context,
        uri: &str,
    ) -> impl Future<Output = Result<SettingsAttributes>> + Send;

    fn check_bmc_attributes(
        &self,
        ctx: &Context,
        uri: &str,
        attrs: &SettingsAttributes,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn set_bmc_attributes_immediately(
        &self,
        ctx: &Context,
        uri: &str,
        attrs: SettingsAttributes,
    ) -> impl Future<Output = Result<()>> + Send;

    // -- Firmware upgrade (§4.1, §4.5) ---------------------------------------

    fn upgrade_bios_version(
        &self,
        ctx: &Context,
        params: UpgradeParams,
    ) -> impl Future<Output = Result<UpgradeOutcome>> + Send;

    fn get_bios_upgrade_task(&self, ctx: &Context, task_uri: &str) -> impl Future<Output = Result<Task>> + Send;

    fn upgrade_bmc_version(
        &self,
        ctx: &Context,
        params: UpgradeParams,
    ) -> impl Future<Output = Result<UpgradeOutcome>> + Send;

    fn get_bmc_upgrade_task(&self, ctx: &Context, task_uri: &str) -> impl Future<Output = Result<Task>> + Send;

    // -- Accounts (§4.1, §9 credential rotation) -----------------------------

    fn create_or_update_account(
        &self,
        ctx: &Context,
        user_name: &str,
        password: &str,
        role_id: &str,
    ) -> impl Future<Output = Result<Account>> + Send;

    fn delete_account(&self, ctx: &Context, user_name: &str) -> impl Future<Output = Result<()>> + Send;

    fn get_accounts(&self, ctx: &Context) -> impl Future<Output = Result<Vec<Account>>> + Send;

    fn get_account_service(&self, ctx: &Context) -> impl Future<Output = Result<AccountService>> + Send;

    // -- Manager reset --------------------------------------------------------

    /// May asynchronously apply pending settings staged under
    /// `ResetRequired` (§4.6), for both the real BMC and the mock.
    fn reset_manager(&self, ctx: &Context, uuid: &str, reset_type: ResetType) -> impl Future<Output = Result<()>> + Send;
}
