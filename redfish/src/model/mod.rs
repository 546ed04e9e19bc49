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

//! The fleet data model (§3): servers, managers, power/boot state,
//! attributes and their registries, async tasks/jobs, and accounts.

pub mod account;
pub mod attribute;
pub mod boot;
pub mod power;
pub mod server;
pub mod task;

pub use account::Account;
pub use account::AccountService;
pub use attribute::Attribute;
pub use attribute::AttributeRegistry;
pub use attribute::AttributeValue;
pub use attribute::SettingsAttributes;
pub use boot::BootOverride;
pub use power::PowerState;
pub use server::IndicatorLed;
pub use server::Manager;
pub use server::ODataRef;
pub use server::Processor;
pub use server::ResourceStatus;
pub use server::Server;
pub use server::Storage;
pub use task::Job;
pub use task::Task;
