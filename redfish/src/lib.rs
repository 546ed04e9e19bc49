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

//! Vendor-abstracted fleet management over Redfish.
//!
//! This crate defines the [`BmcCapability`] trait every connected BMC
//! answers, regardless of manufacturer, and [`GenericBmc`], the single
//! implementation of it: one indirect call per operation, vendor quirks
//! resolved once at [`connect`] time rather than re-checked on every call.
//!
//! Nothing here assumes a particular transport: [`backend::Backend`] is the
//! narrow HTTP seam [`GenericBmc`] is built on, implemented once against
//! `reqwest` (behind the `reqwest` feature) and again, in-process, by the
//! mock crate used in tests.

pub mod backend;
pub mod bmc;
pub mod capability;
pub mod connection;
pub mod context;
pub mod error;
pub mod model;
pub mod password;
pub mod registration;
pub mod settings;
pub mod upgrade;
pub mod vendor;

#[doc(inline)]
pub use backend::Backend;
#[doc(inline)]
pub use backend::HttpResponse;
#[doc(inline)]
pub use backend::TransportError;
#[doc(inline)]
pub use bmc::GenericBmc;
#[doc(inline)]
pub use capability::BmcCapability;
#[doc(inline)]
pub use capability::VirtualMediaStatus;
#[cfg(feature = "reqwest")]
#[doc(inline)]
pub use connection::connect;
#[doc(inline)]
pub use connection::BmcHandle;
#[doc(inline)]
pub use connection::ConnectParams;
#[doc(inline)]
pub use connection::Protocol;
#[doc(inline)]
pub use context::CancelHandle;
#[doc(inline)]
pub use context::Context;
#[doc(inline)]
pub use context::Expired;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use error::Result;
#[doc(inline)]
pub use registration::DeleteOutcome;
#[doc(inline)]
pub use registration::RegisterRequest;
#[doc(inline)]
pub use registration::ServerRecord;
#[doc(inline)]
pub use settings::SettingsLedger;
#[doc(inline)]
pub use upgrade::UpgradeOutcome;
#[doc(inline)]
pub use upgrade::UpgradeParams;
#[doc(inline)]
pub use vendor::Manufacturer;
