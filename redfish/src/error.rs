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

//! The error taxonomy a BMC capability call can surface.
//!
//! Each tag below corresponds to one row of the error-handling table: the
//! variant name *is* the tag. Callers match on the variant rather than on
//! a string to decide whether to retry, rotate credentials, or give up.

use crate::model::attribute::AttributeError;

/// A single invalid `(name, value)` pair rejected during attribute
/// validation, with enough detail for a caller to report it to a user.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{name}: {reason}")]
pub struct AttributeCheckError {
    pub name: String,
    pub reason: String,
}

impl From<AttributeError> for AttributeCheckError {
    fn from(err: AttributeError) -> Self {
        Self {
            name: err.name,
            reason: err.reason,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// TCP/TLS/HTTP transport failure. Caller retries with backoff.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 401/403 from the BMC. Caller rotates credentials.
    #[error("authentication failed (status {status})")]
    Auth { status: u16 },

    /// 404 from the BMC, or a resource missing from the mock tree.
    #[error("not found: {0}")]
    NotFound(String),

    /// 412 ETag mismatch on a conditional write.
    #[error("precondition failed (etag mismatch) on {0}")]
    Precondition(String),

    /// Type, enum-membership, or registry violation. All offending keys
    /// are reported together (Property 5).
    #[error("invalid attribute(s): {}", join_attribute_errors(.0))]
    InvalidAttribute(Vec<AttributeCheckError>),

    /// The same attribute key appeared in two vendor collections (Dell).
    #[error("duplicate attribute key across collections: {0}")]
    DuplicateAttribute(String),

    /// A response was missing an expected field or had an unexpected
    /// shape.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// The firmware-upgrade POST did not return 202 Accepted. Fatal for
    /// this upgrade attempt; do not retry without human intervention.
    #[error("upgrade submission failed fatally (status {status}): {message}")]
    UpgradeSubmissionFatal { status: u16, message: String },

    /// The task/job reached a terminal non-success state.
    #[error("task reached terminal failure: {0}")]
    TaskTerminalFailure(String),

    /// This vendor does not expose the requested capability.
    #[error("unsupported on this vendor: {0}")]
    Unsupported(String),

    /// The call's [`crate::context::Context`] expired before the
    /// operation completed.
    #[error(transparent)]
    Expired(#[from] crate::context::Expired),
}

impl Error {
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Auth { status } => Some(*status),
            Self::UpgradeSubmissionFatal { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build an [`Error`] from an HTTP status code and response body,
    /// classifying it per the §7 taxonomy.
    #[must_use]
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Auth { status },
            404 => Self::NotFound(body.into()),
            412 => Self::Precondition(body.into()),
            _ => Self::ProtocolViolation(format!("unexpected status {status}: {}", body.into())),
        }
    }

    #[must_use]
    pub fn invalid_attributes(errors: Vec<AttributeCheckError>) -> Self {
        Self::InvalidAttribute(errors)
    }
}

fn join_attribute_errors(errors: &[AttributeCheckError]) -> String {
    errors
        .iter()
        .map(std::string::ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
