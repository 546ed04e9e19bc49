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

//! Cancellation + deadline, carried on every suspending [`crate::capability::BmcCapability`]
//! call.
//!
//! Every HTTP round-trip and every polling wait (§5 of the design) races
//! against both a deadline and an out-of-band cancellation flag. This is
//! deliberately smaller than `tokio_util::sync::CancellationToken`: nothing
//! else in the workspace pulls in `tokio-util`, so a plain atomic flag is
//! used instead.

use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// Why a call returned before its future resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Expired {
    /// The context's deadline elapsed.
    #[error("operation deadline exceeded")]
    Deadline,
    /// The context was explicitly cancelled.
    #[error("operation cancelled")]
    Cancelled,
}

/// Cancellation + deadline passed to every [`crate::capability::BmcCapability`] operation.
#[derive(Clone)]
pub struct Context {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl Context {
    /// A context with no deadline and no cancellation: suitable for tests
    /// and for callers who manage timeouts themselves.
    #[must_use]
    pub fn background() -> Self {
        Self {
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Derive a child context sharing this context's cancellation flag but
    /// bounded additionally by `timeout` (the tighter of the two deadlines
    /// wins).
    #[must_use]
    pub fn narrowed(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < candidate => Some(existing),
            _ => Some(candidate),
        };
        Self {
            deadline,
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Obtain a handle that can cancel this context (and every context
    /// derived from it via [`Self::narrowed`]) from another task.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Run `fut` to completion unless the context expires first.
    ///
    /// # Errors
    ///
    /// Returns [`Expired`] if the deadline elapses or the context is
    /// cancelled before `fut` resolves.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, Expired>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(Expired::Cancelled);
        }

        let watch_cancel = {
            let cancelled = Arc::clone(&self.cancelled);
            async move {
                loop {
                    if cancelled.load(Ordering::SeqCst) {
                        return;
                    }
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
            }
        };

        let guarded = async {
            tokio::select! {
                biased;
                () = watch_cancel => Err(Expired::Cancelled),
                value = fut => Ok(value),
            }
        };

        match self.remaining() {
            Some(remaining) => tokio::time::timeout(remaining, guarded)
                .await
                .unwrap_or(Err(Expired::Deadline)),
            None => guarded.await,
        }
    }
}

/// Cancels a [`Context`] (and anything derived from it) from another task.
#[derive(Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
