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

//! Redfish `Task` and the Lenovo-specific `Job` variant (§3, §4.4.3,
//! Property 8).

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    New,
    Pending,
    Starting,
    Running,
    Suspended,
    Interrupted,
    Completed,
    Killed,
    Exception,
    Cancelling,
    Cancelled,
}

impl TaskState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Killed | Self::Exception | Self::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "OK")]
    Ok,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMessage {
    #[serde(rename = "MessageId")]
    pub message_id: String,
    #[serde(default, rename = "Message")]
    pub message: Option<String>,
    #[serde(default, rename = "MessageArgs")]
    pub message_args: Vec<String>,
}

/// A Redfish async operation handle (§3). Lenovo `Job`s are projected
/// into this same shape at the overlay boundary (§4.4.3, §9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(default, rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "TaskState")]
    pub task_state: TaskState,
    #[serde(rename = "TaskStatus")]
    pub task_status: TaskStatus,
    #[serde(default, rename = "PercentComplete")]
    pub percent_complete: Option<u8>,
    #[serde(default, rename = "StartTime")]
    pub start_time: Option<String>,
    #[serde(default, rename = "EndTime")]
    pub end_time: Option<String>,
    #[serde(default, rename = "Messages")]
    pub messages: Vec<TaskMessage>,
}

impl Task {
    const OPERATION_TRANSITIONED_TO_JOB: &'static str = "OperationTransitionedToJob";

    /// If this task's single message signals a Lenovo job handoff, the Job
    /// URI it points at.
    #[must_use]
    pub fn transitioned_job_uri(&self) -> Option<&str> {
        self.messages.iter().find_map(|message| {
            message
                .message_id
                .contains(Self::OPERATION_TRANSITIONED_TO_JOB)
                .then(|| message.message_args.first().map(String::as_str))
                .flatten()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    New,
    Scheduled,
    Running,
    Completed,
    Cancelled,
    Exception,
    Service,
    UserIntervention,
    Continue,
    Pending,
    Starting,
    Suspended,
    Interrupted,
    Killed,
    Cancelling,
}

impl JobState {
    /// Pure mapping used when projecting a Job to a Task (§4.4.3, §9).
    #[must_use]
    pub const fn to_task_state(self) -> TaskState {
        match self {
            Self::New => TaskState::New,
            Self::Pending | Self::Scheduled => TaskState::Pending,
            Self::Starting => TaskState::Starting,
            Self::Running | Self::Service | Self::UserIntervention | Self::Continue => {
                TaskState::Running
            }
            Self::Suspended => TaskState::Suspended,
            Self::Interrupted => TaskState::Interrupted,
            Self::Completed => TaskState::Completed,
            Self::Killed => TaskState::Killed,
            Self::Exception => TaskState::Exception,
            Self::Cancelling => TaskState::Cancelling,
            Self::Cancelled => TaskState::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "OK")]
    Ok,
    Warning,
    Critical,
}

impl JobStatus {
    #[must_use]
    pub const fn to_task_status(self) -> TaskStatus {
        match self {
            Self::Ok => TaskStatus::Ok,
            Self::Warning => TaskStatus::Warning,
            Self::Critical => TaskStatus::Critical,
        }
    }
}

/// Lenovo XCC's Task variant (§3, glossary).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(default, rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "JobState")]
    pub job_state: JobState,
    #[serde(rename = "JobStatus")]
    pub job_status: JobStatus,
    #[serde(default, rename = "PercentComplete")]
    pub percent_complete: Option<u8>,
    #[serde(default, rename = "StartTime")]
    pub start_time: Option<String>,
    #[serde(default, rename = "EndTime")]
    pub end_time: Option<String>,
    #[serde(default, rename = "Messages")]
    pub messages: Vec<TaskMessage>,
}

/// Pure projection from a Lenovo `Job` onto the shared `Task` shape (§9:
/// "model both Task and Job as the same shape internally; the projection
/// is a pure function ... performed at the overlay boundary").
#[must_use]
pub fn job_to_task(job: &Job) -> Task {
    Task {
        id: job.id.clone(),
        odata_id: job.odata_id.clone(),
        description: job.description.clone(),
        task_state: job.job_state.to_task_state(),
        task_status: job.job_status.to_task_status(),
        percent_complete: job.percent_complete,
        start_time: job.start_time.clone(),
        end_time: job.end_time.clone(),
        messages: job.messages.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_projection_preserves_identity_and_maps_state() {
        let job = Job {
            id: "JID_1".into(),
            odata_id: "/redfish/v1/Managers/1/Jobs/JID_1".into(),
            description: Some("firmware update".into()),
            job_state: JobState::Completed,
            job_status: JobStatus::Ok,
            percent_complete: Some(100),
            start_time: Some("2026-01-01T00:00:00Z".into()),
            end_time: Some("2026-01-01T00:05:00Z".into()),
            messages: Vec::new(),
        };

        let task = job_to_task(&job);
        assert_eq!(task.id, job.id);
        assert_eq!(task.odata_id, job.odata_id);
        assert_eq!(task.task_state, TaskState::Completed);
        assert_eq!(task.task_status, TaskStatus::Ok);
    }

    #[test]
    fn transitioned_job_uri_extracts_message_arg() {
        let task = Task {
            id: "1".into(),
            odata_id: "/redfish/v1/TaskService/Tasks/1".into(),
            description: None,
            task_state: TaskState::Completed,
            task_status: TaskStatus::Ok,
            percent_complete: Some(100),
            start_time: None,
            end_time: None,
            messages: vec![TaskMessage {
                message_id: "Base.1.0.OperationTransitionedToJob".into(),
                message: None,
                message_args: vec!["/redfish/v1/Managers/1/Jobs/JID_5".into()],
            }],
        };
        assert_eq!(
            task.transitioned_job_uri(),
            Some("/redfish/v1/Managers/1/Jobs/JID_5")
        );
    }
}
