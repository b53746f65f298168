//! Task categorization enums and boundary validation rules.
//!
//! The API accepts loosely typed JSON; everything here turns raw strings
//! into checked domain values before a store is touched.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Entity name used in not-found errors and log fields.
pub const TASK_ENTITY: &str = "Task";

/// Wire format for `dueDate`.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Workflow state of a task. Stored as text (`todo`, `in_progress`, `done`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{s}'; expected one of: todo, in_progress, done"
                ))
            })
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Relative importance of a task. Stored as text (`low`, `medium`, `high`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid priority '{s}'; expected one of: low, medium, high"
                ))
            })
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Return the trimmed title, or `None` when it is missing or blank.
///
/// Creation turns `None` into a validation error; updates treat it as
/// "keep the current title".
pub fn normalize_title(title: Option<&str>) -> Option<String> {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Require a non-blank title.
pub fn validate_title(title: Option<&str>) -> Result<String, CoreError> {
    normalize_title(title).ok_or_else(|| CoreError::Validation("Title is required".into()))
}

/// Empty descriptions are stored as `NULL`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

/// Parse an optional `YYYY-MM-DD` due date. `None` and `""` both mean "no date".
pub fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DUE_DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                CoreError::Validation(format!(
                    "Invalid dueDate '{value}'; expected a YYYY-MM-DD date"
                ))
            }),
    }
}

/// Parse a task id taken from a URL path.
///
/// Anything that is not a positive integer cannot name a stored task, so it
/// is reported as not found rather than as a separate error class.
pub fn parse_task_id(raw: &str) -> Result<DbId, CoreError> {
    raw.parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::NotFound {
            entity: TASK_ENTITY,
            id: raw.to_string(),
        })
}
