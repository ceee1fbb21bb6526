use serde_json::Value;
use std::str::FromStr;

use crate::errors::UnknownStatusError;

/// A single homework record as reported by the review service.
///
/// The record is kept exactly as received. Its fields are only interpreted
/// when the record is formatted, so an odd record does not affect the others.
#[derive(Debug, Clone, PartialEq)]
pub struct Homework(Value);

impl Homework {
    pub fn name(&self) -> Option<&Value> {
        self.field("homework_name")
    }

    pub fn status(&self) -> Option<&Value> {
        self.field("status")
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    // `null` counts as absent
    fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }
}

impl From<Value> for Homework {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Review outcome of a homework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Canned sentence sent to the chat for this status
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Review checked: reviewer liked everything. Hooray!",
            HomeworkStatus::Reviewing => "Homework has been taken for review.",
            HomeworkStatus::Rejected => "Review checked: reviewer left some remarks.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatusError(Some(s.to_string())))
    }
}
