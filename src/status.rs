use serde_json::Value;

use crate::{
    errors::{PollError, SchemaError, UnknownStatusError},
    models::{Homework, HomeworkStatus},
};

/// Builds the chat message announcing a homework's review status.
///
/// # Errors
/// Fails with [`UnknownStatusError`] when the status is absent, not a string
/// or not one of the known codes, and with a missing-key [`SchemaError`] when
/// the record carries no name.
pub fn parse_status(homework: &Homework) -> Result<String, PollError> {
    let status: HomeworkStatus = match homework.status() {
        Some(Value::String(code)) => code.parse()?,
        Some(other) => return Err(UnknownStatusError(Some(other.to_string())).into()),
        None => return Err(UnknownStatusError(None).into()),
    };
    let name = match homework.name() {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => return Err(SchemaError::MissingKey("homework_name").into()),
    };

    Ok(format!(
        "Changed review status for \"{name}\". {}",
        status.verdict()
    ))
}
