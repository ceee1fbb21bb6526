use serde_json::Value;

use crate::{errors::SchemaError, models::Homework};

const HOMEWORKS: &str = "homeworks";
const CURRENT_DATE: &str = "current_date";

/// Checks the shape of a review service payload and extracts its homeworks.
///
/// A `null` value counts as a missing key. An empty `homeworks` list is not
/// an error, it means nothing changed since the cursor. The records are
/// returned as received; their contents are checked when they are formatted.
pub fn check_response(response: &Value) -> Result<Vec<Homework>, SchemaError> {
    let Some(fields) = response.as_object() else {
        return Err(SchemaError::TypeMismatch(format!(
            "expected a JSON object, got {}",
            kind_of(response)
        )));
    };

    let homeworks = present(fields.get(HOMEWORKS)).ok_or(SchemaError::MissingKey(HOMEWORKS))?;
    present(fields.get(CURRENT_DATE)).ok_or(SchemaError::MissingKey(CURRENT_DATE))?;

    let Some(homeworks) = homeworks.as_array() else {
        return Err(SchemaError::TypeMismatch(format!(
            "`{HOMEWORKS}` should be a list, got {}",
            kind_of(homeworks)
        )));
    };

    if homeworks.is_empty() {
        tracing::debug!("Review status has not changed");
        return Ok(Vec::new());
    }

    Ok(homeworks.iter().cloned().map(Homework::from).collect())
}

/// The `current_date` of a payload, when it is an integer timestamp
pub fn current_date(response: &Value) -> Option<i64> {
    response.get(CURRENT_DATE).and_then(Value::as_i64)
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
