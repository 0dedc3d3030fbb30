//! Checks for job-id and bulk-insert calls.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::policy::MAX_INSERT_BATCH;
use crate::validation::is_truthy;

/// A job id must be supplied (non-empty string, number, or array of ids).
pub fn check_delete_args(id: &Value) -> Result<()> {
    if is_truthy(id) {
        Ok(())
    } else {
        Err(Error::invalid("Missing required argument: id"))
    }
}

/// Bulk insert takes an array of job objects.
pub fn check_insert_args(jobs: &Value) -> Result<&[Value]> {
    let jobs = jobs.as_array().ok_or_else(|| {
        Error::invalid(format!(
            "jobs argument should be an array. Received '{}'",
            type_name(jobs)
        ))
    })?;

    if jobs.len() > MAX_INSERT_BATCH {
        return Err(Error::invalid(format!(
            "insert() is limited to {} jobs at a time, got {}",
            MAX_INSERT_BATCH,
            jobs.len()
        )));
    }

    if let Some(index) = jobs.iter().position(|job| !job.is_object()) {
        return Err(Error::invalid(format!(
            "jobs[{}] should be an object",
            index
        )));
    }

    Ok(jobs)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
