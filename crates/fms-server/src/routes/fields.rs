//! Reading required and optional fields out of an inbound action body.

use fms_core::checkin::TaskRef;
use fms_core::task::TaskType;
use fms_core::value::{integer, text};
use fms_core::FmsError;
use serde_json::Value;

/// Non-empty trimmed text at `key`, or `MissingField(key)`.
pub fn required_text(body: &Value, key: &str) -> Result<String, FmsError> {
    let value = text(body, key);
    if value.is_empty() {
        return Err(FmsError::MissingField(key.to_string()));
    }
    Ok(value)
}

pub fn optional_bool(body: &Value, key: &str) -> bool {
    match body.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Array at `key`; anything else is treated as empty.
pub fn optional_array(body: &Value, key: &str) -> Vec<Value> {
    body.get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// The task an action targets.
///
/// Read from the nested `task` object when present (`task.taskNo`,
/// `task.type`, `task.pro`), otherwise from the flat body (`taskNo`, `type`,
/// `pro`). A number or pro missing from `task` falls back to the flat body.
/// `fixed_type` overrides whatever type the caller sent.
pub fn task_ref(body: &Value, fixed_type: Option<TaskType>) -> Result<TaskRef, FmsError> {
    let (source, prefix) = match body.get("task") {
        Some(task) if task.is_object() => (task, "task."),
        _ => (body, ""),
    };

    let field = format!("{prefix}taskNo");
    let number_in = |v: &Value| {
        v.get("taskNo")
            .or_else(|| v.get("task_no"))
            .filter(|n| !n.is_null())
            .cloned()
    };
    let raw_no = number_in(source)
        .or_else(|| number_in(body))
        .ok_or_else(|| FmsError::MissingField(field.clone()))?;
    let task_number = integer(&raw_no).ok_or_else(|| FmsError::InvalidField {
        field,
        reason: format!("expected an integer, got {raw_no}"),
    })?;

    let task_type = fixed_type.unwrap_or_else(|| TaskType::classify(&text(source, "type")));
    let pro = match text(source, "pro") {
        p if p.is_empty() => text(body, "pro"),
        p => p,
    };

    Ok(TaskRef {
        task_number,
        task_type,
        pro,
    })
}
