use crate::value::{first_text, integer, text};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// TaskType
// ---------------------------------------------------------------------------

/// Kind of work a trip task represents.
///
/// Classified from the free-text label FMS attaches to each task. Labels that
/// match none of the known kinds are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskType {
    Delivery,
    Pickup,
    Linehaul,
    Other(String),
}

impl TaskType {
    /// Case-insensitive substring classification of an upstream type label.
    pub fn classify(label: &str) -> TaskType {
        let lower = label.trim().to_lowercase();
        if lower.contains("delivery") {
            TaskType::Delivery
        } else if lower.contains("pickup") {
            TaskType::Pickup
        } else if lower.contains("linehaul") || lower.contains("transfer") {
            TaskType::Linehaul
        } else {
            TaskType::Other(label.trim().to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TaskType::Delivery => "Delivery",
            TaskType::Pickup => "Pickup",
            TaskType::Linehaul => "Linehaul",
            TaskType::Other(label) if label.is_empty() => "Other",
            TaskType::Other(label) => label,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TaskType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TaskType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(TaskType::classify(&label))
    }
}

// ---------------------------------------------------------------------------
// TaskRecord
// ---------------------------------------------------------------------------

/// One trip task, normalized from an upstream task-list row.
///
/// Fields are private so that `complete` can never disagree with `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    #[serde(rename = "do")]
    order_number: String,
    #[serde(rename = "pro")]
    tracking_number: String,
    #[serde(rename = "pu")]
    pickup_number: String,
    #[serde(rename = "taskNo")]
    task_number: Option<i64>,
    #[serde(rename = "type")]
    task_type: TaskType,
    #[serde(rename = "status")]
    status_text: String,
    complete: bool,
}

impl TaskRecord {
    pub fn new(
        order_number: impl Into<String>,
        tracking_number: impl Into<String>,
        pickup_number: impl Into<String>,
        task_number: Option<i64>,
        task_type: TaskType,
        status_text: impl Into<String>,
    ) -> Self {
        let status_text = status_text.into().trim().to_string();
        let complete = is_complete_status(&status_text);
        Self {
            order_number: order_number.into(),
            tracking_number: tracking_number.into(),
            pickup_number: pickup_number.into(),
            task_number,
            task_type,
            status_text,
            complete,
        }
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    pub fn pickup_number(&self) -> &str {
        &self.pickup_number
    }

    pub fn task_number(&self) -> Option<i64> {
        self.task_number
    }

    pub fn task_type(&self) -> &TaskType {
        &self.task_type
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

pub fn is_complete_status(status_text: &str) -> bool {
    status_text.trim().to_lowercase() == "complete"
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize one upstream task-list row. Never fails.
///
/// Field fallback order: `order_no`; `tracking_no` then `pro_no`; `pu_no`
/// then `pickup_no`; `task_no`; `task_type_text` then `task_type`;
/// `status_text` then `status`.
pub fn normalize(raw: &Value) -> TaskRecord {
    let type_label = first_text(raw, &["task_type_text", "task_type"]);
    TaskRecord::new(
        text(raw, "order_no"),
        first_text(raw, &["tracking_no", "pro_no"]),
        first_text(raw, &["pu_no", "pickup_no"]),
        raw.get("task_no").and_then(integer),
        TaskType::classify(&type_label),
        first_text(raw, &["status_text", "status"]),
    )
}

pub fn normalize_all(rows: &[Value]) -> Vec<TaskRecord> {
    rows.iter().map(normalize).collect()
}
