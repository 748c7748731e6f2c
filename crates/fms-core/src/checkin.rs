//! Check-in and undo request building.
//!
//! FMS uses one task-complete endpoint for every task kind but expects a
//! slightly different body per kind, and reverting a linehaul leg goes to a
//! separate endpoint keyed by task number alone.

use crate::error::{FmsError, Result};
use crate::task::TaskType;
use crate::types::EvidenceAttachment;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// The task being checked in or reverted, as identified by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRef {
    pub task_number: i64,
    pub task_type: TaskType,
    /// PRO number; only sent for deliveries.
    pub pro: String,
}

/// Body of the task-complete call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletePayload {
    pub trip_no: String,
    pub task_no: i64,
    pub delivery_location: String,
    pub image_list: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pro_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_date: Option<String>,
}

/// Which upstream call reverts a check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoTarget {
    Cancel { trip_no: String, task_no: i64 },
    LinehaulRevert { task_no: i64 },
}

pub fn format_check_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn require_trip(trip_no: &str) -> Result<String> {
    let trip_no = trip_no.trim();
    if trip_no.is_empty() {
        return Err(FmsError::MissingField("tripNo".into()));
    }
    Ok(trip_no.to_string())
}

/// Build the task-complete body.
///
/// `image_list` carries caller-supplied entries verbatim followed by the
/// uploaded evidence. Linehaul check-ins never carry images.
pub fn complete_payload(
    trip_no: &str,
    task: &TaskRef,
    image_list: Vec<Value>,
    evidence: &[EvidenceAttachment],
    now: DateTime<Utc>,
) -> Result<CompletePayload> {
    let trip_no = require_trip(trip_no)?;

    let mut images = image_list;
    images.extend(
        evidence
            .iter()
            .filter_map(|a| serde_json::to_value(a).ok()),
    );

    let mut payload = CompletePayload {
        trip_no,
        task_no: task.task_number,
        delivery_location: String::new(),
        image_list: images,
        pro_number: None,
        check_date: None,
    };

    match task.task_type {
        TaskType::Delivery => {
            payload.pro_number = Some(task.pro.trim().to_string());
            payload.check_date = Some(format_check_date(now));
        }
        TaskType::Linehaul => payload.image_list.clear(),
        TaskType::Pickup | TaskType::Other(_) => {}
    }

    Ok(payload)
}

pub fn undo_target(trip_no: &str, task: &TaskRef) -> Result<UndoTarget> {
    match task.task_type {
        TaskType::Linehaul => Ok(UndoTarget::LinehaulRevert {
            task_no: task.task_number,
        }),
        _ => Ok(UndoTarget::Cancel {
            trip_no: require_trip(trip_no)?,
            task_no: task.task_number,
        }),
    }
}
