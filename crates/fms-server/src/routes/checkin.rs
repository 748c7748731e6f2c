use axum::Json;
use chrono::Utc;
use fms_core::checkin::{complete_payload, undo_target};
use fms_core::task::TaskType;
use fms_core::types::UploadedFile;
use fms_core::value::text;
use serde_json::{json, Value};
use tracing::info;

use crate::error::AppError;
use crate::routes::fields::{optional_array, task_ref};
use crate::state::AppState;

/// action `checkin` (and the typed `checkin<Kind>` variants).
///
/// Evidence comes from `imageList` (sent verbatim) and `files`, a list of
/// previously uploaded files; entries of `files` that do not parse are skipped.
pub async fn checkin(
    app: &AppState,
    body: &Value,
    fixed_type: Option<TaskType>,
) -> Result<Json<Value>, AppError> {
    let task = task_ref(body, fixed_type)?;
    let trip_no = text(body, "tripNo");

    let evidence: Vec<_> = optional_array(body, "files")
        .into_iter()
        .filter_map(|f| serde_json::from_value::<UploadedFile>(f).ok())
        .map(|f| f.to_attachment())
        .collect();
    let payload = complete_payload(
        &trip_no,
        &task,
        optional_array(body, "imageList"),
        &evidence,
        Utc::now(),
    )?;

    info!(
        trip_no = %payload.trip_no,
        task_no = payload.task_no,
        task_type = %task.task_type,
        images = payload.image_list.len(),
        "checking in task"
    );
    app.client.complete_task(&payload).await?;

    Ok(Json(json!({
        "success": true,
        "tripNo": payload.trip_no,
        "taskNo": payload.task_no,
    })))
}

/// action `undo` (and the typed `undo<Kind>` variants).
pub async fn undo(
    app: &AppState,
    body: &Value,
    fixed_type: Option<TaskType>,
) -> Result<Json<Value>, AppError> {
    let task = task_ref(body, fixed_type)?;
    let trip_no = text(body, "tripNo");
    let target = undo_target(&trip_no, &task)?;

    info!(trip_no = %trip_no, task_no = task.task_number, task_type = %task.task_type, "reverting check-in");
    app.client.undo(&target).await?;

    Ok(Json(json!({
        "success": true,
        "tripNo": trip_no,
        "taskNo": task.task_number,
    })))
}
