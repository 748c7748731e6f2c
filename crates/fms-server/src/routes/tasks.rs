use axum::Json;
use fms_core::file_match::attach_files;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::fields::{optional_bool, required_text};
use crate::state::AppState;

/// action `getTasks` — list a trip's tasks, optionally with matching files.
pub async fn get_tasks(app: &AppState, body: &Value) -> Result<Json<Value>, AppError> {
    let trip_no = required_text(body, "tripNo")?;
    let tasks = app.client.list_tasks(&trip_no).await?;

    let tasks = if optional_bool(body, "withFiles") {
        let files = app.client.list_files(&trip_no).await?;
        serde_json::to_value(attach_files(tasks, &files))?
    } else {
        serde_json::to_value(tasks)?
    };

    Ok(Json(json!({
        "success": true,
        "tripNo": trip_no,
        "tasks": tasks,
    })))
}

/// action `getFiles` — list files already attached to a trip.
pub async fn get_files(app: &AppState, body: &Value) -> Result<Json<Value>, AppError> {
    let trip_no = required_text(body, "tripNo")?;
    let files = app.client.list_files(&trip_no).await?;

    Ok(Json(json!({
        "success": true,
        "tripNo": trip_no,
        "files": files,
    })))
}
