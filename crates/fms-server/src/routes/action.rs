use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use fms_core::task::TaskType;
use fms_core::FmsError;
use serde_json::Value;

use crate::error::AppError;
use crate::routes::{checkin, tasks, upload};
use crate::state::AppState;

/// Largest accepted request body; base64 photos are the big case.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Actions understood by `POST /api/fms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    GetTasks,
    GetFiles,
    UploadFile,
    /// `None` takes the task type from the request body.
    Checkin(Option<TaskType>),
    Undo(Option<TaskType>),
}

impl Action {
    pub fn parse(name: &str) -> Option<Action> {
        let action = match name {
            "getTasks" => Action::GetTasks,
            "getFiles" => Action::GetFiles,
            "uploadFile" => Action::UploadFile,
            "checkin" => Action::Checkin(None),
            "checkinDelivery" => Action::Checkin(Some(TaskType::Delivery)),
            "checkinPickup" => Action::Checkin(Some(TaskType::Pickup)),
            "checkinLinehaul" => Action::Checkin(Some(TaskType::Linehaul)),
            "undo" => Action::Undo(None),
            "undoDelivery" => Action::Undo(Some(TaskType::Delivery)),
            "undoPickup" => Action::Undo(Some(TaskType::Pickup)),
            "undoLinehaul" => Action::Undo(Some(TaskType::Linehaul)),
            _ => return None,
        };
        Some(action)
    }
}

/// POST /api/fms — dispatch on the body's `action` field.
///
/// `multipart/form-data` bodies are always treated as `uploadFile`.
pub async fn dispatch(State(app): State<AppState>, req: Request) -> Result<Json<Value>, AppError> {
    if is_multipart(req.headers()) {
        let multipart = Multipart::from_request(req, &app)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        return upload::upload_multipart(&app, multipart).await;
    }

    let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::bad_request(format!("could not read request body: {e}")))?;
    let body: Value = if bytes.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&bytes)
            .map_err(|e| AppError::bad_request(format!("invalid JSON body: {e}")))?
    };
    if !body.is_object() {
        return Err(AppError::bad_request("request body must be a JSON object"));
    }

    let name = body
        .get("action")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FmsError::MissingField("action".into()))?;
    let action =
        Action::parse(name).ok_or_else(|| AppError::bad_request(format!("unknown action: {name}")))?;

    tracing::debug!(?action, "dispatching FMS action");
    match action {
        Action::GetTasks => tasks::get_tasks(&app, &body).await,
        Action::GetFiles => tasks::get_files(&app, &body).await,
        Action::UploadFile => upload::upload_json(&app, &body).await,
        Action::Checkin(kind) => checkin::checkin(&app, &body, kind).await,
        Action::Undo(kind) => checkin::undo(&app, &body, kind).await,
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}
