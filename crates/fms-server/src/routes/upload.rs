use axum::extract::Multipart;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fms_core::types::{FileUpload, UploadedFile};
use fms_core::value::text;
use fms_core::FmsError;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::fields::required_text;
use crate::state::AppState;

/// action `uploadFile` with a JSON body: `fileName`, `contentBase64`,
/// optional `mimeType` and `directory`.
pub async fn upload_json(app: &AppState, body: &Value) -> Result<Json<Value>, AppError> {
    let file_name = required_text(body, "fileName")?;
    let encoded = required_text(body, "contentBase64")?;
    let content = decode_content(&encoded)?;

    let upload = FileUpload {
        mime_type: mime_or_guess(&text(body, "mimeType"), &file_name),
        directory: directory_or_default(app, &text(body, "directory")),
        file_name,
        content,
    };
    store(app, upload).await
}

/// `multipart/form-data` upload: the first file part is uploaded, an
/// optional `directory` text field picks the target directory.
pub async fn upload_multipart(app: &AppState, mut multipart: Multipart) -> Result<Json<Value>, AppError> {
    let mut directory = String::new();
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) if file.is_none() => {
                let mime = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("could not read file part: {e}")))?;
                file = Some((file_name, mime, bytes.to_vec()));
            }
            Some(_) => {}
            None if name == "directory" => {
                directory = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("could not read directory: {e}")))?;
            }
            None => {}
        }
    }

    let Some((file_name, mime, content)) = file else {
        return Err(FmsError::MissingField("file".into()).into());
    };

    let upload = FileUpload {
        mime_type: mime_or_guess(&mime, &file_name),
        directory: directory_or_default(app, &directory),
        file_name,
        content,
    };
    store(app, upload).await
}

async fn store(app: &AppState, upload: FileUpload) -> Result<Json<Value>, AppError> {
    tracing::info!(
        file = %upload.file_name,
        bytes = upload.content.len(),
        directory = %upload.directory,
        "uploading file"
    );
    let stored: UploadedFile = app.client.upload_file(&upload).await?;

    Ok(Json(json!({
        "success": true,
        "fileName": stored.name,
        "fileUrl": stored.url,
        "extension": stored.extension,
    })))
}

/// Decode base64 content, accepting an optional `data:<mime>;base64,` prefix.
fn decode_content(encoded: &str) -> Result<Vec<u8>, FmsError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|e| FmsError::InvalidField {
            field: "contentBase64".into(),
            reason: e.to_string(),
        })
}

fn mime_or_guess(declared: &str, file_name: &str) -> String {
    let declared = declared.trim();
    if declared.is_empty() {
        mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    } else {
        declared.to_string()
    }
}

fn directory_or_default(app: &AppState, requested: &str) -> String {
    let requested = requested.trim();
    if requested.is_empty() {
        app.upload_directory().to_string()
    } else {
        requested.to_string()
    }
}
