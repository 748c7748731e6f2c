//! Typed FMS endpoints.
//!
//! Each call has one parsing contract. Optional payloads that fail to parse
//! degrade to empty results; status failures never do.

use fms_core::checkin::{CompletePayload, UndoTarget};
use fms_core::files::{normalize_files, FileRecord};
use fms_core::task::{normalize_all, TaskRecord};
use fms_core::types::{FileUpload, UploadedFile};
use fms_core::value::{first_array, text};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::client::FmsClient;
use crate::error::ClientError;
use crate::request::{RequestBody, UpstreamRequest};
use crate::Result;

impl FmsClient {
    /// Tasks of a trip. Rows come from `data`, else `data.items`.
    pub async fn list_tasks(&self, trip_no: &str) -> Result<Vec<TaskRecord>> {
        let req = UpstreamRequest::get(&self.endpoints().task_list).query("tripNo", trip_no);
        let body = self.expect_success(&req).await?;
        let json = parse_optional(&body);
        let tasks = normalize_all(first_array(&json, &["/data", "/data/items"]));
        debug!(trip_no, count = tasks.len(), "listed trip tasks");
        Ok(tasks)
    }

    /// Files attached to a trip. Rows come from `data.files`, else `data`.
    pub async fn list_files(&self, trip_no: &str) -> Result<Vec<FileRecord>> {
        let req = UpstreamRequest::post(
            &self.endpoints().file_list,
            RequestBody::Json(json!({ "trip_no": trip_no })),
        );
        let body = self.expect_success(&req).await?;
        let json = parse_optional(&body);
        let files = normalize_files(first_array(&json, &["/data/files", "/data"]));
        debug!(trip_no, count = files.len(), "listed trip files");
        Ok(files)
    }

    /// Store a file in FMS. Requires `is_success: true` and reads the stored
    /// file from `data.items[0].file_info`.
    pub async fn upload_file(&self, upload: &FileUpload) -> Result<UploadedFile> {
        let req = UpstreamRequest::post(
            &self.endpoints().file_upload,
            RequestBody::Multipart(upload.clone()),
        );
        let resp = self.call(&req).await?;
        let status = resp.status();
        let body = resp.text().await?;
        let json = parse_optional(&body);

        let accepted = json.get("is_success").and_then(Value::as_bool) == Some(true);
        if !status.is_success() || !accepted {
            return Err(ClientError::upstream(status, body));
        }

        let info = json
            .pointer("/data/items/0/file_info")
            .ok_or_else(|| ClientError::Decode("upload response has no data.items[0].file_info".into()))?;
        let uploaded = UploadedFile {
            name: text(info, "name"),
            url: text(info, "url"),
            extension: text(info, "file_extension"),
        };
        info!(file = %uploaded.name, directory = %upload.directory, "uploaded file to FMS");
        Ok(uploaded)
    }

    pub async fn complete_task(&self, payload: &CompletePayload) -> Result<()> {
        let body = serde_json::to_value(payload).map_err(|e| ClientError::Decode(e.to_string()))?;
        let req = UpstreamRequest::post(&self.endpoints().task_complete, RequestBody::Json(body));
        self.expect_success(&req).await?;
        info!(trip_no = %payload.trip_no, task_no = payload.task_no, "task checked in");
        Ok(())
    }

    pub async fn cancel_task(&self, trip_no: &str, task_no: i64) -> Result<()> {
        let req = UpstreamRequest::post(&self.endpoints().task_cancel, RequestBody::RawJson("{}".into()))
            .query("tripNo", trip_no)
            .query("taskNo", task_no.to_string())
            .query("stopNo", "0");
        self.expect_success(&req).await?;
        info!(trip_no, task_no, "task check-in cancelled");
        Ok(())
    }

    pub async fn revert_linehaul(&self, task_no: i64) -> Result<()> {
        let req = UpstreamRequest::post(
            &self.endpoints().linehaul_revert,
            RequestBody::Json(json!({ "task_no": task_no })),
        );
        self.expect_success(&req).await?;
        info!(task_no, "linehaul arrival reverted");
        Ok(())
    }

    pub async fn undo(&self, target: &UndoTarget) -> Result<()> {
        match target {
            UndoTarget::Cancel { trip_no, task_no } => self.cancel_task(trip_no, *task_no).await,
            UndoTarget::LinehaulRevert { task_no } => self.revert_linehaul(*task_no).await,
        }
    }

    /// Send and return the body, turning any non-2xx into `Upstream`.
    async fn expect_success(&self, req: &UpstreamRequest) -> Result<String> {
        let resp = self.call(req).await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::upstream(status, body));
        }
        Ok(body)
    }
}

fn parse_optional(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| {
        debug!(error = %e, "FMS response was not JSON, using empty payload");
        Value::Null
    })
}
