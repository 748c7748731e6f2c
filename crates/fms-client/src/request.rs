use fms_core::types::FileUpload;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

/// An upstream call described by value so it can be sent more than once.
///
/// `reqwest::RequestBuilder` cannot be cloned when it carries a multipart
/// body, so the retry after re-authentication rebuilds from this instead.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Pre-serialized JSON text, sent with `Content-Type: application/json`.
    RawJson(String),
    Multipart(FileUpload),
}

impl UpstreamRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn post(url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Apply method, url, query and body to a fresh builder.
    pub(crate) fn build(
        &self,
        http: &reqwest::Client,
    ) -> Result<reqwest::RequestBuilder, reqwest::Error> {
        let mut builder = http.request(self.method.clone(), &self.url);
        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        let builder = match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(v) => builder.json(v),
            RequestBody::RawJson(text) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(text.clone()),
            RequestBody::Multipart(upload) => builder.multipart(upload_form(upload)?),
        };
        Ok(builder)
    }
}

fn upload_form(upload: &FileUpload) -> Result<Form, reqwest::Error> {
    let part = Part::bytes(upload.content.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.mime_type)?;
    Ok(Form::new()
        .part("files", part)
        .text("directory", upload.directory.clone()))
}
