use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fms_client::ClientError;
use fms_core::FmsError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain for failures that are not field validation
/// (unknown action, unreadable body).
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Every error body has the shape `{ "success": false, "error": "..." }`.
/// Upstream failures also echo `upstreamStatus` and `upstreamBody`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequestError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if let Some(e) = self.0.downcast_ref::<FmsError>() {
            return match e {
                FmsError::MissingField(_) | FmsError::InvalidField { .. } => {
                    StatusCode::BAD_REQUEST
                }
                FmsError::MissingEnv(_)
                | FmsError::InvalidConfig(_)
                | FmsError::Io(_)
                | FmsError::Yaml(_)
                | FmsError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({
            "success": false,
            "error": self.0.to_string(),
        });

        if let Some(ClientError::Upstream {
            status: upstream_status,
            body: upstream_body,
        }) = self.0.downcast_ref::<ClientError>()
        {
            body["upstreamStatus"] = serde_json::json!(upstream_status);
            body["upstreamBody"] = serde_json::json!(upstream_body);
        }

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }

        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
