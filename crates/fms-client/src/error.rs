use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("FMS authentication failed: {0}")]
    Auth(String),

    #[error("FMS returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode FMS response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn upstream(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        ClientError::Upstream {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}
