use serde::{Deserialize, Serialize};

/// A file stored in FMS by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    #[serde(rename = "fileName")]
    pub name: String,
    #[serde(rename = "fileUrl")]
    pub url: String,
    pub extension: String,
}

impl UploadedFile {
    pub fn to_attachment(&self) -> EvidenceAttachment {
        EvidenceAttachment {
            file_name: self.name.clone(),
            file_url: self.url.clone(),
            file_extension: self.extension.clone(),
        }
    }
}

/// One entry of a check-in `image_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceAttachment {
    pub file_name: String,
    pub file_url: String,
    pub file_extension: String,
}

/// Raw bytes of a file to be uploaded, plus where it should go.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
    pub directory: String,
}
