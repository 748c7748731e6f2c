use crate::value::{first_text, text};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Document category declared on a trip file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCategory {
    /// Proof of delivery.
    Pod,
    /// Bill of lading.
    Bol,
    Other(String),
}

impl FileCategory {
    pub fn parse(label: &str) -> FileCategory {
        let label = label.trim();
        match label.to_uppercase().as_str() {
            "POD" => FileCategory::Pod,
            "BOL" => FileCategory::Bol,
            _ => FileCategory::Other(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileCategory::Pod => "POD",
            FileCategory::Bol => "BOL",
            FileCategory::Other(label) => label,
        }
    }
}

impl Serialize for FileCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A file already attached to a trip in FMS.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(rename = "fileType")]
    pub category: FileCategory,
    #[serde(rename = "taskNo")]
    pub task_number: String,
    #[serde(rename = "proNo")]
    pub reference_number: String,
    pub file_name: String,
    pub file_url: String,
}

impl FileRecord {
    /// Normalize one row of the trip file list. Never fails.
    pub fn from_raw(raw: &Value) -> FileRecord {
        FileRecord {
            category: FileCategory::parse(&text(raw, "file_type")),
            task_number: text(raw, "task_no"),
            reference_number: first_text(raw, &["pro_no", "tracking_no"]),
            file_name: first_text(raw, &["file_name", "name"]),
            file_url: first_text(raw, &["file_url", "url"]),
        }
    }
}

pub fn normalize_files(rows: &[Value]) -> Vec<FileRecord> {
    rows.iter().map(FileRecord::from_raw).collect()
}
