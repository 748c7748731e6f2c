//! File-to-task matching.
//!
//! POD files match on task number first and fall back to the PRO (tracking)
//! number. BOL files match on PRO only. Files of any other category match on
//! either. Empty identifiers never match each other.

use crate::files::{FileCategory, FileRecord};
use crate::task::TaskRecord;
use serde::Serialize;

pub fn matches(file: &FileRecord, task: &TaskRecord) -> bool {
    match file.category {
        FileCategory::Pod => same_task_number(file, task) || same_reference(file, task),
        FileCategory::Bol => same_reference(file, task),
        FileCategory::Other(_) => same_task_number(file, task) || same_reference(file, task),
    }
}

fn same_task_number(file: &FileRecord, task: &TaskRecord) -> bool {
    match task.task_number() {
        Some(n) => file.task_number == n.to_string(),
        None => false,
    }
}

fn same_reference(file: &FileRecord, task: &TaskRecord) -> bool {
    let reference = file.reference_number.trim();
    !reference.is_empty() && reference == task.tracking_number().trim()
}

/// A task together with the trip files that match it.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithFiles {
    #[serde(flatten)]
    pub task: TaskRecord,
    pub files: Vec<FileRecord>,
}

/// Pair every task with its matching files. A file may match several tasks.
pub fn attach_files(tasks: Vec<TaskRecord>, files: &[FileRecord]) -> Vec<TaskWithFiles> {
    tasks
        .into_iter()
        .map(|task| {
            let files = files.iter().filter(|f| matches(f, &task)).cloned().collect();
            TaskWithFiles { task, files }
        })
        .collect()
}
