//! File staging — uploaded resumes waiting to be submitted.
//!
//! Dedup key is (filename, size). Removal goes by the id handed out at staging time.

use std::collections::HashSet;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Advisory accept list; anything else is staged anyway with a warning.
const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];
const ACCEPTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];

/// A file as it arrives from the picker or a drop.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingFile {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub id: Uuid,
    pub filename: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// Listing entry without the raw bytes.
#[derive(Debug, Clone, Serialize)]
pub struct StagedFileView {
    pub id: Uuid,
    pub filename: String,
    pub size_bytes: u64,
    pub size_display: String,
    pub mime_type: String,
}

impl From<&StagedFile> for StagedFileView {
    fn from(file: &StagedFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            size_bytes: file.size_bytes,
            size_display: format_bytes(file.size_bytes),
            mime_type: file.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<IncomingFile>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragResponse {
    /// Always true: the browser must not navigate to a dropped file.
    pub prevent_default: bool,
    pub added: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct FileStager {
    files: Vec<StagedFile>,
    is_dragging: bool,
}

impl FileStager {
    /// Stages every file whose (filename, size) is not already present, in arrival order.
    /// Returns the ids of the files actually added.
    pub fn add<I>(&mut self, incoming: I) -> Vec<Uuid>
    where
        I: IntoIterator<Item = IncomingFile>,
    {
        let mut seen: HashSet<(String, u64)> = self
            .files
            .iter()
            .map(|f| (f.filename.clone(), f.size_bytes))
            .collect();
        let mut added = Vec::new();

        for file in incoming {
            let size_bytes = file.bytes.len() as u64;
            if !seen.insert((file.filename.clone(), size_bytes)) {
                debug!("Skipping duplicate upload '{}' ({size_bytes} bytes)", file.filename);
                continue;
            }

            let mime_type = file
                .mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| guess_mime_type(&file.filename).to_string());

            if !is_accepted_type(&file.filename, &mime_type) {
                warn!(
                    "Staging '{}' with unexpected type '{}'; accepted types are PDF, DOC, DOCX and TXT",
                    file.filename, mime_type
                );
            }

            let staged = StagedFile {
                id: Uuid::new_v4(),
                filename: file.filename,
                size_bytes,
                mime_type,
                bytes: file.bytes,
            };
            added.push(staged.id);
            self.files.push(staged);
        }

        added
    }

    /// Removes the file with this identity. Files are never removed by key.
    pub fn remove(&mut self, id: Uuid) -> Option<StagedFile> {
        let index = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(index))
    }

    pub fn remove_all(&mut self, ids: &[Uuid]) {
        self.files.retain(|f| !ids.contains(&f.id));
    }

    pub fn handle_drag(&mut self, event: DragEvent) -> DragResponse {
        let added = match event {
            DragEvent::Enter | DragEvent::Over => {
                self.is_dragging = true;
                vec![]
            }
            DragEvent::Leave => {
                self.is_dragging = false;
                vec![]
            }
            DragEvent::Drop(files) => {
                self.is_dragging = false;
                self.add(files)
            }
        };
        DragResponse {
            prevent_default: true,
            added,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn views(&self) -> Vec<StagedFileView> {
        self.files.iter().map(StagedFileView::from).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Human-readable size in base-1024 units with two decimals.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

pub fn is_accepted_type(filename: &str, mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime_type)
        || extension(filename).is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

fn guess_mime_type(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => FALLBACK_MIME_TYPE,
    }
}
