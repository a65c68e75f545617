use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::model::task::Task;

/// Format version written into every export
pub const BLOB_VERSION: &str = "1.0";

/// Error type for decoding an import blob
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("import code is empty")]
    Empty,
    #[error("import code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("import code is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("import code does not contain valid data: {0}")]
    Json(#[from] serde_json::Error),
}

/// The self-describing export payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBlob {
    pub tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default)]
    pub total_completed: u64,
    #[serde(default)]
    pub version: String,
}

impl ExportBlob {
    pub fn new(tasks: Vec<Task>, theme: &str, total_completed: u64) -> Self {
        ExportBlob {
            tasks,
            theme: Some(theme.to_string()),
            total_completed,
            version: BLOB_VERSION.to_string(),
        }
    }
}

/// Encode as base64 over UTF-8 JSON, one copy-pasteable line
pub fn encode_blob(blob: &ExportBlob) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(blob)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Decode a pasted blob. Whitespace anywhere in the input is ignored, since
/// terminals tend to wrap long lines on copy.
pub fn decode_blob(input: &str) -> Result<ExportBlob, BlobError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(BlobError::Empty);
    }
    let bytes = STANDARD.decode(compact.as_bytes())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExportBlob {
        let mut done = Task::new(2, "zaplatiť nájom".into(), 2);
        done.done = true;
        ExportBlob::new(vec![Task::new(1, "buy milk @home".into(), 0), done], "amber", 7)
    }

    #[test]
    fn encode_then_decode_reproduces_payload() {
        let blob = sample();
        let encoded = encode_blob(&blob).unwrap();
        assert!(!encoded.contains(char::is_whitespace));
        assert_eq!(decode_blob(&encoded).unwrap(), blob);
    }

    #[test]
    fn decode_ignores_wrapped_whitespace() {
        let encoded = encode_blob(&sample()).unwrap();
        let (a, b) = encoded.split_at(encoded.len() / 2);
        let wrapped = format!("  {}\n  {} ", a, b);
        assert_eq!(decode_blob(&wrapped).unwrap(), sample());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_blob("   "), Err(BlobError::Empty)));
        assert!(matches!(decode_blob("not*base64"), Err(BlobError::Base64(_))));
        let not_json = STANDARD.encode(b"hello");
        assert!(matches!(decode_blob(&not_json), Err(BlobError::Json(_))));
    }

    #[test]
    fn decode_requires_task_array() {
        let wrong_shape = STANDARD.encode(br#"{"tasks":"nope","version":"1.0"}"#);
        assert!(matches!(decode_blob(&wrong_shape), Err(BlobError::Json(_))));
    }

    #[test]
    fn decode_accepts_camel_case_wire_shape() {
        let raw = br#"{"tasks":[{"id":1,"text":"a","done":true,"completedAt":1700000000000}],"theme":"cyan","totalCompleted":3,"version":"1.0"}"#;
        let blob = decode_blob(&STANDARD.encode(raw)).unwrap();
        assert_eq!(blob.tasks.len(), 1);
        assert!(blob.tasks[0].done);
        assert!(blob.tasks[0].completed_at.is_some());
        assert_eq!(blob.total_completed, 3);
        assert_eq!(blob.theme.as_deref(), Some("cyan"));
    }
}
