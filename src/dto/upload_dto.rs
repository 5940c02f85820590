use bytes::Bytes;
use reqwest::multipart::Part;

use crate::error::Result;

/// A file picked by the operator, sent as one multipart part.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub data: Bytes,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    pub fn into_part(self) -> Result<Part> {
        Ok(Part::bytes(self.data.to_vec())
            .file_name(self.file_name)
            .mime_str(&self.mime)?)
    }
}
