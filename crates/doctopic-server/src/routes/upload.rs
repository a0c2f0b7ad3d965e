//! Multipart upload parsing shared by the analysis routes.

use std::collections::HashMap;

use axum::extract::Multipart;
use doctopic_core::{Error, Result as CoreResult};
use doctopic_ingest::FileType;

use crate::error::ApiError;

/// A document upload plus its plain form fields.
#[derive(Debug, Default)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
    fields: HashMap<String, String>,
}

impl Upload {
    /// Drain a multipart body. The document is the `file` part.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut upload = Upload::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                upload.filename = field.file_name().map(|s| s.to_string());
                upload.bytes = field.bytes().await?.to_vec();
            } else {
                let value = field.text().await?;
                upload.fields.insert(name, value);
            }
        }

        Ok(upload)
    }

    /// Non-empty trimmed value of a form field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Required form field.
    pub fn require(&self, name: &str) -> CoreResult<&str> {
        self.field(name)
            .ok_or_else(|| Error::InvalidInput(format!("missing form field '{}'", name)))
    }

    /// Name and detected type of the uploaded document.
    pub fn document(&self) -> CoreResult<(String, FileType)> {
        let filename = self
            .filename
            .clone()
            .ok_or_else(|| Error::InvalidInput("missing file upload".into()))?;
        let file_type = FileType::from_filename(&filename)?;
        Ok((filename, file_type))
    }
}
