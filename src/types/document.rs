//! Supporting document types.

use std::path::Path;

use crate::error::AssessError;
use crate::utils::mime::guess_mime;

/// A supporting document attached to a submission.
///
/// Content is held in memory; documents are validated against the configured
/// size limit before any network I/O happens.
#[derive(Clone, PartialEq)]
pub struct Document {
    /// File name presented to the service (used for evidence references)
    pub file_name: String,
    /// MIME type, detected from content with extension fallback
    pub mime_type: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl Document {
    /// Create a document from in-memory bytes.
    ///
    /// The MIME type is detected from magic bytes, falling back to the file
    /// extension and then to `application/octet-stream`.
    pub fn from_bytes(file_name: impl Into<String>, content: Vec<u8>) -> Result<Self, AssessError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(AssessError::InvalidParameter(
                "document file name must not be empty".to_string(),
            ));
        }
        if content.is_empty() {
            return Err(AssessError::InvalidInput(format!(
                "document '{file_name}' is empty"
            )));
        }
        let mime_type = guess_mime(&file_name, &content);
        Ok(Self {
            file_name,
            mime_type,
            content,
        })
    }

    /// Create a document with an explicit MIME type.
    pub fn with_mime_type(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Result<Self, AssessError> {
        let mut doc = Self::from_bytes(file_name, content)?;
        doc.mime_type = mime_type.into();
        Ok(doc)
    }

    /// Read a document from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AssessError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AssessError::InvalidParameter(format!(
                    "path has no usable file name: {}",
                    path.display()
                ))
            })?
            .to_string();
        let content = tokio::fs::read(path).await?;
        Self::from_bytes(file_name, content)
    }

    /// Size of the document content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the document is empty (never true for validated documents).
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Validate the document against an upload size limit.
    pub fn validate(&self, max_bytes: usize) -> Result<(), AssessError> {
        if self.content.len() > max_bytes {
            return Err(AssessError::InvalidInput(format!(
                "document '{}' is {} bytes, limit is {} bytes",
                self.file_name,
                self.content.len(),
                max_bytes
            )));
        }
        Ok(())
    }
}

// Content is elided so request logging never dumps megabytes of file bytes.
impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("content_len", &self.content.len())
            .finish()
    }
}
