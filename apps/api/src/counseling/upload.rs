//! Transcript uploads are streamed to a temporary file for the duration of one
//! analyze request and removed afterwards, whatever the outcome.

use std::path::Path;

use axum::extract::multipart::Field;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::counseling::assembler::Attachment;
use crate::errors::AppError;

/// Multipart field carrying the transcript file.
pub const TRANSCRIPT_FIELD: &str = "transcript";

#[derive(Debug)]
pub struct TranscriptUpload {
    file: NamedTempFile,
    mime_type: String,
    size: usize,
}

impl TranscriptUpload {
    /// Streams a multipart file field into a temp file inside `dir`.
    /// Returns `None` for an empty part (the form was sent without a file).
    pub async fn receive(mut field: Field<'_>, dir: &Path) -> Result<Option<Self>, AppError> {
        let file_name = field.file_name().map(str::to_string);
        if file_name.as_deref() == Some("") {
            return Ok(None);
        }
        let mime_type = resolve_mime(field.content_type(), file_name.as_deref())?;

        let file = tempfile::Builder::new()
            .prefix("transcript-")
            .tempfile_in(dir)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create upload file: {e}")))?;
        let write_error =
            |e: std::io::Error| AppError::Internal(anyhow::anyhow!("Failed to write upload file: {e}"));
        let mut out = tokio::fs::File::from_std(file.as_file().try_clone().map_err(write_error)?);

        let mut size = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Upload(format!("Failed to read transcript: {e}")))?
        {
            size += chunk.len();
            out.write_all(&chunk).await.map_err(write_error)?;
        }
        out.flush().await.map_err(write_error)?;
        drop(out);

        if size == 0 {
            debug!("Ignoring empty transcript part");
            return Ok(None);
        }

        debug!(
            "Stored transcript {:?} ({mime_type}, {size} bytes) at {}",
            file_name,
            file.path().display()
        );

        Ok(Some(Self {
            file,
            mime_type,
            size,
        }))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Reads the stored bytes back for the model call.
    pub async fn attachment(&self) -> Result<Attachment, AppError> {
        let data = tokio::fs::read(self.file.path())
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read upload file: {e}")))?;
        Ok(Attachment {
            mime_type: self.mime_type.clone(),
            data: Bytes::from(data),
        })
    }

    /// Deletes the temp file. Failure is logged and otherwise ignored.
    pub fn discard(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            warn!("Failed to delete uploaded transcript {}: {e}", path.display());
        }
    }
}

/// Accepts images and PDFs. A missing or generic content type is inferred
/// from the file extension.
fn resolve_mime(content_type: Option<&str>, file_name: Option<&str>) -> Result<String, AppError> {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

    let mime = declared.or_else(|| file_name.and_then(mime_from_extension).map(String::from));

    match mime {
        Some(m) if m.starts_with("image/") || m == "application/pdf" => Ok(m),
        Some(m) => Err(AppError::Upload(format!(
            "unsupported transcript type '{m}'; upload an image or PDF"
        ))),
        None => Err(AppError::Upload(
            "could not determine transcript type; upload an image or PDF".to_string(),
        )),
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_wins() {
        assert_eq!(
            resolve_mime(Some("image/PNG"), Some("scan.pdf")).unwrap(),
            "image/png"
        );
    }

    #[test]
    fn test_octet_stream_falls_back_to_extension() {
        assert_eq!(
            resolve_mime(Some("application/octet-stream"), Some("Transcript.PDF")).unwrap(),
            "application/pdf"
        );
        assert_eq!(resolve_mime(None, Some("grades.jpeg")).unwrap(), "image/jpeg");
    }

    #[test]
    fn test_rejects_non_transcript_types() {
        assert!(matches!(
            resolve_mime(Some("text/html"), None),
            Err(AppError::Upload(_))
        ));
        assert!(matches!(
            resolve_mime(None, Some("notes.docx")),
            Err(AppError::Upload(_))
        ));
    }
}
