use axum::body::Body;
use axum::extract::{FromRequest, Multipart, Request};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::rest::context::{RequestContext, UploadedFile};

const ORIGIN: &str = "UploadFile";

/// Content types accepted unless configured otherwise.
pub const DEFAULT_ACCEPTED_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Accepts a single file from a `multipart/form-data` body and stores it in
/// the upload directory under a random name.
///
/// The stored file is attached to the context under the field name.
#[derive(Debug, Clone)]
pub struct UploadFile {
    directory: Arc<PathBuf>,
    field: &'static str,
    accepted: Vec<&'static str>,
    max_bytes: usize,
}

impl UploadFile {
    pub fn new(directory: impl Into<PathBuf>, field: &'static str, max_bytes: usize) -> Self {
        Self {
            directory: Arc::new(directory.into()),
            field,
            accepted: DEFAULT_ACCEPTED_TYPES.to_vec(),
            max_bytes,
        }
    }

    /// Replaces the accepted content types.
    pub fn accept(mut self, content_types: &[&'static str]) -> Self {
        self.accepted = content_types.to_vec();
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub(super) async fn execute(&self, ctx: &mut RequestContext) -> Result<(), AppError> {
        let mut multipart = self.multipart(ctx).await?;

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| bad_request(format!("Failed to read multipart field: {e}")))?
        {
            if field.name() != Some(self.field) {
                continue;
            }

            let original_name = field.file_name().map(str::to_string);
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            if !self.accepted.contains(&content_type.as_str()) {
                return Err(bad_request(format!(
                    "Unsupported file type: {content_type}. Accepted: {}",
                    self.accepted.join(", ")
                )));
            }

            let mut data = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| bad_request(format!("Failed to read file chunk: {e}")))?
            {
                data.extend_from_slice(&chunk);
                if data.len() > self.max_bytes {
                    return Err(bad_request(format!(
                        "File too large: exceeds maximum of {} bytes",
                        self.max_bytes
                    )));
                }
            }

            if data.is_empty() {
                return Err(bad_request(format!("File in field `{}` is empty", self.field)));
            }

            let extension = extension_for(&content_type, original_name.as_deref());
            let stored_name = match extension {
                Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
                None => Uuid::new_v4().to_string(),
            };
            let path = self.store(&stored_name, &data).await?;

            tracing::debug!(
                field = self.field,
                stored_name = %stored_name,
                content_type = %content_type,
                size_bytes = data.len(),
                "Upload stored"
            );

            ctx.attach_file(UploadedFile {
                field: self.field.to_string(),
                original_name,
                content_type,
                stored_name,
                path,
                size: data.len(),
            });
            return Ok(());
        }

        Err(bad_request(format!("No file uploaded in field `{}`", self.field)))
    }

    /// Re-reads the buffered body as a multipart stream.
    async fn multipart(&self, ctx: &RequestContext) -> Result<Multipart, AppError> {
        let is_multipart = ctx
            .content_type()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));
        if !is_multipart {
            return Err(bad_request("Expected multipart/form-data body"));
        }

        let body = ctx
            .raw_body()
            .cloned()
            .ok_or_else(|| AppError::internal(anyhow::anyhow!("request body was already consumed")))?;

        let mut request = Request::new(Body::from(body));
        *request.headers_mut() = ctx.headers().clone();
        *request.extensions_mut() = ctx.extensions().clone();

        Multipart::from_request(request, &())
            .await
            .map_err(|e| bad_request(format!("Invalid multipart body: {e}")))
    }

    async fn store(&self, stored_name: &str, data: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.directory.join(stored_name);

        tokio::fs::create_dir_all(self.directory.as_path())
            .await
            .map_err(|e| {
                AppError::internal(anyhow::Error::new(e).context(format!(
                    "failed to create upload directory {}",
                    self.directory.display()
                )))
            })?;

        tokio::fs::write(&path, data).await.map_err(|e| {
            AppError::internal(
                anyhow::Error::new(e).context(format!("failed to write {}", path.display())),
            )
        })?;

        Ok(path)
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError::bad_request(message, ORIGIN)
}

fn extension_for(content_type: &str, original_name: Option<&str>) -> Option<String> {
    match content_type {
        "image/png" => Some("png".to_string()),
        "image/jpeg" => Some("jpg".to_string()),
        _ => original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase),
    }
}
