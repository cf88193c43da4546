//! Multipart form collection shared by both chat routes.

use axum::extract::multipart::{Multipart, MultipartError};

use crate::extract::AttachmentFile;
use crate::prompt::UploadedImage;

const DEFAULT_IMAGE_MIME: &str = "application/octet-stream";

/// The fields both routes accept. Anything unrecognized is drained and
/// dropped.
#[derive(Default)]
pub(crate) struct ChatForm {
    pub message: String,
    pub session_id: Option<String>,
    pub history_raw: Option<String>,
    pub images: Vec<UploadedImage>,
    pub attachment: Option<AttachmentFile>,
}

pub(crate) async fn collect_form(mut multipart: Multipart) -> Result<ChatForm, MultipartError> {
    let mut form = ChatForm::default();

    while let Some(field) = multipart.next_field().await? {
        // Reading a field consumes it, so take the metadata out first.
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "message" => form.message = field.text().await?,
            "sessionId" => form.session_id = Some(field.text().await?),
            "history" => form.history_raw = Some(field.text().await?),
            // `imageFile` is the legacy single-image field name.
            "imageFiles" | "imageFile" => {
                let mime_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_IMAGE_MIME)
                    .to_string();
                // Named policy: one unreadable image does not fail the request.
                match field.bytes().await {
                    Ok(data) => form.images.push(UploadedImage { mime_type, data }),
                    Err(err) => {
                        tracing::warn!(error = %err, "skipping unreadable image upload");
                    }
                }
            }
            "attachment" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.attachment = Some(AttachmentFile { filename, bytes });
            }
            _ => {
                tracing::debug!(field = %name, "ignoring unknown form field");
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}
