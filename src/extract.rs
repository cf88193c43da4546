//! Attachment text extraction.
//!
//! Text-like files are decoded lossily (bad byte sequences never fail a
//! request), PDFs are extracted page by page, and anything else yields an
//! empty string.

use bytes::Bytes;
use thiserror::Error;

/// Extensions decoded as plain UTF-8 text.
const TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".py", ".js", ".json", ".html", ".csv", ".log", ".xml", ".yaml", ".toml",
];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to parse PDF attachment: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// An uploaded document as it arrives from the multipart form.
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Extract text from an optional attachment. Absence is not an error.
pub fn extract(file: Option<&AttachmentFile>) -> Result<String, ExtractError> {
    match file {
        Some(file) => extract_attachment_text(&file.filename, &file.bytes),
        None => Ok(String::new()),
    }
}

/// Extract text from an uploaded file based on its extension.
///
/// Unrecognized extensions yield an empty string rather than an error; only
/// an unparseable PDF fails, which the handlers surface as a 500.
pub fn extract_attachment_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let name = filename.to_lowercase();

    if TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }

    if name.ends_with(".pdf") {
        return extract_pdf_text(bytes);
    }

    Ok(String::new())
}

/// Per-page extraction. Pages whose extraction fails or yields only
/// whitespace are skipped; the rest are joined with a single newline.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = lopdf::Document::load_mem(bytes)?;

    let pages: Vec<String> = document
        .get_pages()
        .keys()
        .filter_map(|page_number| document.extract_text(&[*page_number]).ok())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    Ok(pages.join("\n"))
}
