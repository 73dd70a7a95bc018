#![allow(clippy::missing_docs_in_private_items)]

pub mod extractors;

use common::{
    error::AppError,
    storage::types::document_content::{DocumentFormat, ExtractedContent},
};
use std::path::Path;

/// Routes a raw upload to the extractor matching its file extension.
///
/// The extension may carry a leading dot and any casing. Anything outside the
/// supported set fails with `AppError::UnsupportedFormat`; this layer is
/// strict, unlike the per-entry handling inside archives.
pub fn extract_document(bytes: &[u8], extension: &str) -> Result<ExtractedContent, AppError> {
    let format = DocumentFormat::from_extension(extension)
        .ok_or_else(|| AppError::UnsupportedFormat(extension.to_string()))?;

    match format {
        DocumentFormat::Pdf => Ok(ExtractedContent::Pdf(extractors::pdf::extract_pdf(bytes)?)),
        DocumentFormat::Txt => Ok(ExtractedContent::Txt(extractors::text::extract_text(bytes))),
        DocumentFormat::Docx => Ok(ExtractedContent::Docx(extractors::docx::extract_docx(
            bytes,
        )?)),
        DocumentFormat::Xlsx => Ok(ExtractedContent::Xlsx(extractors::xlsx::extract_xlsx(
            bytes,
        )?)),
        DocumentFormat::Zip => Ok(ExtractedContent::Zip(extractors::archive::extract_archive(
            bytes,
        )?)),
    }
}

/// Returns the lowercased extension of a file name, including the leading
/// dot, or `None` when the name has no extension.
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}
