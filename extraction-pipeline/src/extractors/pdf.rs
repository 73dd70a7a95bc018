use common::error::AppError;
use lopdf::Document;

/// Extracts the text layer of a PDF, page by page in ascending page order,
/// pages joined by a single newline.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, AppError> {
    let document = Document::load_mem(bytes)
        .map_err(|err| AppError::Extraction(format!("Failed to parse PDF: {err}")))?;

    let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut pages = Vec::with_capacity(page_numbers.len());
    for page_number in page_numbers {
        let text = document.extract_text(&[page_number]).map_err(|err| {
            AppError::Extraction(format!(
                "Failed to extract text from PDF page {page_number}: {err}"
            ))
        })?;
        pages.push(text.trim_end().to_string());
    }

    Ok(pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let result = extract_pdf(b"definitely not a pdf");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_rejects_empty_input() {
        let result = extract_pdf(b"");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_rejects_truncated_header() {
        // A bare header with no cross-reference table is not a usable PDF
        let result = extract_pdf(b"%PDF-1.7\n");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }
}
