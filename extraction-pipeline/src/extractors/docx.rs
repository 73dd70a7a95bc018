use std::io::Cursor;

use common::error::AppError;
use docx_rust::document::{Paragraph, TableCell, TableCellContent, TableRowContent};
use docx_rust::{document::BodyContent, DocxFile};

/// Extracts the readable text of a DOCX file: body paragraphs in document
/// order (newline-separated), followed by table content with cells
/// space-joined per row, one row per line.
pub fn extract_docx(bytes: &[u8]) -> Result<String, AppError> {
    let docx_file = DocxFile::from_reader(Cursor::new(bytes))
        .map_err(|err| AppError::Extraction(format!("Failed to open DOCX container: {err:?}")))?;
    let docx = docx_file
        .parse()
        .map_err(|err| AppError::Extraction(format!("Failed to parse DOCX document: {err:?}")))?;

    let mut paragraphs = Vec::new();
    let mut table_lines = Vec::new();

    for content in &docx.document.body.content {
        match content {
            BodyContent::Paragraph(paragraph) => {
                paragraphs.push(paragraph_text(paragraph));
            }
            BodyContent::Table(table) => {
                for row in &table.rows {
                    let mut cells = Vec::new();
                    for row_content in &row.cells {
                        if let TableRowContent::TableCell(cell) = row_content {
                            cells.push(cell_text(cell));
                        }
                    }
                    table_lines.push(cells.join(" "));
                }
            }
            _ => {}
        }
    }

    let mut text = paragraphs.join("\n");
    if !table_lines.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&table_lines.join("\n"));
    }

    Ok(text)
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    paragraph.iter_text().map(|text| text.as_ref()).collect()
}

fn cell_text(cell: &TableCell) -> String {
    cell.content
        .iter()
        .map(|content| match content {
            TableCellContent::Paragraph(paragraph) => paragraph_text(paragraph),
            #[allow(unreachable_patterns)]
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rust::Docx;

    #[test]
    fn test_rejects_non_docx_bytes() {
        let result = extract_docx(b"this is not a zip container");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_rejects_empty_input() {
        let result = extract_docx(b"");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_extracts_paragraph_text() {
        let mut docx = Docx::default();
        docx.document
            .push(Paragraph::default().push_text("Quarterly results were strong."));
        docx.document
            .push(Paragraph::default().push_text("Revenue grew by ten percent."));

        let mut buffer = Vec::new();
        docx.write(&mut Cursor::new(&mut buffer))
            .expect("Failed to write test document");

        let text = extract_docx(&buffer).expect("Failed to extract test document");
        assert!(text.contains("Quarterly results were strong."));
        assert!(text.contains("Revenue grew by ten percent."));

        let first = text
            .find("Quarterly")
            .expect("first paragraph missing");
        let second = text.find("Revenue").expect("second paragraph missing");
        assert!(first < second, "paragraph order must be preserved");
    }
}
