use std::io::Cursor;

use calamine::{Reader, Xlsx};
use common::error::AppError;

/// Extracts a workbook as text: one delimiter line per sheet in declared
/// sheet order, then one line per row with cell values joined by " | ".
/// Missing cells render as empty strings.
pub fn extract_xlsx(bytes: &[u8]) -> Result<String, AppError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|err| AppError::Extraction(format!("Failed to open XLSX workbook: {err}")))?;

    let sheet_names = workbook.sheet_names().to_owned();
    let mut text = String::new();

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(|err| {
            AppError::Extraction(format!("Failed to read sheet {sheet_name}: {err}"))
        })?;

        text.push_str(&format!("\n=== Sheet: {sheet_name} ===\n"));
        for row in range.rows() {
            let line = row
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
            text.push_str(&line);
            text.push('\n');
        }
    }

    Ok(text)
}
